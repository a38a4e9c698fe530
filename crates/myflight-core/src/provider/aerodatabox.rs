// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{clean, EndpointSnapshot, FlightSnapshot, ScheduledTime};
use crate::geo::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Schema A, one entry of the `/flights/number/{number}/{date}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AeroDataBoxFlight {
    pub number: Option<String>,
    pub status: Option<String>,
    pub airline: Option<Airline>,
    pub aircraft: Option<Aircraft>,
    pub departure: Option<Movement>,
    pub arrival: Option<Movement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Airline {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aircraft {
    pub model: Option<String>,
    pub reg: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Movement {
    pub airport: Option<Airport>,
    pub scheduled_time: Option<ScheduledTimes>,
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Airport {
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub municipality_name: Option<String>,
    pub location: Option<Location>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// `utc` looks like `2026-02-11 15:05Z`, `local` like `2026-02-11 16:05+01:00`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduledTimes {
    pub utc: Option<String>,
    pub local: Option<String>,
}

impl AeroDataBoxFlight {
    pub fn snapshot(&self) -> FlightSnapshot {
        let departure = endpoint(self.departure.as_ref());
        let arrival = endpoint(self.arrival.as_ref());

        // The flight date is the departure's local calendar date
        let date = self
            .departure
            .as_ref()
            .and_then(|m| m.scheduled_time.as_ref())
            .and_then(|t| clean(&t.local).or_else(|| clean(&t.utc)))
            .and_then(|ts| ts.get(..10).map(str::to_string));

        FlightSnapshot {
            number: clean(&self.number),
            airline: self.airline.as_ref().and_then(|a| clean(&a.name)),
            date,
            status: clean(&self.status),
            departure,
            arrival,
            aircraft_model: self.aircraft.as_ref().and_then(|a| clean(&a.model)),
            aircraft_code: None,
            registration: self.aircraft.as_ref().and_then(|a| clean(&a.reg)),
        }
    }
}

fn endpoint(movement: Option<&Movement>) -> EndpointSnapshot {
    let Some(movement) = movement else {
        return EndpointSnapshot::default();
    };
    let airport = movement.airport.clone().unwrap_or_default();
    let times = movement.scheduled_time.clone().unwrap_or_default();
    let timezone = clean(&airport.time_zone);
    let local = clean(&times.local);

    let scheduled = match (clean(&times.utc), &local, &timezone) {
        (Some(utc), _, _) => Some(ScheduledTime::Utc(utc)),
        (None, Some(local), Some(tz)) => Some(ScheduledTime::ZonedLocal {
            local: local.clone(),
            timezone: tz.clone(),
        }),
        (None, Some(local), None) => Some(ScheduledTime::OffsetTagged(local.clone())),
        (None, None, _) => None,
    };

    EndpointSnapshot {
        iata: clean(&airport.iata),
        name: clean(&airport.name).or_else(|| clean(&airport.short_name)),
        city: clean(&airport.municipality_name).or_else(|| clean(&airport.short_name)),
        coordinate: airport
            .location
            .as_ref()
            .and_then(|l| GeoCoordinate::from_parts(l.lat, l.lon)),
        scheduled,
        scheduled_local: local,
        terminal: clean(&movement.terminal),
        timezone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AeroDataBoxFlight {
        serde_json::from_value(json!({
            "number": "IB 3166",
            "status": "Expected",
            "airline": { "name": "Iberia" },
            "aircraft": { "reg": "EC-NJM", "model": "Airbus A320 NEO" },
            "departure": {
                "airport": {
                    "icao": "LEMD", "iata": "MAD", "name": "Madrid Barajas",
                    "shortName": "Barajas", "municipalityName": "Madrid",
                    "location": { "lat": 40.4719, "lon": -3.5626 },
                    "timeZone": "Europe/Madrid"
                },
                "scheduledTime": { "utc": "2026-02-11 15:05Z", "local": "2026-02-11 16:05+01:00" },
                "terminal": "4"
            },
            "arrival": {
                "airport": { "iata": "FCO", "shortName": "Fiumicino" },
                "scheduledTime": { "local": "2026-02-11 17:40+01:00" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_snapshot_fields() {
        let snap = sample().snapshot();
        assert_eq!(snap.number.as_deref(), Some("IB 3166"));
        assert_eq!(snap.airline.as_deref(), Some("Iberia"));
        assert_eq!(snap.date.as_deref(), Some("2026-02-11"));
        assert_eq!(snap.aircraft_model.as_deref(), Some("Airbus A320 NEO"));
        assert_eq!(snap.registration.as_deref(), Some("EC-NJM"));

        let dep = &snap.departure;
        assert_eq!(dep.iata.as_deref(), Some("MAD"));
        assert_eq!(dep.name.as_deref(), Some("Madrid Barajas"));
        assert_eq!(dep.city.as_deref(), Some("Madrid"));
        assert_eq!(dep.coordinate, Some(GeoCoordinate::new(40.4719, -3.5626)));
        assert_eq!(dep.terminal.as_deref(), Some("4"));
        assert_eq!(dep.timezone.as_deref(), Some("Europe/Madrid"));
        assert_eq!(
            dep.scheduled,
            Some(ScheduledTime::Utc("2026-02-11 15:05Z".to_string()))
        );
    }

    #[test]
    fn test_short_name_fills_name_and_city() {
        let arr = sample().snapshot().arrival;
        assert_eq!(arr.name.as_deref(), Some("Fiumicino"));
        assert_eq!(arr.city.as_deref(), Some("Fiumicino"));
        assert_eq!(arr.coordinate, None);
        // No zone name, so the provider's own offset is the only information
        assert_eq!(
            arr.scheduled,
            Some(ScheduledTime::OffsetTagged("2026-02-11 17:40+01:00".to_string()))
        );
    }

    #[test]
    fn test_local_with_zone_is_zoned() {
        let mut flight = sample();
        if let Some(t) = flight
            .departure
            .as_mut()
            .and_then(|m| m.scheduled_time.as_mut())
        {
            t.utc = None;
        }
        assert_eq!(
            flight.snapshot().departure.scheduled,
            Some(ScheduledTime::ZonedLocal {
                local: "2026-02-11 16:05+01:00".to_string(),
                timezone: "Europe/Madrid".to_string(),
            })
        );
    }

    #[test]
    fn test_half_location_is_dropped() {
        let flight: AeroDataBoxFlight = serde_json::from_value(json!({
            "departure": { "airport": { "iata": "MAD", "location": { "lat": 40.47 } } }
        }))
        .unwrap();
        assert_eq!(flight.snapshot().departure.coordinate, None);
    }

    #[test]
    fn test_empty_flight() {
        let snap = AeroDataBoxFlight::default().snapshot();
        assert_eq!(snap, FlightSnapshot::default());
    }
}
