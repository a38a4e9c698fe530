// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{clean, EndpointSnapshot, FlightSnapshot, ScheduledTime};
use serde::{Deserialize, Serialize};

/// Schema B, one element of the `data` array returned by `/v1/flights`.
///
/// `scheduled` values carry a `+00:00` suffix that is not a real offset; they
/// are airport-local wall clocks, interpreted through `timezone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AviationStackFlight {
    pub flight_date: Option<String>,
    pub flight_status: Option<String>,
    pub departure: Option<Movement>,
    pub arrival: Option<Movement>,
    pub airline: Option<Airline>,
    pub flight: Option<FlightIds>,
    pub aircraft: Option<Aircraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    /// Airport display name.
    pub airport: Option<String>,
    pub timezone: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub terminal: Option<String>,
    pub scheduled: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Airline {
    pub name: Option<String>,
    pub iata: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightIds {
    pub number: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aircraft {
    pub registration: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

impl AviationStackFlight {
    pub fn snapshot(&self) -> FlightSnapshot {
        let ids = self.flight.clone().unwrap_or_default();
        let aircraft = self.aircraft.clone().unwrap_or_default();

        FlightSnapshot {
            number: clean(&ids.iata).or_else(|| clean(&ids.number)),
            airline: self.airline.as_ref().and_then(|a| clean(&a.name)),
            date: clean(&self.flight_date),
            status: clean(&self.flight_status),
            departure: endpoint(self.departure.as_ref()),
            arrival: endpoint(self.arrival.as_ref()),
            aircraft_model: None,
            aircraft_code: clean(&aircraft.iata).or_else(|| clean(&aircraft.icao)),
            registration: clean(&aircraft.registration),
        }
    }
}

fn endpoint(movement: Option<&Movement>) -> EndpointSnapshot {
    let Some(m) = movement else {
        return EndpointSnapshot::default();
    };
    let local = clean(&m.scheduled);
    let timezone = clean(&m.timezone);

    let scheduled = local.as_ref().map(|local| match &timezone {
        Some(tz) => ScheduledTime::ZonedLocal {
            local: local.clone(),
            timezone: tz.clone(),
        },
        None => ScheduledTime::Unzoned(local.clone()),
    });

    EndpointSnapshot {
        iata: clean(&m.iata),
        name: clean(&m.airport),
        city: None,
        coordinate: None,
        scheduled,
        scheduled_local: local,
        terminal: clean(&m.terminal),
        timezone,
    }
}
