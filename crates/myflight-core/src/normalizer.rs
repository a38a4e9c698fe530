// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::aircraft::AircraftClassifier;
use crate::config::NormalizerConfig;
use crate::duration::DurationEstimator;
use crate::geo::{AirportGeoIndex, GeoCoordinate};
use crate::provider::{EndpointSnapshot, FlightSnapshot, ScheduledTime};
use crate::record::{
    AircraftInfo, AirportEndpoint, CanonicalFlightRecord, ClassificationSource, CoordinateSource,
    FlightInfo, ResolutionReport,
};
use crate::time::{self, ResolvedInstant};
use crate::{Endpoint, FlightError, ProviderPayload};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

/// What the caller asked for, as opposed to what the provider answered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlightQuery {
    pub number: String,
    pub date: Option<NaiveDate>,
}

impl FlightQuery {
    pub fn new(number: &str, date: Option<NaiveDate>) -> Self {
        Self {
            number: normalize_flight_number(number),
            date,
        }
    }
}

/// `ib 3166` -> `IB3166`.
pub fn normalize_flight_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Turns provider payloads into [`CanonicalFlightRecord`]s.
///
/// Holds only immutable state, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    index: Arc<AirportGeoIndex>,
    estimator: DurationEstimator,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AirportGeoIndex::builtin(), &NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(index: Arc<AirportGeoIndex>, config: &NormalizerConfig) -> Self {
        Self {
            index,
            estimator: DurationEstimator::from_config(config),
        }
    }

    /// Built-in airport table, layered with `airports_csv` when configured.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let builtin = AirportGeoIndex::builtin();
        let index = match &config.airports_csv {
            Some(path) => {
                let extra = AirportGeoIndex::from_csv_path(path)?;
                Arc::new(builtin.merged_with(extra.airports().cloned()))
            }
            None => builtin,
        };
        Ok(Self::new(index, config))
    }

    pub fn index(&self) -> &Arc<AirportGeoIndex> {
        &self.index
    }

    pub fn normalize(&self, payload: &ProviderPayload) -> Result<CanonicalFlightRecord, FlightError> {
        self.normalize_for(None, payload)
    }

    pub fn normalize_for(
        &self,
        query: Option<&FlightQuery>,
        payload: &ProviderPayload,
    ) -> Result<CanonicalFlightRecord, FlightError> {
        let snap = payload.snapshot();

        // Without both codes there is nothing to anchor the record to
        let dep_iata = snap
            .departure
            .iata
            .as_deref()
            .ok_or(FlightError::MissingAirportData(Endpoint::Departure))?;
        let arr_iata = snap
            .arrival
            .iata
            .as_deref()
            .ok_or(FlightError::MissingAirportData(Endpoint::Arrival))?;

        let (departure, dep_source) = self.endpoint(dep_iata, &snap.departure);
        let (arrival, arr_source) = self.endpoint(arr_iata, &snap.arrival);

        let dep_time = snap.departure.scheduled.as_ref().and_then(resolve_scheduled);
        let arr_time = snap.arrival.scheduled.as_ref().and_then(resolve_scheduled);

        let duration = self.estimator.estimate(
            dep_time.map(|t| t.instant),
            arr_time.map(|t| t.instant),
            departure.coordinate(),
            arrival.coordinate(),
        );

        let (aircraft, aircraft_source) = classify(&snap);

        let flight = FlightInfo {
            number: query
                .map(|q| normalize_flight_number(&q.number))
                .filter(|n| !n.is_empty())
                .or_else(|| snap.number.as_deref().map(normalize_flight_number))
                .unwrap_or_default(),
            airline: snap.airline.clone(),
            date: query.and_then(|q| q.date).or_else(|| {
                snap.date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            }),
            status: snap.status.clone(),
        };

        log::debug!(
            "[Normalizer] {} {}->{}: {:?} min via {:?}, aircraft {} via {:?}",
            flight.number,
            departure.iata,
            arrival.iata,
            duration.minutes,
            duration.method,
            aircraft.classified_type,
            aircraft_source
        );

        Ok(CanonicalFlightRecord {
            flight,
            departure,
            arrival,
            aircraft,
            duration_minutes: duration.minutes,
            resolution: ResolutionReport {
                departure_coordinates: dep_source,
                arrival_coordinates: arr_source,
                departure_time: dep_time.map(|t| t.basis),
                arrival_time: arr_time.map(|t| t.basis),
                duration: duration.method,
                aircraft: aircraft_source,
            },
        })
    }

    fn endpoint(&self, iata: &str, snap: &EndpointSnapshot) -> (AirportEndpoint, CoordinateSource) {
        let known = self.index.get(iata);

        let (coordinate, source): (Option<GeoCoordinate>, _) = match (snap.coordinate, known) {
            (Some(c), _) => (Some(c), CoordinateSource::Provider),
            (None, Some(info)) => (Some(info.coordinate), CoordinateSource::GeoIndex),
            (None, None) => {
                log::debug!("[Normalizer] No coordinates for {}", iata);
                (None, CoordinateSource::Unavailable)
            }
        };

        let mut endpoint = AirportEndpoint::new(iata.trim().to_ascii_uppercase(), coordinate);
        endpoint.name = snap
            .name
            .clone()
            .or_else(|| known.and_then(|a| a.name.clone()));
        endpoint.city = snap
            .city
            .clone()
            .or_else(|| known.and_then(|a| a.city.clone()));
        endpoint.scheduled_local = snap.scheduled_local.clone();
        endpoint.terminal = snap.terminal.clone();
        endpoint.timezone = snap.timezone.clone();
        (endpoint, source)
    }
}

fn resolve_scheduled(scheduled: &ScheduledTime) -> Option<ResolvedInstant> {
    match scheduled {
        ScheduledTime::Utc(ts) => time::parse_provider_utc(ts),
        ScheduledTime::ZonedLocal { local, timezone } => time::resolve_utc(local, timezone),
        ScheduledTime::OffsetTagged(ts) => time::parse_offset_tagged(ts),
        ScheduledTime::Unzoned(ts) => {
            // The suffix on these is not a real offset, so no instant can be derived
            log::debug!("[Normalizer] No timezone for '{}'; not resolving", ts);
            None
        }
    }
}

fn classify(snap: &FlightSnapshot) -> (AircraftInfo, ClassificationSource) {
    let by_model = snap
        .aircraft_model
        .as_deref()
        .and_then(AircraftClassifier::match_identifier)
        .map(|code| (code, ClassificationSource::Model));
    let by_code = || {
        snap.aircraft_code
            .as_deref()
            .and_then(AircraftClassifier::match_identifier)
            .map(|code| (code, ClassificationSource::TypeCode))
    };
    let (classified_type, source) = by_model
        .or_else(by_code)
        .unwrap_or((Default::default(), ClassificationSource::Default));

    if source == ClassificationSource::Default {
        log::debug!(
            "[Normalizer] Aircraft {:?}/{:?} not recognised; using {}",
            snap.aircraft_model,
            snap.aircraft_code,
            classified_type
        );
    }

    let info = AircraftInfo {
        model: snap.aircraft_model.clone().or_else(|| snap.aircraft_code.clone()),
        classified_type,
        registration: snap.registration.clone(),
    };
    (info, source)
}
