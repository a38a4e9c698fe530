// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Provider payload schemas and their adapters.
//!
//! Every provider gets its own strongly typed payload and an adapter that
//! projects it into a [`FlightSnapshot`]. The normalizer only ever sees
//! snapshots, so provider quirks stay in this module.

pub mod aerodatabox;
pub mod aviationstack;

pub use aerodatabox::AeroDataBoxFlight;
pub use aviationstack::AviationStackFlight;

use crate::geo::GeoCoordinate;
use crate::FlightError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Schema A: nested `airport.iata` and `scheduledTime.{utc,local}`.
    AeroDataBox,
    /// Schema B: flat `iata` and `scheduled` plus a `timezone` name.
    AviationStack,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::AeroDataBox, ProviderKind::AviationStack];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AeroDataBox => "aerodatabox",
            ProviderKind::AviationStack => "aviationstack",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| FlightError::UnknownProvider(s.to_string()))
    }
}

/// One already-fetched provider response, tagged with its schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    AeroDataBox(AeroDataBoxFlight),
    AviationStack(AviationStackFlight),
}

impl ProviderPayload {
    /// Decodes a provider response. Both providers answer with lists of
    /// flights (AviationStack additionally wraps them in `data`); the first
    /// flight is used, and an empty list means the flight was not found.
    pub fn from_json(kind: ProviderKind, value: serde_json::Value) -> Result<Self, FlightError> {
        let flight = first_flight(kind, value)?;
        let invalid = |source| FlightError::InvalidPayload {
            provider: kind,
            source,
        };
        match kind {
            ProviderKind::AeroDataBox => serde_json::from_value(flight)
                .map(ProviderPayload::AeroDataBox)
                .map_err(invalid),
            ProviderKind::AviationStack => serde_json::from_value(flight)
                .map(ProviderPayload::AviationStack)
                .map_err(invalid),
        }
    }

    pub fn parse(kind: ProviderKind, json: &str) -> Result<Self, FlightError> {
        let value = serde_json::from_str(json).map_err(|source| FlightError::InvalidPayload {
            provider: kind,
            source,
        })?;
        Self::from_json(kind, value)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderPayload::AeroDataBox(_) => ProviderKind::AeroDataBox,
            ProviderPayload::AviationStack(_) => ProviderKind::AviationStack,
        }
    }

    /// Projects the payload into the provider-independent shape.
    pub fn snapshot(&self) -> FlightSnapshot {
        match self {
            ProviderPayload::AeroDataBox(f) => f.snapshot(),
            ProviderPayload::AviationStack(f) => f.snapshot(),
        }
    }
}

fn first_flight(kind: ProviderKind, value: serde_json::Value) -> Result<serde_json::Value, FlightError> {
    use serde_json::Value;

    let value = match value {
        Value::Object(mut map) if map.contains_key("data") && kind == ProviderKind::AviationStack => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    match value {
        Value::Array(flights) => flights
            .into_iter()
            .next()
            .ok_or(FlightError::FlightNotFound(kind)),
        Value::Null => Err(FlightError::FlightNotFound(kind)),
        other => Ok(other),
    }
}

/// How a scheduled time was reported, which decides how far it can be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledTime {
    /// A genuine UTC value.
    Utc(String),
    /// Local wall clock plus the airport's IANA zone; any suffix is ignored.
    ZonedLocal { local: String, timezone: String },
    /// Local time whose offset suffix is genuine.
    OffsetTagged(String),
    /// Local time with neither a trustworthy offset nor a zone name.
    Unzoned(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointSnapshot {
    pub iata: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub coordinate: Option<GeoCoordinate>,
    pub scheduled: Option<ScheduledTime>,
    /// Local time exactly as the provider printed it, for display.
    pub scheduled_local: Option<String>,
    pub terminal: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightSnapshot {
    pub number: Option<String>,
    pub airline: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub departure: EndpointSnapshot,
    pub arrival: EndpointSnapshot,
    pub aircraft_model: Option<String>,
    pub aircraft_code: Option<String>,
    pub registration: Option<String>,
}

/// Trims a provider string, treating blank values like missing ones.
pub(crate) fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("aerodatabox".parse::<ProviderKind>().unwrap(), ProviderKind::AeroDataBox);
        assert_eq!(
            " AviationStack ".parse::<ProviderKind>().unwrap(),
            ProviderKind::AviationStack
        );
        let err = "flightaware".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, FlightError::UnknownProvider(ref p) if p == "flightaware"));
    }

    #[test]
    fn test_empty_list_is_not_found() {
        let err = ProviderPayload::from_json(ProviderKind::AeroDataBox, json!([])).unwrap_err();
        assert!(matches!(err, FlightError::FlightNotFound(ProviderKind::AeroDataBox)));
        assert_eq!(err.http_status(), 404);

        let err =
            ProviderPayload::from_json(ProviderKind::AviationStack, json!({"data": []})).unwrap_err();
        assert!(matches!(err, FlightError::FlightNotFound(ProviderKind::AviationStack)));
    }

    #[test]
    fn test_wrong_shape_is_invalid_payload() {
        let err = ProviderPayload::from_json(ProviderKind::AeroDataBox, json!([{"departure": 5}]))
            .unwrap_err();
        assert!(matches!(err, FlightError::InvalidPayload { .. }));
        assert_eq!(err.http_status(), 422);

        let err = ProviderPayload::parse(ProviderKind::AeroDataBox, "not json").unwrap_err();
        assert!(matches!(err, FlightError::InvalidPayload { .. }));
    }

    #[test]
    fn test_first_flight_is_used() {
        let payload = ProviderPayload::from_json(
            ProviderKind::AeroDataBox,
            json!([{"number": "IB 3166"}, {"number": "IB 9999"}]),
        )
        .unwrap();
        assert_eq!(payload.kind(), ProviderKind::AeroDataBox);
        assert_eq!(payload.snapshot().number.as_deref(), Some("IB 3166"));
    }

    #[test]
    fn test_clean_blank_strings() {
        assert_eq!(clean(&Some("  ".to_string())), None);
        assert_eq!(clean(&Some(" T4 ".to_string())), Some("T4".to_string()));
        assert_eq!(clean(&None), None);
    }
}
