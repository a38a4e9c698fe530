// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod aircraft;
pub mod config;
pub mod duration;
pub mod geo;
pub mod normalizer;
pub mod provider;
pub mod record;
pub mod time;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use normalizer::{FlightQuery, Normalizer};
pub use provider::{ProviderKind, ProviderPayload};
pub use record::CanonicalFlightRecord;

/// Which end of the flight a piece of data belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Departure,
    Arrival,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Departure => write!(f, "departure"),
            Endpoint::Arrival => write!(f, "arrival"),
        }
    }
}

/// Failures surfaced to the caller. Degraded data (unknown timezones, missing
/// coordinates, unrecognised aircraft) never ends up here; it is reflected as
/// null or default fields in the record instead.
#[derive(Error, Debug)]
pub enum FlightError {
    #[error("Airport data not available: no {0} IATA code in provider payload")]
    MissingAirportData(Endpoint),
    #[error("Flight not found in {0} response")]
    FlightNotFound(ProviderKind),
    #[error("Malformed {provider} payload: {source}")]
    InvalidPayload {
        provider: ProviderKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl FlightError {
    /// HTTP status the request layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            FlightError::MissingAirportData(_) | FlightError::FlightNotFound(_) => 404,
            FlightError::InvalidPayload { .. } => 422,
            FlightError::UnknownProvider(_) => 400,
        }
    }

    /// None of these improve by asking the provider again with the same input.
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_airport_maps_to_not_found() {
        let err = FlightError::MissingAirportData(Endpoint::Arrival);
        assert_eq!(err.http_status(), 404);
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_json()["error"],
            "Airport data not available: no arrival IATA code in provider payload"
        );
    }

    #[test]
    fn test_unknown_provider_is_bad_request() {
        let err = FlightError::UnknownProvider("flightaware".to_string());
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.to_string(), "Unknown provider: flightaware");
    }
}
