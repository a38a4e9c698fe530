// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The canonical flight record handed back to callers.

use crate::aircraft::AirframeCode;
use crate::duration::DurationMethod;
use crate::geo::GeoCoordinate;
use crate::time::TimeBasis;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFlightRecord {
    pub flight: FlightInfo,
    pub departure: AirportEndpoint,
    pub arrival: AirportEndpoint,
    pub aircraft: AircraftInfo,
    /// Never negative; `None` when neither times nor coordinates were usable.
    pub duration_minutes: Option<u32>,
    pub resolution: ResolutionReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInfo {
    pub number: String,
    pub airline: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AirportEndpointFields")]
pub struct AirportEndpoint {
    pub iata: String,
    pub name: Option<String>,
    pub city: Option<String>,
    // Private so that only `new` can set them, which keeps them paired
    lat: Option<f64>,
    lon: Option<f64>,
    pub scheduled_local: Option<String>,
    pub terminal: Option<String>,
    pub timezone: Option<String>,
}

impl AirportEndpoint {
    pub fn new(iata: impl Into<String>, coordinate: Option<GeoCoordinate>) -> Self {
        Self {
            iata: iata.into(),
            name: None,
            city: None,
            lat: coordinate.map(|c| c.lat),
            lon: coordinate.map(|c| c.lon),
            scheduled_local: None,
            terminal: None,
            timezone: None,
        }
    }

    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        GeoCoordinate::from_parts(self.lat, self.lon)
    }

    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    pub fn lon(&self) -> Option<f64> {
        self.lon
    }
}

/// Wire shape of [`AirportEndpoint`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirportEndpointFields {
    iata: String,
    name: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    scheduled_local: Option<String>,
    terminal: Option<String>,
    timezone: Option<String>,
}

impl TryFrom<AirportEndpointFields> for AirportEndpoint {
    type Error = String;

    fn try_from(f: AirportEndpointFields) -> Result<Self, Self::Error> {
        let coordinate = match (f.lat, f.lon) {
            (None, None) => None,
            (lat, lon) => Some(GeoCoordinate::from_parts(lat, lon).ok_or_else(|| {
                format!("{}: lat/lon must both be valid or both be null", f.iata)
            })?),
        };
        let mut endpoint = AirportEndpoint::new(f.iata, coordinate);
        endpoint.name = f.name;
        endpoint.city = f.city;
        endpoint.scheduled_local = f.scheduled_local;
        endpoint.terminal = f.terminal;
        endpoint.timezone = f.timezone;
        Ok(endpoint)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftInfo {
    pub model: Option<String>,
    pub classified_type: AirframeCode,
    pub registration: Option<String>,
}

/// Where each best-effort value in the record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub departure_coordinates: CoordinateSource,
    pub arrival_coordinates: CoordinateSource,
    pub departure_time: Option<TimeBasis>,
    pub arrival_time: Option<TimeBasis>,
    pub duration: DurationMethod,
    pub aircraft: ClassificationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSource {
    Provider,
    GeoIndex,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationSource {
    /// Matched on the free-text model name.
    Model,
    /// Matched on the IATA/ICAO type code.
    TypeCode,
    Default,
}
