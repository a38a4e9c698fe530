// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod index;

pub use index::{AirportGeoIndex, AirportInfo};

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A complete latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate only when both halves are present and on the globe.
    /// Providers regularly send one without the other; such halves are dropped.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if Self::in_range(lat, lon) => Some(Self::new(lat, lon)),
            _ => None,
        }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn in_range(lat: f64, lon: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
    }

    pub fn distance_km(&self, other: &GeoCoordinate) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two coordinates, in kilometres.
pub fn haversine_km(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
