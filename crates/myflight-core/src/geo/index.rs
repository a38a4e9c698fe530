// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::GeoCoordinate;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

const BUILTIN_AIRPORTS: &str = include_str!("airports.csv");

// Parsed once per process and shared by every Normalizer built on top of it.
static BUILTIN_INDEX: OnceLock<Arc<AirportGeoIndex>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub iata: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub coordinate: GeoCoordinate,
}

/// One line of an airport table: `iata,name,city,lat,lon`.
#[derive(Debug, Deserialize)]
struct AirportRow {
    iata: String,
    name: Option<String>,
    city: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<AirportRow> for AirportInfo {
    fn from(row: AirportRow) -> Self {
        Self {
            iata: normalize_code(&row.iata),
            name: row.name.filter(|s| !s.trim().is_empty()),
            city: row.city.filter(|s| !s.trim().is_empty()),
            coordinate: GeoCoordinate::new(row.lat, row.lon),
        }
    }
}

/// Read-only IATA -> coordinate table.
///
/// There is no way to mutate an index once built. Adding airports means
/// building a new index with [`AirportGeoIndex::merged_with`] and swapping the
/// `Arc` the callers hold, so concurrent readers never observe a partial table.
#[derive(Debug, Clone, Default)]
pub struct AirportGeoIndex {
    airports: HashMap<String, AirportInfo>,
}

impl AirportGeoIndex {
    /// The compiled-in airport table.
    pub fn builtin() -> Arc<AirportGeoIndex> {
        Arc::clone(BUILTIN_INDEX.get_or_init(|| {
            let index = Self::from_csv_reader(BUILTIN_AIRPORTS.as_bytes())
                .expect("Failed to parse built-in airports.csv");
            log::debug!("[GeoIndex] Built-in table loaded: {} airports", index.len());
            Arc::new(index)
        }))
    }

    pub fn from_airports<I>(airports: I) -> Self
    where
        I: IntoIterator<Item = AirportInfo>,
    {
        let airports = airports
            .into_iter()
            .map(|a| (normalize_code(&a.iata), a))
            .collect();
        Self { airports }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut airports = Vec::new();
        for (line, row) in rdr.deserialize::<AirportRow>().enumerate() {
            // +2: one for the header, one because enumerate starts at zero
            let row = row.with_context(|| format!("Invalid airport row at line {}", line + 2))?;
            if !GeoCoordinate::in_range(row.lat, row.lon) {
                anyhow::bail!(
                    "Invalid airport row at line {}: {} has no usable position ({}, {})",
                    line + 2,
                    row.iata,
                    row.lat,
                    row.lon
                );
            }
            airports.push(AirportInfo::from(row));
        }
        Ok(Self::from_airports(airports))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open airport table {}", path.display()))?;
        let index = Self::from_csv_reader(file)
            .with_context(|| format!("Failed to parse airport table {}", path.display()))?;
        log::info!(
            "[GeoIndex] Loaded {} airports from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Returns a new index containing this one's airports plus `extra`.
    /// Rows in `extra` replace existing rows with the same code.
    pub fn merged_with<I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = AirportInfo>,
    {
        let mut airports = self.airports.clone();
        for airport in extra {
            airports.insert(normalize_code(&airport.iata), airport);
        }
        Self { airports }
    }

    /// Exact code lookup. `None` means "no fallback coordinate available".
    pub fn lookup(&self, iata: &str) -> Option<GeoCoordinate> {
        self.get(iata).map(|a| a.coordinate)
    }

    pub fn get(&self, iata: &str) -> Option<&AirportInfo> {
        self.airports.get(&normalize_code(iata))
    }

    pub fn airports(&self) -> impl Iterator<Item = &AirportInfo> {
        self.airports.values()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
