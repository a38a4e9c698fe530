// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Turning provider timestamps into real UTC instants.
//!
//! Some providers tag local wall-clock times with a `+00:00` suffix even though
//! the value is local to the airport. The suffix is therefore discarded and the
//! offset is recomputed from the IANA zone name for that specific date.

use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// How an instant was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeBasis {
    /// The provider supplied a genuine UTC value.
    ProviderUtc,
    /// The provider's own offset suffix was trusted.
    OffsetTagged,
    /// Local wall clock corrected with the zone's offset on that date.
    ZoneCorrected,
    /// The zone name was not recognised; the wall clock was taken as UTC.
    Uncorrected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInstant {
    pub instant: DateTime<Utc>,
    pub basis: TimeBasis,
}

fn offset_suffix() -> &'static Regex {
    static RE_OFFSET: OnceLock<Regex> = OnceLock::new();
    RE_OFFSET.get_or_init(|| Regex::new(r"(?:[Zz]|[+-]\d{2}:?\d{2})$").unwrap())
}

/// Removes a trailing `Z` or numeric UTC offset, leaving the wall clock.
pub fn strip_offset_suffix(timestamp: &str) -> &str {
    let trimmed = timestamp.trim();
    match offset_suffix().find(trimmed) {
        Some(m) => trimmed[..m.start()].trim_end(),
        None => trimmed,
    }
}

/// Parses a wall clock (offset already stripped) without applying any zone.
pub fn parse_naive(wall_clock: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(wall_clock, fmt).ok())
}

/// Offset of `tz` from UTC, in minutes, at the given instant.
pub fn zone_offset_minutes(tz: &Tz, at_utc: &NaiveDateTime) -> i64 {
    i64::from(tz.offset_from_utc_datetime(at_utc).fix().local_minus_utc()) / 60
}

/// Converts a provider "local" timestamp plus zone name into a UTC instant.
///
/// Returns `None` only when the wall clock itself cannot be parsed. An
/// unknown zone never fails; the uncorrected instant is returned instead.
pub fn resolve_utc(local_timestamp: &str, timezone_name: &str) -> Option<ResolvedInstant> {
    let naive = match parse_naive(strip_offset_suffix(local_timestamp)) {
        Some(n) => n,
        None => {
            log::warn!("[Time] Unparseable timestamp '{}'", local_timestamp);
            return None;
        }
    };

    let tz: Tz = match timezone_name.trim().parse() {
        Ok(tz) => tz,
        Err(_) => {
            log::warn!(
                "[Time] Unknown timezone '{}' for '{}'; keeping uncorrected wall clock",
                timezone_name,
                local_timestamp
            );
            return Some(ResolvedInstant {
                instant: naive.and_utc(),
                basis: TimeBasis::Uncorrected,
            });
        }
    };

    // Ambiguous wall clocks (clocks going back) take the earlier instant
    let instant = match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            // Skipped by a spring-forward gap; apply the offset in force at that reading
            let offset = zone_offset_minutes(&tz, &naive);
            log::debug!(
                "[Time] {} does not exist in {}; applying offset {:+} min",
                local_timestamp,
                timezone_name,
                offset
            );
            naive.and_utc() - TimeDelta::minutes(offset)
        }
    };
    log::debug!("[Time] {} in {} -> {}", local_timestamp, timezone_name, instant);

    Some(ResolvedInstant {
        instant,
        basis: TimeBasis::ZoneCorrected,
    })
}

/// Parses a timestamp that is known to be UTC, such as `2026-02-11 15:05Z`.
pub fn parse_provider_utc(timestamp: &str) -> Option<ResolvedInstant> {
    let naive = parse_naive(strip_offset_suffix(timestamp))?;
    Some(ResolvedInstant {
        instant: naive.and_utc(),
        basis: TimeBasis::ProviderUtc,
    })
}

/// Parses a timestamp whose offset suffix is trusted, e.g. `2026-02-11 16:05+01:00`.
pub fn parse_offset_tagged(timestamp: &str) -> Option<ResolvedInstant> {
    let trimmed = timestamp.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(trimmed, fmt).ok())
    })?;
    Some(ResolvedInstant {
        instant: parsed.with_timezone(&Utc),
        basis: TimeBasis::OffsetTagged,
    })
}
