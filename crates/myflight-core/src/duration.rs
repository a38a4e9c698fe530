// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::NormalizerConfig;
use crate::geo::{haversine_km, GeoCoordinate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: i64 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationMethod {
    /// Difference between the resolved scheduled instants.
    Scheduled,
    /// Great-circle distance at a fixed block speed.
    DistanceFallback,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimate {
    pub minutes: Option<u32>,
    pub method: DurationMethod,
}

impl DurationEstimate {
    fn unavailable() -> Self {
        Self {
            minutes: None,
            method: DurationMethod::Unavailable,
        }
    }
}

/// Rounded minutes between two instants. A negative difference is taken as a
/// midnight rollover and wrapped into the following day.
pub fn scheduled_minutes(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> i64 {
    let raw = ((arrival - departure).num_seconds() as f64 / 60.0).round() as i64;
    wrap_negative(raw)
}

/// Adds one day to a negative minute count. Anything still negative after that
/// is wrapped as well, so the result is never below zero.
pub fn wrap_negative(minutes: i64) -> i64 {
    if minutes < 0 {
        minutes.rem_euclid(MINUTES_PER_DAY)
    } else {
        minutes
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimator {
    /// Below this the scheduled value is treated as a timezone error.
    pub min_plausible_minutes: i64,
    pub cruise_km_per_minute: f64,
    /// Flat taxi, climb and descent allowance added to the cruise time.
    pub ground_allowance_minutes: f64,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}

impl DurationEstimator {
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self {
            min_plausible_minutes: config.min_plausible_minutes,
            cruise_km_per_minute: config.cruise_km_per_minute,
            ground_allowance_minutes: config.ground_allowance_minutes,
        }
    }

    pub fn estimate(
        &self,
        departure_utc: Option<DateTime<Utc>>,
        arrival_utc: Option<DateTime<Utc>>,
        departure_coord: Option<GeoCoordinate>,
        arrival_coord: Option<GeoCoordinate>,
    ) -> DurationEstimate {
        if let (Some(dep), Some(arr)) = (departure_utc, arrival_utc) {
            let minutes = scheduled_minutes(dep, arr);
            if minutes >= self.min_plausible_minutes {
                return DurationEstimate {
                    minutes: u32::try_from(minutes).ok(),
                    method: DurationMethod::Scheduled,
                };
            }
            log::warn!(
                "[Duration] Scheduled duration of {} min is implausible (< {}); trying distance estimate",
                minutes,
                self.min_plausible_minutes
            );
        }

        match (departure_coord, arrival_coord) {
            (Some(dep), Some(arr)) => DurationEstimate {
                minutes: Some(self.distance_minutes(haversine_km(&dep, &arr))),
                method: DurationMethod::DistanceFallback,
            },
            _ => {
                log::debug!("[Duration] No usable times or coordinates; duration unavailable");
                DurationEstimate::unavailable()
            }
        }
    }

    /// Block time for a great-circle distance.
    pub fn distance_minutes(&self, distance_km: f64) -> u32 {
        (distance_km / self.cruise_km_per_minute + self.ground_allowance_minutes)
            .round()
            .max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        chrono::NaiveDate::from_ymd_opt(2026, 2, 11)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    const MAD: GeoCoordinate = GeoCoordinate {
        lat: 40.47,
        lon: -3.56,
    };
    const LHR: GeoCoordinate = GeoCoordinate {
        lat: 51.47,
        lon: -0.45,
    };

    #[test]
    fn test_scheduled_path() {
        let est = DurationEstimator::default();
        let r = est.estimate(Some(at(15, 5)), Some(at(16, 40)), None, None);
        assert_eq!(r.minutes, Some(95));
        assert_eq!(r.method, DurationMethod::Scheduled);
    }

    #[test]
    fn test_negative_wraps_to_next_day() {
        assert_eq!(scheduled_minutes(at(16, 40), at(16, 10)), 1410);
        assert_eq!(wrap_negative(-30), 1410);
        assert_eq!(wrap_negative(-1440), 0);
        assert_eq!(wrap_negative(-1500), 1380);
        assert_eq!(wrap_negative(0), 0);
        assert_eq!(wrap_negative(2000), 2000);
    }

    #[test]
    fn test_scheduled_is_never_negative() {
        let base = at(12, 0);
        for offset in (-3000..3000).step_by(7) {
            let arr = base + TimeDelta::minutes(offset);
            assert!(
                scheduled_minutes(base, arr) >= 0,
                "offset {} produced a negative duration",
                offset
            );
        }
    }

    #[test]
    fn test_rounds_to_nearest_minute() {
        let dep = at(10, 0);
        assert_eq!(scheduled_minutes(dep, dep + TimeDelta::seconds(90 * 60 + 29)), 90);
        assert_eq!(scheduled_minutes(dep, dep + TimeDelta::seconds(90 * 60 + 31)), 91);
    }

    #[test]
    fn test_implausible_short_uses_distance() {
        let est = DurationEstimator::default();
        // 5 minutes MAD-LHR is a timezone artefact
        let r = est.estimate(Some(at(15, 5)), Some(at(15, 10)), Some(MAD), Some(LHR));
        assert_eq!(r.method, DurationMethod::DistanceFallback);
        assert_eq!(r.minutes, Some(122));
    }

    #[test]
    fn test_threshold_boundary() {
        let est = DurationEstimator::default();
        let r = est.estimate(Some(at(10, 0)), Some(at(10, 20)), Some(MAD), Some(LHR));
        assert_eq!(r.method, DurationMethod::Scheduled);
        assert_eq!(r.minutes, Some(20));

        let r = est.estimate(Some(at(10, 0)), Some(at(10, 19)), Some(MAD), Some(LHR));
        assert_eq!(r.method, DurationMethod::DistanceFallback);
    }

    #[test]
    fn test_missing_times_uses_distance() {
        let est = DurationEstimator::default();
        let r = est.estimate(None, Some(at(10, 0)), Some(MAD), Some(LHR));
        assert_eq!(r.method, DurationMethod::DistanceFallback);
        let expected = (haversine_km(&MAD, &LHR) / 13.5 + 30.0).round() as u32;
        assert_eq!(r.minutes, Some(expected));
    }

    #[test]
    fn test_nothing_usable() {
        let est = DurationEstimator::default();
        let r = est.estimate(None, None, Some(MAD), None);
        assert_eq!(r, DurationEstimate::unavailable());

        // Implausible schedule and no coordinates: absent rather than wrong
        let r = est.estimate(Some(at(10, 0)), Some(at(10, 5)), None, Some(LHR));
        assert_eq!(r.minutes, None);
        assert_eq!(r.method, DurationMethod::Unavailable);
    }

    #[test]
    fn test_distance_minutes_formula() {
        let est = DurationEstimator::default();
        assert_eq!(est.distance_minutes(0.0), 30);
        assert_eq!(est.distance_minutes(810.0), 90);
        assert_eq!(est.distance_minutes(1264.0), 124);
    }
}
