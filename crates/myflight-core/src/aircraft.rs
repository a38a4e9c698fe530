// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed airframe taxonomy every flight is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AirframeCode {
    #[serde(rename = "A320neo")]
    A320Neo,
    A321,
    A319,
    /// Baseline narrow-body, used whenever nothing more specific is known.
    #[default]
    A320,
    A330,
    A350,
    A380,
    /// Boeing 737 MAX family.
    B38M,
    /// Boeing 737 Next Generation and older.
    B738,
    B787,
    B777,
    E190,
    E195,
    #[serde(rename = "ATR")]
    Atr,
    /// Regional jets and Dash 8 turboprops share one silhouette.
    #[serde(rename = "CRJ")]
    Crj,
}

impl AirframeCode {
    pub const ALL: [AirframeCode; 15] = [
        AirframeCode::A320Neo,
        AirframeCode::A321,
        AirframeCode::A319,
        AirframeCode::A320,
        AirframeCode::A330,
        AirframeCode::A350,
        AirframeCode::A380,
        AirframeCode::B38M,
        AirframeCode::B738,
        AirframeCode::B787,
        AirframeCode::B777,
        AirframeCode::E190,
        AirframeCode::E195,
        AirframeCode::Atr,
        AirframeCode::Crj,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AirframeCode::A320Neo => "A320neo",
            AirframeCode::A321 => "A321",
            AirframeCode::A319 => "A319",
            AirframeCode::A320 => "A320",
            AirframeCode::A330 => "A330",
            AirframeCode::A350 => "A350",
            AirframeCode::A380 => "A380",
            AirframeCode::B38M => "B38M",
            AirframeCode::B738 => "B738",
            AirframeCode::B787 => "B787",
            AirframeCode::B777 => "B777",
            AirframeCode::E190 => "E190",
            AirframeCode::E195 => "E195",
            AirframeCode::Atr => "ATR",
            AirframeCode::Crj => "CRJ",
        }
    }
}

impl fmt::Display for AirframeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single test against the upper-cased identifier.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Contains(&'static str),
    /// Every fragment must be present, in any order.
    AllOf(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, haystack: &str) -> bool {
        match self {
            Matcher::Contains(needle) => haystack.contains(needle),
            Matcher::AllOf(needles) => needles.iter().all(|n| haystack.contains(n)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AirframeRule {
    pub code: AirframeCode,
    pub matchers: &'static [Matcher],
}

use Matcher::{AllOf, Contains};

/// Ordered rule table, first match wins.
///
/// Order is load-bearing: a variant must be listed before the family it would
/// otherwise also match ("A320 NEO" contains "A320", "737 MAX" contains "737").
/// Every fragment here is upper-case; inputs are upper-cased before matching.
/// Short equipment codes are IATA ("32N", "73H") or ICAO ("A20N", "B38M").
pub const RULES: &[AirframeRule] = &[
    AirframeRule {
        code: AirframeCode::A320Neo,
        matchers: &[AllOf(&["A320", "NEO"]), Contains("32N"), Contains("A20N")],
    },
    AirframeRule {
        code: AirframeCode::A321,
        matchers: &[
            Contains("A321"),
            Contains("A21N"),
            Contains("321"),
            Contains("32Q"),
            Contains("32B"),
        ],
    },
    AirframeRule {
        code: AirframeCode::A319,
        matchers: &[
            Contains("A319"),
            Contains("A19N"),
            Contains("319"),
            Contains("31N"),
        ],
    },
    AirframeRule {
        code: AirframeCode::A320,
        matchers: &[Contains("A320"), Contains("320"), Contains("32A")],
    },
    AirframeRule {
        code: AirframeCode::A330,
        matchers: &[
            Contains("A33"),
            Contains("330"),
            Contains("332"),
            Contains("333"),
            Contains("339"),
        ],
    },
    AirframeRule {
        code: AirframeCode::A350,
        matchers: &[
            Contains("A35"),
            Contains("350"),
            Contains("351"),
            Contains("359"),
        ],
    },
    AirframeRule {
        code: AirframeCode::A380,
        matchers: &[Contains("A38"), Contains("380"), Contains("388")],
    },
    // MAX before the generic 737 family
    AirframeRule {
        code: AirframeCode::B38M,
        matchers: &[
            AllOf(&["737", "MAX"]),
            Contains("7M7"),
            Contains("7M8"),
            Contains("7M9"),
            Contains("73H"),
            Contains("B37M"),
            Contains("B38M"),
            Contains("B39M"),
        ],
    },
    AirframeRule {
        code: AirframeCode::B738,
        matchers: &[
            Contains("737"),
            Contains("738"),
            Contains("739"),
            Contains("73G"),
            Contains("73W"),
        ],
    },
    AirframeRule {
        code: AirframeCode::B787,
        matchers: &[
            Contains("787"),
            Contains("788"),
            Contains("789"),
            Contains("78X"),
            Contains("B78"),
        ],
    },
    AirframeRule {
        code: AirframeCode::B777,
        matchers: &[
            Contains("777"),
            Contains("772"),
            Contains("773"),
            Contains("77W"),
            Contains("77L"),
            Contains("B77"),
        ],
    },
    AirframeRule {
        code: AirframeCode::E190,
        matchers: &[
            Contains("E190"),
            Contains("ERJ-190"),
            Contains("ERJ190"),
            Contains("E90"),
            Contains("190"),
        ],
    },
    AirframeRule {
        code: AirframeCode::E195,
        matchers: &[
            Contains("E195"),
            Contains("ERJ-195"),
            Contains("E95"),
            Contains("195"),
        ],
    },
    AirframeRule {
        code: AirframeCode::Atr,
        matchers: &[
            Contains("ATR"),
            Contains("AT4"),
            Contains("AT5"),
            Contains("AT7"),
        ],
    },
    AirframeRule {
        code: AirframeCode::Crj,
        matchers: &[
            Contains("CRJ"),
            Contains("DASH"),
            Contains("CR7"),
            Contains("CR9"),
            Contains("CRK"),
            Contains("DH8"),
            Contains("DH4"),
        ],
    },
];

pub struct AircraftClassifier;

impl AircraftClassifier {
    /// Maps a model name or equipment code to an airframe code.
    /// Missing or unrecognised input yields the baseline [`AirframeCode::A320`].
    pub fn classify(identifier: Option<&str>) -> AirframeCode {
        identifier
            .and_then(Self::match_identifier)
            .unwrap_or_default()
    }

    /// Like [`classify`](Self::classify) but without the default, so callers
    /// can try several identifiers before giving up.
    pub fn match_identifier(identifier: &str) -> Option<AirframeCode> {
        let upper = identifier.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }
        RULES
            .iter()
            .find(|rule| rule.matchers.iter().any(|m| m.matches(&upper)))
            .map(|rule| rule.code)
    }
}
