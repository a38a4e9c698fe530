use myflight_core::aircraft::{AircraftClassifier, AirframeCode, Matcher, RULES};

#[test]
fn test_every_pattern_classifies_to_its_own_code() {
    for rule in RULES {
        for matcher in rule.matchers {
            let sample = match matcher {
                Matcher::Contains(needle) => needle.to_string(),
                Matcher::AllOf(parts) => parts.join(" "),
            };
            assert_eq!(
                AircraftClassifier::classify(Some(&sample)),
                rule.code,
                "pattern '{}' should map to {}",
                sample,
                rule.code
            );
        }
    }
}

#[test]
fn test_embraer_spellings() {
    for ident in ["ERJ-190", "E190", "Embraer E190", "ERJ190", "E90"] {
        assert_eq!(
            AircraftClassifier::classify(Some(ident)),
            AirframeCode::E190,
            "{} should be an E190",
            ident
        );
    }
    assert_eq!(AircraftClassifier::classify(Some("E195")), AirframeCode::E195);
}

#[test]
fn test_max_never_resolves_to_737ng() {
    let max = [
        "73H",
        "7M8",
        "7M9",
        "B38M",
        "B39M",
        "Boeing 737 MAX 8",
        "BOEING 737 MAX 9",
        "737 max",
    ];
    for ident in max {
        assert_eq!(
            AircraftClassifier::classify(Some(ident)),
            AirframeCode::B38M,
            "{} is a MAX and must not fall through to B738",
            ident
        );
    }

    for ident in ["Boeing 737-800", "738", "73W", "Boeing 737-900ER"] {
        assert_eq!(AircraftClassifier::classify(Some(ident)), AirframeCode::B738, "{}", ident);
    }
}

#[test]
fn test_neo_never_resolves_to_ceo() {
    for ident in ["A320neo", "Airbus A320 NEO", "32N", "A20N", "airbus a320neo"] {
        assert_eq!(
            AircraftClassifier::classify(Some(ident)),
            AirframeCode::A320Neo,
            "{}",
            ident
        );
    }
    for ident in ["A320", "Airbus A320-200", "320", "32A"] {
        assert_eq!(AircraftClassifier::classify(Some(ident)), AirframeCode::A320, "{}", ident);
    }
}

#[test]
fn test_real_world_model_strings() {
    let cases = [
        ("Airbus A321neo", AirframeCode::A321),
        ("Airbus A319", AirframeCode::A319),
        ("Airbus A330-300", AirframeCode::A330),
        ("Airbus A350-900", AirframeCode::A350),
        ("Airbus A380-800", AirframeCode::A380),
        ("Boeing 787-9", AirframeCode::B787),
        ("Boeing 777-300ER", AirframeCode::B777),
        ("77W", AirframeCode::B777),
        ("ATR 72-600", AirframeCode::Atr),
        ("AT7", AirframeCode::Atr),
        ("Bombardier CRJ-900", AirframeCode::Crj),
        ("De Havilland Canada Dash 8-400", AirframeCode::Crj),
        ("DH8", AirframeCode::Crj),
        ("DH4", AirframeCode::Crj),
    ];
    for (ident, expected) in cases {
        assert_eq!(
            AircraftClassifier::classify(Some(ident)),
            expected,
            "Failed to classify {}",
            ident
        );
    }
}

#[test]
fn test_unknown_identifiers_use_baseline() {
    for ident in ["", "Cessna 172", "Boeing 747-8", "zzz"] {
        assert_eq!(AircraftClassifier::classify(Some(ident)), AirframeCode::A320, "{}", ident);
    }
}
