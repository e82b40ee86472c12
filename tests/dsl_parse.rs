use dsp_seed_rules::{
    Clause, Condition, GasType, Gas, Planet, PlanetType, Rule, RuleError, SeedRuleError,
    SimpleRule, SpectrType, Star, StarType, Vein, VeinType,
};

fn planet(index: u32) -> Planet {
    Planet {
        index,
        planet_type: PlanetType::Desert,
        theme: 1,
        ocean_type: 0,
        tidal_locked: false,
        orbit_around: None,
        veins: Vec::new(),
        gases: Vec::new(),
    }
}

fn oil_vein(amount: f64) -> Vein {
    Vein {
        vein_type: VeinType::Oil,
        min_group: 1.0,
        max_group: 1.0,
        min_patch: 1.0,
        max_patch: 1.0,
        min_amount: amount,
        max_amount: amount,
    }
}

fn star() -> Star {
    let mut ocean = planet(0);
    ocean.planet_type = PlanetType::Ocean;
    ocean.ocean_type = 1000;
    ocean.tidal_locked = true;
    ocean.veins.push(oil_vein(75_000.0));

    let mut giant = planet(1);
    giant.planet_type = PlanetType::Gas;
    giant.gases.push(Gas {
        gas_type: GasType::Deuterium,
        rate: 0.4,
    });

    let mut moon = planet(2);
    moon.orbit_around = Some(1);

    Star {
        index: 3,
        position: [3.0, 4.0, 0.0],
        star_type: StarType::MainSeqStar,
        spectr: SpectrType::K,
        luminosity: 1.2,
        dyson_radius: 3.5,
        planets: vec![ocean, giant, moon],
    }
}

#[test]
fn dsl_parse_and_evaluate() {
    let dsl = r"
luminosity > 1
AND spectr in [K, G]
AND birth <= 5
";

    let rule = Rule::from_dsl(dsl).unwrap();
    assert_eq!(rule.clauses().len(), 3);
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_or_group() {
    let rule = Rule::from_dsl("luminosity > 2 OR dyson_radius >= 3").unwrap();
    assert!(matches!(rule, Rule::Clause(Clause::Or(_))));
    assert!(rule.matches(&star()));

    let rule = Rule::from_dsl("luminosity > 2 OR dyson_radius >= 4").unwrap();
    assert!(!rule.matches(&star()));
}

#[test]
fn dsl_or_binds_tighter_than_and() {
    // (luminosity > 2 OR birth < 10) AND satellite_count == 0
    let rule = Rule::from_dsl("luminosity > 2 OR birth < 10 AND satellite_count == 0").unwrap();
    assert_eq!(rule.clauses().len(), 2);
    assert!(!rule.matches(&star()));

    let rule = Rule::from_dsl("luminosity > 2 OR birth < 10 AND satellite_count == 1").unwrap();
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_oil_amount_is_converted() {
    let rule = Rule::from_dsl("avg_vein_amount(Oil) >= 3").unwrap();
    assert_eq!(
        rule,
        Rule::from(SimpleRule::AverageVeinAmount {
            vein: VeinType::Oil,
            condition: Condition::gte(75_000.0),
        })
    );
    assert!(rule.matches(&star()));
    assert!(!Rule::from_dsl("avg_vein_amount(Oil) > 3").unwrap().matches(&star()));
}

#[test]
fn dsl_every_rule_kind() {
    let dsl = r"
luminosity between(1, 2)
AND dyson_radius not between(0, 1)
AND avg_vein_patch(Oil) == 1
AND tidal_lock_count >= 1
AND ocean_type == 1000
AND star_type in [MainSeqStar]
AND gas_count(Deuterium) == 1
AND satellite_count < 2
";
    let rule = Rule::from_dsl(dsl).unwrap();
    assert_eq!(rule.clauses().len(), 8);
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_comments_are_ignored() {
    let dsl = r"
# stars close to the start
birth < 10 # light years
";
    let rule = Rule::from_dsl(dsl).unwrap();
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_parse_error_has_location() {
    let err = Rule::from_dsl("luminosity > 1 AND brightness > 2").unwrap_err();
    match err {
        SeedRuleError::Parse(e) => assert!(e.offset() >= 19, "offset {}", e.offset()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn dsl_validation_error_propagates() {
    let err = Rule::from_dsl("").unwrap_err();
    assert!(matches!(err, SeedRuleError::Rule(RuleError::NoGroups)));

    let err = Rule::from_dsl("birth < 5 OR none").unwrap_err();
    assert!(matches!(
        err,
        SeedRuleError::Rule(RuleError::UnsetRule { group: 0, index: 1 })
    ));
}

#[test]
fn dsl_display_round_trip() {
    let dsl = "spectr in [M, K] OR luminosity >= 1.5\nAND gas_count(Hydrogen) > 0";
    let rule = Rule::from_dsl(dsl).unwrap();
    assert_eq!(rule.to_string(), dsl);
    assert_eq!(Rule::from_dsl(&rule.to_string()).unwrap(), rule);
}

#[test]
fn oil_text_reads_back_without_rescaling() {
    let dsl = "avg_vein_amount(Oil) between(1, 4)\nAND birth < 20";
    let rule = Rule::from_dsl(dsl).unwrap();
    assert_eq!(rule.to_string(), dsl);
    assert_eq!(Rule::from_dsl(&rule.to_string()).unwrap(), rule);
}

#[test]
fn dsl_negative_number() {
    let rule = Rule::from_dsl("luminosity > -1").unwrap();
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_from_file() {
    let rule = Rule::from_file("demos/near_oil.rules").unwrap();
    assert!(rule.matches(&star()));
}

#[test]
fn dsl_from_missing_file() {
    let err = Rule::from_file("demos/does_not_exist.rules").unwrap_err();
    assert!(matches!(err, SeedRuleError::Io(_)));
}
