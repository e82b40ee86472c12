use std::time::Instant;

use crate::stats::{total_average_amount, total_average_patches};
use crate::{
    geometry, Clause, Composite, CompositeClause, CompositeRule, GasType, MatchReport, Planet,
    Rule, SimpleRule, SpectrType, Star, StarType, VeinType,
};

/// Measurements a star must expose for rules to be evaluated against it.
///
/// Implemented for the [`Star`] record; a generator with its own star
/// representation can implement it directly instead of converting.
pub trait StarMetrics {
    fn luminosity(&self) -> f64;
    fn dyson_radius(&self) -> f64;
    fn spectr(&self) -> SpectrType;
    fn star_type(&self) -> StarType;
    /// Sum of the average yield of every `vein` occurrence in the system.
    fn average_vein_amount(&self, vein: VeinType) -> f64;
    /// Sum of the expected patch count of every `vein` occurrence.
    fn average_vein_patch(&self, vein: VeinType) -> f64;
    fn tidal_lock_count(&self) -> usize;
    fn has_ocean(&self, ocean_type: u32) -> bool;
    /// Number of gas giants producing `gas`.
    fn gas_count(&self, gas: GasType) -> usize;
    fn satellite_count(&self) -> usize;
    fn distance_from_birth(&self) -> f64;
}

impl StarMetrics for Star {
    fn luminosity(&self) -> f64 {
        self.luminosity
    }

    fn dyson_radius(&self) -> f64 {
        self.dyson_radius
    }

    fn spectr(&self) -> SpectrType {
        self.spectr
    }

    fn star_type(&self) -> StarType {
        self.star_type
    }

    fn average_vein_amount(&self, vein: VeinType) -> f64 {
        total_average_amount(&self.planets, vein)
    }

    fn average_vein_patch(&self, vein: VeinType) -> f64 {
        total_average_patches(&self.planets, vein)
    }

    fn tidal_lock_count(&self) -> usize {
        self.planets.iter().filter(|p| p.tidal_locked).count()
    }

    // A dry planet has no ocean to find.
    fn has_ocean(&self, ocean_type: u32) -> bool {
        ocean_type != Planet::NO_OCEAN
            && self.planets.iter().any(|p| p.ocean_type == ocean_type)
    }

    fn gas_count(&self, gas: GasType) -> usize {
        self.planets
            .iter()
            .filter(|p| p.gases.iter().any(|g| g.gas_type == gas))
            .count()
    }

    fn satellite_count(&self) -> usize {
        self.planets.iter().filter(|p| p.is_satellite()).count()
    }

    fn distance_from_birth(&self) -> f64 {
        geometry::distance_from_birth(self.position)
    }
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> f64 {
    n as f64
}

impl SimpleRule {
    /// Evaluate this rule against one star. An unset rule never matches.
    #[must_use]
    pub fn matches<S: StarMetrics + ?Sized>(&self, star: &S) -> bool {
        match self {
            SimpleRule::Unset => false,
            SimpleRule::Luminosity { condition } => condition.matches(star.luminosity()),
            SimpleRule::DysonRadius { condition } => condition.matches(star.dyson_radius()),
            SimpleRule::AverageVeinAmount { vein, condition } => {
                condition.matches(star.average_vein_amount(*vein))
            }
            SimpleRule::AverageVeinPatch { vein, condition } => {
                condition.matches(star.average_vein_patch(*vein))
            }
            SimpleRule::Spectr { spectr } => spectr.contains(&star.spectr()),
            SimpleRule::TidalLockCount { condition } => {
                condition.matches(count(star.tidal_lock_count()))
            }
            SimpleRule::OceanType { ocean_type } => star.has_ocean(*ocean_type),
            SimpleRule::StarType { star_type } => star_type.contains(&star.star_type()),
            SimpleRule::GasCount { gas, condition } => {
                condition.matches(count(star.gas_count(*gas)))
            }
            SimpleRule::SatelliteCount { condition } => {
                condition.matches(count(star.satellite_count()))
            }
            SimpleRule::Birth { condition } => condition.matches(star.distance_from_birth()),
        }
    }
}

impl Clause {
    /// True if any rule of the clause matches.
    #[must_use]
    pub fn matches<S: StarMetrics + ?Sized>(&self, star: &S) -> bool {
        self.rules().iter().any(|r| r.matches(star))
    }
}

impl Rule {
    /// True if every clause matches.
    #[must_use]
    pub fn matches<S: StarMetrics + ?Sized>(&self, star: &S) -> bool {
        self.clauses().iter().all(|c| c.matches(star))
    }

    /// Evaluate every clause without short-circuiting and report the
    /// per-clause outcome.
    pub fn explain<S: StarMetrics + ?Sized>(&self, star: &S) -> MatchReport {
        let start = Instant::now();
        let clauses: Vec<bool> = self.clauses().iter().map(|c| c.matches(star)).collect();
        MatchReport::new(clauses, start.elapsed())
    }

    /// The stars of `stars` this rule matches, in order.
    pub fn filter<'a, S: StarMetrics>(&'a self, stars: &'a [S]) -> impl Iterator<Item = &'a S> {
        stars.iter().filter(move |s| self.matches(*s))
    }
}

impl Composite {
    /// Count the stars matching the per-star rule and test the count.
    #[must_use]
    pub fn matches<S: StarMetrics>(&self, stars: &[S]) -> bool {
        let n = stars.iter().filter(|s| self.rule.matches(*s)).count();
        self.condition.matches(count(n))
    }
}

impl CompositeClause {
    #[must_use]
    pub fn matches<S: StarMetrics>(&self, stars: &[S]) -> bool {
        self.composites().iter().any(|c| c.matches(stars))
    }
}

impl CompositeRule {
    /// Evaluate against every star of one galaxy.
    #[must_use]
    pub fn matches<S: StarMetrics>(&self, stars: &[S]) -> bool {
        self.clauses().iter().all(|c| c.matches(stars))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        construct_multi_rule, construct_rule, Condition, Gas, GasType, MultiRule, Planet,
        PlanetType, SimpleRule, SpectrType, Star, StarType, Vein, VeinType,
    };

    fn planet(index: u32) -> Planet {
        Planet {
            index,
            planet_type: PlanetType::Desert,
            theme: 6,
            ocean_type: 0,
            tidal_locked: false,
            orbit_around: None,
            veins: vec![],
            gases: vec![],
        }
    }

    fn star(spectr: SpectrType, position: [f64; 3]) -> Star {
        let mut ocean = planet(0);
        ocean.planet_type = PlanetType::Ocean;
        ocean.ocean_type = 1000;
        ocean.tidal_locked = true;
        ocean.veins.push(Vein {
            vein_type: VeinType::Oil,
            min_group: 1.0,
            max_group: 1.0,
            min_patch: 1.0,
            max_patch: 1.0,
            min_amount: 50000.0,
            max_amount: 50000.0,
        });
        let mut moon = planet(1);
        moon.orbit_around = Some(0);
        let mut giant = planet(2);
        giant.planet_type = PlanetType::Gas;
        giant.gases.push(Gas {
            gas_type: GasType::Hydrogen,
            rate: 0.8,
        });
        Star {
            index: 0,
            position,
            star_type: StarType::MainSeqStar,
            spectr,
            luminosity: 1.2,
            dyson_radius: 2.5,
            planets: vec![ocean, moon, giant],
        }
    }

    #[test]
    fn dry_ocean_id_never_matches() {
        let s = star(SpectrType::K, [0.0; 3]);
        assert!(s.planets.iter().any(|p| p.ocean_type == Planet::NO_OCEAN));
        let dry = SimpleRule::OceanType {
            ocean_type: Planet::NO_OCEAN,
        };
        assert!(!dry.matches(&s));
        assert!(SimpleRule::OceanType { ocean_type: 1000 }.matches(&s));
    }

    #[test]
    fn simple_rules_against_star() {
        let s = star(SpectrType::K, [3.0, 4.0, 0.0]);
        let hold = [
            SimpleRule::Luminosity {
                condition: Condition::gt(1.0),
            },
            SimpleRule::DysonRadius {
                condition: Condition::between(2.0, 3.0),
            },
            SimpleRule::Spectr {
                spectr: vec![SpectrType::G, SpectrType::K],
            },
            SimpleRule::TidalLockCount {
                condition: Condition::eq(1.0),
            },
            SimpleRule::OceanType { ocean_type: 1000 },
            SimpleRule::StarType {
                star_type: vec![StarType::MainSeqStar],
            },
            SimpleRule::GasCount {
                gas: GasType::Hydrogen,
                condition: Condition::gte(1.0),
            },
            SimpleRule::SatelliteCount {
                condition: Condition::eq(1.0),
            },
            SimpleRule::Birth {
                condition: Condition::lte(5.0),
            },
            SimpleRule::AverageVeinPatch {
                vein: VeinType::Oil,
                condition: Condition::eq(1.0),
            },
        ];
        for rule in &hold {
            assert!(rule.matches(&s), "expected {rule} to match");
        }
        assert!(!SimpleRule::Unset.matches(&s));
        assert!(!SimpleRule::GasCount {
            gas: GasType::Deuterium,
            condition: Condition::gte(1.0),
        }
        .matches(&s));
    }

    #[test]
    fn oil_rule_matches_after_unit_conversion() {
        let s = star(SpectrType::K, [0.0, 0.0, 0.0]);
        let entered = vec![vec![SimpleRule::AverageVeinAmount {
            vein: VeinType::Oil,
            condition: Condition::eq(2.0),
        }]];
        assert!(construct_rule(&entered).matches(&s));
    }

    #[test]
    fn and_of_or_semantics() {
        let s = star(SpectrType::M, [10.0, 0.0, 0.0]);
        let near = SimpleRule::Birth {
            condition: Condition::lt(5.0),
        };
        let red = SimpleRule::Spectr {
            spectr: vec![SpectrType::M],
        };
        assert!(construct_rule(&[vec![near.clone(), red.clone()]]).matches(&s));
        assert!(!construct_rule(&[vec![near.clone()], vec![red.clone()]]).matches(&s));

        let report = construct_rule(&[vec![near], vec![red]]).explain(&s);
        assert!(!report.matched());
        assert_eq!(report.clause_results(), &[false, true]);
    }

    #[test]
    fn filter_keeps_matching_stars() {
        let stars = vec![
            star(SpectrType::K, [1.0, 0.0, 0.0]),
            star(SpectrType::O, [2.0, 0.0, 0.0]),
        ];
        let rule = construct_rule(&[vec![SimpleRule::Spectr {
            spectr: vec![SpectrType::O],
        }]]);
        let found: Vec<_> = rule.filter(&stars).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].spectr, SpectrType::O);
    }

    #[test]
    fn composite_counts_matching_stars() {
        let stars = vec![
            star(SpectrType::K, [1.0, 0.0, 0.0]),
            star(SpectrType::K, [2.0, 0.0, 0.0]),
            star(SpectrType::O, [3.0, 0.0, 0.0]),
        ];
        let two_k = MultiRule {
            condition: Condition::eq(2.0),
            rules: vec![vec![SimpleRule::Spectr {
                spectr: vec![SpectrType::K],
            }]],
        };
        let three_o = MultiRule {
            condition: Condition::gte(3.0),
            rules: vec![vec![SimpleRule::Spectr {
                spectr: vec![SpectrType::O],
            }]],
        };
        assert!(construct_multi_rule(&[vec![two_k.clone()]]).matches(&stars));
        assert!(!construct_multi_rule(&[vec![three_o.clone()]]).matches(&stars));
        assert!(construct_multi_rule(&[vec![three_o.clone(), two_k.clone()]]).matches(&stars));
        assert!(!construct_multi_rule(&[vec![three_o], vec![two_k]]).matches(&stars));
    }
}
