use serde::{Deserialize, Serialize};

use super::enums::{GasType, PlanetType, SpectrType, StarClass, StarType, VeinType};

/// Cartesian coordinates in light years, birth point at the origin.
pub type Position = [f64; 3];

/// A resource deposit on a planet, as produced by the galaxy generator.
///
/// Each `min_*`/`max_*` pair bounds one generation stage: how many groups
/// spawn, how many patches each group has, and how much each patch holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vein {
    pub vein_type: VeinType,
    pub min_group: f64,
    pub max_group: f64,
    pub min_patch: f64,
    pub max_patch: f64,
    pub min_amount: f64,
    pub max_amount: f64,
}

/// Yield summary derived from a [`Vein`] by [`stat_vein`](crate::stat_vein).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeinStat {
    pub vein_type: VeinType,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gas {
    pub gas_type: GasType,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub index: u32,
    pub planet_type: PlanetType,
    /// Numeric surface theme id.
    pub theme: u32,
    /// Item id of the surface liquid, [`Planet::NO_OCEAN`] when it has none.
    pub ocean_type: u32,
    pub tidal_locked: bool,
    /// Index of the planet this one orbits, if it is a satellite.
    #[serde(default)]
    pub orbit_around: Option<u32>,
    #[serde(default)]
    pub veins: Vec<Vein>,
    #[serde(default)]
    pub gases: Vec<Gas>,
}

impl Planet {
    /// `ocean_type` of a planet without surface liquid.
    pub const NO_OCEAN: u32 = 0;

    #[must_use]
    pub fn is_satellite(&self) -> bool {
        self.orbit_around.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    pub index: u32,
    pub position: Position,
    pub star_type: StarType,
    pub spectr: SpectrType,
    pub luminosity: f64,
    pub dyson_radius: f64,
    #[serde(default)]
    pub planets: Vec<Planet>,
}

impl Star {
    #[must_use]
    pub fn class(&self) -> StarClass {
        StarClass::classify(self.star_type, self.spectr)
    }
}

/// Every star generated from one seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Galaxy {
    pub seed: u32,
    pub stars: Vec<Star>,
}

impl Galaxy {
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.stars.iter().map(|s| s.position).collect()
    }
}
