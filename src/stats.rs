use crate::{Planet, VeinStat, Vein, VeinType};

/// Yield range of a vein occurrence.
///
/// `avg` multiplies the sums of each min/max pair and divides by 8, i.e.
/// the product of the three range midpoints.
#[must_use]
pub fn stat_vein(vein: &Vein) -> VeinStat {
    let min = vein.min_group * vein.min_patch * vein.min_amount;
    let max = vein.max_group * vein.max_patch * vein.max_amount;
    let avg = (vein.min_group + vein.max_group)
        * (vein.min_patch + vein.max_patch)
        * (vein.min_amount + vein.max_amount)
        / 8.0;
    VeinStat {
        vein_type: vein.vein_type,
        min,
        max,
        avg,
    }
}

/// Expected number of patches of a vein occurrence.
#[must_use]
pub fn average_patches(vein: &Vein) -> f64 {
    (vein.min_group + vein.max_group) * (vein.min_patch + vein.max_patch) / 4.0
}

/// Sum of the average yield of every `vein_type` occurrence on `planets`.
#[must_use]
pub fn total_average_amount(planets: &[Planet], vein_type: VeinType) -> f64 {
    veins_of(planets, vein_type).map(|v| stat_vein(v).avg).sum()
}

/// Sum of the expected patch counts of every `vein_type` occurrence.
#[must_use]
pub fn total_average_patches(planets: &[Planet], vein_type: VeinType) -> f64 {
    veins_of(planets, vein_type).map(average_patches).sum()
}

fn veins_of(planets: &[Planet], vein_type: VeinType) -> impl Iterator<Item = &Vein> {
    planets
        .iter()
        .flat_map(|p| p.veins.iter())
        .filter(move |v| v.vein_type == vein_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlanetType;

    fn vein(vein_type: VeinType) -> Vein {
        Vein {
            vein_type,
            min_group: 1.0,
            max_group: 3.0,
            min_patch: 2.0,
            max_patch: 4.0,
            min_amount: 10000.0,
            max_amount: 30000.0,
        }
    }

    #[test]
    fn stat_vein_reference_values() {
        let stat = stat_vein(&vein(VeinType::Iron));
        assert_eq!(stat.vein_type, VeinType::Iron);
        assert_eq!(stat.min, 20000.0);
        assert_eq!(stat.max, 360000.0);
        assert_eq!(stat.avg, 120000.0);
    }

    #[test]
    fn average_is_not_product_of_extremes_mean() {
        let stat = stat_vein(&vein(VeinType::Iron));
        assert_ne!(stat.avg, (stat.min + stat.max) / 2.0);
    }

    #[test]
    fn average_patches_reference_value() {
        assert_eq!(average_patches(&vein(VeinType::Copper)), 6.0);
    }

    #[test]
    fn totals_sum_matching_veins_only() {
        let planets = vec![
            Planet {
                index: 0,
                planet_type: PlanetType::Desert,
                theme: 6,
                ocean_type: 0,
                tidal_locked: false,
                orbit_around: None,
                veins: vec![vein(VeinType::Iron), vein(VeinType::Coal)],
                gases: vec![],
            },
            Planet {
                index: 1,
                planet_type: PlanetType::Ice,
                theme: 10,
                ocean_type: 0,
                tidal_locked: true,
                orbit_around: None,
                veins: vec![vein(VeinType::Iron)],
                gases: vec![],
            },
        ];
        assert_eq!(total_average_amount(&planets, VeinType::Iron), 240000.0);
        assert_eq!(total_average_patches(&planets, VeinType::Iron), 12.0);
        assert_eq!(total_average_amount(&planets, VeinType::Mag), 0.0);
    }
}
