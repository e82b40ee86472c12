use dsp_seed_rules::{
    Criteria, Galaxy, MemoryProfileStore, Planet, PlanetType, ProfileSettings, ProfileStore, Rule,
    SearchParams, SpectrType, Star, StarType, Vein, VeinType,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stand-in for the game's galaxy generator.
fn generate(seed: u32, params: SearchParams) -> Galaxy {
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let stars = (0..params.count)
        .map(|index| {
            let oil = rng.gen_range(0.0..80_000.0) * params.multipler;
            Star {
                index,
                position: [
                    rng.gen_range(-40.0..40.0),
                    rng.gen_range(-40.0..40.0),
                    rng.gen_range(-10.0..10.0),
                ],
                star_type: if rng.gen_bool(0.9) {
                    StarType::MainSeqStar
                } else {
                    StarType::GiantStar
                },
                spectr: SpectrType::ALL[rng.gen_range(0..7)],
                luminosity: rng.gen_range(0.2..2.5),
                dyson_radius: rng.gen_range(1.0..6.0),
                planets: vec![Planet {
                    index: 0,
                    planet_type: PlanetType::Desert,
                    theme: 1,
                    ocean_type: if rng.gen_bool(0.15) { 1000 } else { 0 },
                    tidal_locked: false,
                    orbit_around: None,
                    veins: vec![Vein {
                        vein_type: VeinType::Oil,
                        min_group: 1.0,
                        max_group: 1.0,
                        min_patch: 1.0,
                        max_patch: 1.0,
                        min_amount: oil,
                        max_amount: oil,
                    }],
                    gases: Vec::new(),
                }],
            }
        })
        .collect();
    Galaxy { seed, stars }
}

fn main() {
    let rule = Rule::from_file("demos/near_oil.rules").expect("failed to load rules");
    println!("{rule}\n");

    let text = std::fs::read_to_string("demos/near_oil.rules").expect("failed to read rules");
    let groups = dsp_seed_rules::parse::parse(&text).expect("failed to parse rules");
    let search = SearchParams::from_query_string("?count=48").expect("bad query");
    let settings = ProfileSettings::new(
        "oil near home",
        Criteria::Star { rules: groups },
        search,
        0,
        200,
    )
    .expect("bad seed range");
    let predicate = settings.criteria.compile().expect("invalid rules");
    let id = settings.id.clone();

    let mut store = MemoryProfileStore::new();
    store.put_settings(settings).expect("failed to save profile");

    let mut found = Vec::new();
    for seed in 0..200 {
        if let Some(hit) = predicate.search(&generate(seed, search)) {
            found.push(hit);
        }
        if seed % 50 == 49 {
            store
                .save_progress(&id, seed + 1, &found)
                .expect("failed to save progress");
            found.clear();
        }
    }

    let records = store.records(&id).expect("unknown profile");
    println!("{} stars found{}", records.len(), search.to_query_string());
    for record in records.iter().take(10) {
        println!("  seed {:>4} star {:>2}", record.seed, record.index);
    }
}
