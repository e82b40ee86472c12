use dsp_seed_rules::profile::clone_profile;
use dsp_seed_rules::{
    Criteria, Galaxy, MemoryProfileStore, ProfileSettings, ProfileSnapshot, ProfileStore,
    SearchParams, SpectrType, Star, StarType,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Galaxies with at least two black holes or neutron stars and an O-type
/// star within 10 ly of the start.
const CRITERIA: &str = r#"{
  "type": "Galaxy",
  "rules": [
    [{
      "condition": { "type": "Gte", "value": 2 },
      "rules": [[{ "type": "StarType", "starType": ["BlackHole", "NeutronStar"] }]]
    }],
    [{
      "condition": { "type": "Gte", "value": 1 },
      "rules": [
        [{ "type": "Spectr", "spectr": ["O"] }],
        [{ "type": "Birth", "condition": { "type": "Lte", "value": 10 } }]
      ]
    }]
  ]
}"#;

fn generate(seed: u32, params: SearchParams) -> Galaxy {
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let stars = (0..params.count)
        .map(|index| {
            let roll: f64 = rng.gen();
            let star_type = if roll < 0.03 {
                StarType::BlackHole
            } else if roll < 0.06 {
                StarType::NeutronStar
            } else {
                StarType::MainSeqStar
            };
            Star {
                index,
                position: [
                    rng.gen_range(-30.0..30.0),
                    rng.gen_range(-30.0..30.0),
                    rng.gen_range(-5.0..5.0),
                ],
                star_type,
                spectr: SpectrType::ALL[rng.gen_range(0..7)],
                luminosity: rng.gen_range(0.2..2.5),
                dyson_radius: rng.gen_range(1.0..6.0),
                planets: Vec::new(),
            }
        })
        .collect();
    Galaxy { seed, stars }
}

fn main() {
    let criteria: Criteria = serde_json::from_str(CRITERIA).expect("malformed criteria");
    let search = SearchParams::default();
    let settings = ProfileSettings::new("remnants", criteria, search, 0, 500)
        .expect("bad seed range");
    let predicate = settings.criteria.compile().expect("invalid criteria");
    let id = settings.id.clone();

    let mut store = MemoryProfileStore::new();
    store.put_settings(settings).expect("failed to save profile");

    let found: Vec<Galaxy> = (0..500)
        .filter_map(|seed| predicate.search(&generate(seed, search)))
        .collect();
    store
        .save_progress(&id, 500, &found)
        .expect("failed to save progress");

    for galaxy in &found {
        let indices: Vec<String> = galaxy.stars.iter().map(|s| s.index.to_string()).collect();
        println!("seed {:>3}: stars {}", galaxy.seed, indices.join(", "));
    }

    let snapshot = ProfileSnapshot::capture(&store, &id).expect("unknown profile");
    println!(
        "{} records, {:.0}% of range searched",
        snapshot.records.len(),
        snapshot.settings.progress() * 100.0
    );

    let copy = clone_profile(&mut store, &id).expect("failed to clone profile");
    println!("cloned into {copy}");
}
