use std::collections::BTreeMap;
use std::hash::Hasher;

use tidecast_game::{CaughtFish, TuningCatalog, TuningDocuments};
use twox_hash::XxHash64;

const WORLDS: &str = r#"{"worlds":[
  {"id":1,"name":"World 1","reelProgressRate":1.0,"fishWiggleStrength":1.0,
   "biteTimeBaseMs":2000,"biteTimeVarianceMs":1000,"reelBarScale":1.0,
   "map":{"width":32,"height":18,"centerWater":false,"waterRadius":6,"groundTile":"GROUND","waterTile":"WATER"}},
  {"id":2,"name":"World 2","reelProgressRate":0.6,"fishWiggleStrength":1.6,
   "biteTimeBaseMs":1400,"biteTimeVarianceMs":600,"reelBarScale":1.1,
   "map":{"width":32,"height":18,"centerWater":"true","waterRadius":6,"groundTile":"GROUND","waterTile":"WATER"}}
]}"#;

const FISH: &str = r#"{"fish":[
  {"id":"common_carp","displayName":"Common Carp","basePrice":20},
  {"id":"electric_eel","displayName":"Electric Eel","basePrice":120,
   "difficulty":{"reelRateMul":0.8,"wiggleMul":1.4,"biteSpeedMul":1.2}},
  {"id":"trout","displayName":"Trout","basePrice":25,"difficulty":{"wiggleMul":1.1}}
]}"#;

const CHARACTERS: &str = r#"{"characters":[
  {"id":"starter"},
  {"id":"Fisherman_Fin","stats":{"luck":0.15,"reelBarScaleBonus":0.10,"biteSpeedBonus":0.20}}
]}"#;

const RODS: &str = r#"{"rods":[
  {"id":"starter_rod","displayName":"Starter Rod"},
  {"id":"bamboo_rod","displayName":"Bamboo Rod","price":150,"reelBarScaleBonus":0.10,"luckBonus":0.05,"biteSpeedBonus":0.10,"goldenChanceBonus":0.05},
  {"id":"pro_rod","displayName":"Pro Rod","price":400,"reelBarScaleBonus":0.20,"luckBonus":0.10,"biteSpeedBonus":0.20,"goldenChanceBonus":0.12},
  {"id":"legend_rod","displayName":"Legend Rod","price":1200,"reelBarScaleBonus":0.35,"luckBonus":0.18,"biteSpeedBonus":0.30,"goldenChanceBonus":0.25}
]}"#;

fn documents() -> TuningDocuments {
    TuningDocuments {
        worlds: Some(WORLDS.to_string()),
        fish: Some(FISH.to_string()),
        characters: Some(CHARACTERS.to_string()),
        rods: Some(RODS.to_string()),
        quests: None,
    }
}

/// Every (world, character, rod, fish, golden) combination resolved at three
/// fixed bite rolls, keyed for a stable ordering.
fn resolution_table(catalog: &TuningCatalog) -> BTreeMap<String, serde_json::Value> {
    let mut table = BTreeMap::new();
    for world in catalog.worlds() {
        for character in ["starter", "Fisherman_Fin"] {
            for rod in catalog.rods() {
                for species in catalog.fishes() {
                    for golden in [false, true] {
                        let fish = CaughtFish::from_params(species, golden);
                        for roll in [-1.0, 0.0, 0.5] {
                            let params = catalog
                                .resolve_with_bite_roll(world.id, character, &rod.id, &fish, roll);
                            let key = format!(
                                "{}:{character}:{}:{}:{golden}:{roll}",
                                world.id, rod.id, species.id
                            );
                            table.insert(key, serde_json::to_value(params).unwrap());
                        }
                    }
                }
            }
        }
    }
    table
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn documents_reproduce_builtin_records() {
    let loaded = TuningCatalog::from_documents(&documents()).unwrap();
    assert_eq!(loaded, TuningCatalog::builtin());
}

#[test]
fn resolution_snapshot_is_stable_across_loads() {
    let builtin = serde_json::to_string_pretty(&resolution_table(&TuningCatalog::builtin())).unwrap();
    let loaded = TuningCatalog::from_documents(&documents()).unwrap();
    let from_docs = serde_json::to_string_pretty(&resolution_table(&loaded)).unwrap();
    assert_eq!(
        snapshot_hash(builtin.as_bytes()),
        snapshot_hash(from_docs.as_bytes()),
        "resolution snapshot drifted\n{from_docs}"
    );
}

#[test]
fn snapshot_hash_detects_tuning_changes() {
    let mut docs = documents();
    docs.rods = Some(RODS.replace("\"goldenChanceBonus\":0.12", "\"goldenChanceBonus\":0.5"));
    let changed = TuningCatalog::from_documents(&docs).unwrap();
    let baseline = serde_json::to_string(&resolution_table(&TuningCatalog::builtin())).unwrap();
    let tweaked = serde_json::to_string(&resolution_table(&changed)).unwrap();
    assert_ne!(
        snapshot_hash(baseline.as_bytes()),
        snapshot_hash(tweaked.as_bytes())
    );
}
