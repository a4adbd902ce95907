//! Catch rolling: which species bites, and whether it is golden.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{GOLDEN_NAME_PREFIX, GOLDEN_PRICE_MULTIPLIER};
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::tuning::{FishParams, TuningCatalog};

/// A hooked fish, with golden pricing already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaughtFish {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub golden: bool,
    #[serde(default)]
    pub image_path: Option<String>,
    pub reel_rate_mul: f64,
    pub wiggle_mul: f64,
    pub bite_speed_mul: f64,
}

impl CaughtFish {
    /// Materialise a catch from its species record.
    ///
    /// Golden fish carry a "Golden " name prefix and double the base price.
    #[must_use]
    pub fn from_params(params: &FishParams, golden: bool) -> Self {
        let (name, price) = if golden {
            (
                format!("{GOLDEN_NAME_PREFIX}{}", params.display_name),
                round_f64_to_i64(i64_to_f64(params.base_price) * GOLDEN_PRICE_MULTIPLIER),
            )
        } else {
            (params.display_name.clone(), params.base_price)
        };
        Self {
            id: params.id.clone(),
            name,
            price,
            golden,
            image_path: params.image_path.clone(),
            reel_rate_mul: params.reel_rate_mul,
            wiggle_mul: params.wiggle_mul,
            bite_speed_mul: params.bite_speed_mul,
        }
    }
}

/// Pick a species uniformly, then roll the golden chance for this loadout.
///
/// The species draw always happens before the golden draw.
pub fn roll_catch<R: Rng + ?Sized>(
    catalog: &TuningCatalog,
    character_id: &str,
    rod_id: &str,
    rng: &mut R,
) -> CaughtFish {
    let fishes = catalog.fishes();
    let index = rng.gen_range(0..fishes.len());
    let chance = catalog.golden_chance(character_id, rod_id);
    let golden = rng.gen_range(0.0..1.0) < chance;
    let fish = CaughtFish::from_params(&fishes[index], golden);
    log::debug!("rolled catch {} (golden: {golden}, chance {chance:.3})", fish.id);
    fish
}
