//! Effective per-session constants and the formulas that derive them.
//!
//! Each formula clamps at its boundary, so any combination of records
//! (including absurd bonuses) yields playable constants.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BAR_SCALE_UI_MAX, BAR_SCALE_UI_MIN, BITE_MUL_FLOOR, BITE_TIME_MIN_MS, CONTROL_WIDTH_MAX,
    CONTROL_WIDTH_MIN, CONTROL_WIDTH_PER_SCALE, GOLDEN_BASE_CHANCE, GOLDEN_CHANCE_MAX,
    MOVEMENT_FACTOR_FLOOR, RESILIENCE_MIN, UI_SCALE_FLOOR, WIGGLE_FLOOR,
};
use crate::numbers::{clamp, clamp_min, i64_to_f64, round_f64_to_i64};
use crate::reel::ReelParams;
use crate::tuning::records::{CharacterStats, RodParams, WorldParams};

/// Constants derived once at session start from world, character, rod and fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSessionParams {
    pub world_id: i32,
    pub bite_time_ms: i64,
    pub total_bite_mul: f64,
    pub progress_efficiency: f64,
    pub wiggle_strength: f64,
    pub resilience: f64,
    pub movement_factor: f64,
    pub ui_scale: f64,
    pub bar_scale_ui: f64,
    pub control_width: f64,
    pub golden_chance: f64,
}

impl EffectiveSessionParams {
    /// Reel minigame parameters carried by these constants.
    #[must_use]
    pub const fn reel_params(&self) -> ReelParams {
        ReelParams {
            resilience: self.resilience,
            progress_efficiency: self.progress_efficiency,
            control_width: self.control_width,
            movement_factor: self.movement_factor,
            initial_progress: crate::constants::REEL_START_PROGRESS,
        }
    }
}

/// Multiplier applied to the world's bite time.
///
/// `(1 - (character + rod bite bonus)) / fish bite speed`, floored at 0.25 on
/// both the divisor and the result.
#[must_use]
pub fn total_bite_mul(character: &CharacterStats, rod: &RodParams, fish_bite_speed_mul: f64) -> f64 {
    let total_bonus = character.bite_speed_bonus + rod.bite_speed_bonus;
    clamp_min(
        BITE_MUL_FLOOR,
        (1.0 - total_bonus) / clamp_min(BITE_MUL_FLOOR, fish_bite_speed_mul),
    )
}

/// Bite delay in milliseconds for a variance draw `roll` in `[-1, 1]`.
#[must_use]
pub fn bite_time_ms(world: &WorldParams, total_mul: f64, roll: f64) -> i64 {
    let base = i64_to_f64(world.bite_time_base_ms) * total_mul;
    let spread = clamp(-1.0, 1.0, roll) * i64_to_f64(world.bite_time_variance_ms) * total_mul;
    round_f64_to_i64(base + spread).max(BITE_TIME_MIN_MS)
}

/// Calmness of the fish: inverse of wiggle strength.
#[must_use]
pub fn resilience_for(wiggle_strength: f64) -> f64 {
    clamp_min(RESILIENCE_MIN, 1.0 / clamp_min(WIGGLE_FLOOR, wiggle_strength))
}

#[must_use]
pub fn movement_factor_for(wiggle_strength: f64) -> f64 {
    clamp_min(MOVEMENT_FACTOR_FLOOR, wiggle_strength)
}

/// Bar scale before it is mapped to a control width.
#[must_use]
pub fn ui_scale_for(world: &WorldParams, character: &CharacterStats, rod: &RodParams) -> f64 {
    clamp_min(
        UI_SCALE_FLOOR,
        world.reel_bar_scale + character.reel_bar_scale_bonus + rod.reel_bar_scale_bonus,
    )
}

#[must_use]
pub fn control_width_for(ui_scale: f64) -> f64 {
    clamp(CONTROL_WIDTH_MIN, CONTROL_WIDTH_MAX, CONTROL_WIDTH_PER_SCALE * ui_scale)
}

/// Display height scale for the reel bar.
#[must_use]
pub fn bar_scale_ui_for(ui_scale: f64) -> f64 {
    clamp(BAR_SCALE_UI_MIN, BAR_SCALE_UI_MAX, ui_scale)
}

/// Probability that a catch is golden, always within `[0, 0.9]`.
#[must_use]
pub fn golden_chance_for(character: &CharacterStats, rod: &RodParams) -> f64 {
    let luck = (character.luck + rod.luck_bonus).max(0.0);
    let bonus = rod.golden_chance_bonus.max(0.0);
    clamp(0.0, GOLDEN_CHANCE_MAX, GOLDEN_BASE_CHANCE * (1.0 + luck + bonus))
}
