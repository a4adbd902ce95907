//! The tuning catalog: a constructed, read-only set of records.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::Serialize;

use crate::constants::{DEFAULT_ROD_ID, DEFAULT_WORLD_ID};
use crate::fish::CaughtFish;
use crate::tuning::effective::{
    EffectiveSessionParams, bar_scale_ui_for, bite_time_ms, control_width_for, golden_chance_for,
    movement_factor_for, resilience_for, total_bite_mul, ui_scale_for,
};
use crate::tuning::records::{CharacterStats, FishParams, MapSpec, RodParams, WorldParams};

/// Immutable parameter records keyed for lookup.
///
/// Every table is guaranteed non-empty: a table supplied empty is replaced
/// with the built-in records for that table. The catalog is never mutated
/// after construction and can be shared freely between sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningCatalog {
    worlds: BTreeMap<i32, WorldParams>,
    fish: Vec<FishParams>,
    characters: HashMap<String, CharacterStats>,
    rods: Vec<RodParams>,
    fallback_world: WorldParams,
}

impl Default for TuningCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TuningCatalog {
    /// Build a catalog from explicit tables, substituting built-ins for empty ones.
    #[must_use]
    pub fn new(
        worlds: Vec<WorldParams>,
        fish: Vec<FishParams>,
        characters: Vec<(String, CharacterStats)>,
        rods: Vec<RodParams>,
    ) -> Self {
        let worlds = if worlds.is_empty() {
            builtin_worlds()
        } else {
            worlds
        };
        let fish = if fish.is_empty() { builtin_fish() } else { fish };
        let characters = if characters.is_empty() {
            builtin_characters()
        } else {
            characters
        };
        let rods = if rods.is_empty() { builtin_rods() } else { rods };

        // Later entries with the same id replace earlier ones; order of first
        // appearance is kept for the ordered tables.
        let mut fish_table: Vec<FishParams> = Vec::with_capacity(fish.len());
        for entry in fish {
            if let Some(existing) = fish_table.iter_mut().find(|f| f.id == entry.id) {
                *existing = entry;
            } else {
                fish_table.push(entry);
            }
        }
        let mut rod_table: Vec<RodParams> = Vec::with_capacity(rods.len());
        for entry in rods {
            if let Some(existing) = rod_table.iter_mut().find(|r| r.id == entry.id) {
                *existing = entry;
            } else {
                rod_table.push(entry);
            }
        }

        Self {
            worlds: worlds.into_iter().map(|w| (w.id, w)).collect(),
            fish: fish_table,
            characters: characters.into_iter().collect(),
            rods: rod_table,
            fallback_world: WorldParams::default(),
        }
    }

    /// Catalog holding only the built-in default records.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// World by id; unknown ids fall back to world 1, then to the built-in world 1.
    #[must_use]
    pub fn world(&self, id: i32) -> &WorldParams {
        self.worlds
            .get(&id)
            .or_else(|| self.worlds.get(&DEFAULT_WORLD_ID))
            .unwrap_or(&self.fallback_world)
    }

    pub fn worlds(&self) -> impl Iterator<Item = &WorldParams> {
        self.worlds.values()
    }

    #[must_use]
    pub fn fish(&self, id: &str) -> Option<&FishParams> {
        self.fish.iter().find(|f| f.id == id)
    }

    /// Species in stable catalog order.
    #[must_use]
    pub fn fishes(&self) -> &[FishParams] {
        &self.fish
    }

    /// Character bonuses; unknown ids yield the zero-bonus record.
    #[must_use]
    pub fn character_stats(&self, id: &str) -> CharacterStats {
        self.characters.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has_character(&self, id: &str) -> bool {
        self.characters.contains_key(id)
    }

    #[must_use]
    pub fn rod(&self, id: &str) -> Option<&RodParams> {
        self.rods.iter().find(|r| r.id == id)
    }

    /// Rods in stable shop order.
    #[must_use]
    pub fn rods(&self) -> &[RodParams] {
        &self.rods
    }

    /// Rod used for resolution: the named rod, else the starter rod, else a
    /// neutral rod with no bonuses.
    #[must_use]
    pub fn equipped_rod(&self, id: &str) -> RodParams {
        self.rod(id)
            .or_else(|| self.rod(DEFAULT_ROD_ID))
            .cloned()
            .unwrap_or_else(|| RodParams::neutral(DEFAULT_ROD_ID, "Starter Rod"))
    }

    /// Golden probability for a character/rod pairing.
    #[must_use]
    pub fn golden_chance(&self, character_id: &str, rod_id: &str) -> f64 {
        golden_chance_for(&self.character_stats(character_id), &self.equipped_rod(rod_id))
    }

    /// Resolve the effective session constants, drawing the bite variance from `rng`.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        world_id: i32,
        character_id: &str,
        rod_id: &str,
        fish: &CaughtFish,
        rng: &mut R,
    ) -> EffectiveSessionParams {
        let roll = rng.gen_range(-1.0..1.0);
        self.resolve_with_bite_roll(world_id, character_id, rod_id, fish, roll)
    }

    /// Resolve with an explicit bite variance draw in `[-1, 1]`.
    #[must_use]
    pub fn resolve_with_bite_roll(
        &self,
        world_id: i32,
        character_id: &str,
        rod_id: &str,
        fish: &CaughtFish,
        bite_roll: f64,
    ) -> EffectiveSessionParams {
        let world = self.world(world_id);
        if world.id != world_id {
            log::debug!("unknown world {world_id}; using world {}", world.id);
        }
        let character = self.character_stats(character_id);
        let rod = self.equipped_rod(rod_id);

        let total_mul = total_bite_mul(&character, &rod, fish.bite_speed_mul);
        let wiggle_strength = world.fish_wiggle_strength * fish.wiggle_mul;
        let ui_scale = ui_scale_for(world, &character, &rod);

        EffectiveSessionParams {
            world_id: world.id,
            bite_time_ms: bite_time_ms(world, total_mul, bite_roll),
            total_bite_mul: total_mul,
            progress_efficiency: world.reel_progress_rate * fish.reel_rate_mul,
            wiggle_strength,
            resilience: resilience_for(wiggle_strength),
            movement_factor: movement_factor_for(wiggle_strength),
            ui_scale,
            bar_scale_ui: bar_scale_ui_for(ui_scale),
            control_width: control_width_for(ui_scale),
            golden_chance: golden_chance_for(&character, &rod),
        }
    }
}

fn builtin_worlds() -> Vec<WorldParams> {
    vec![
        WorldParams::default(),
        WorldParams {
            id: 2,
            name: String::from("World 2"),
            reel_progress_rate: 0.6,
            fish_wiggle_strength: 1.6,
            bite_time_base_ms: 1_400,
            bite_time_variance_ms: 600,
            reel_bar_scale: 1.1,
            map: Some(MapSpec::standard(true)),
        },
    ]
}

fn builtin_fish() -> Vec<FishParams> {
    vec![
        FishParams::neutral("common_carp", "Common Carp", 20),
        FishParams::neutral("electric_eel", "Electric Eel", 120).with_difficulty(0.8, 1.4, 1.2),
        FishParams::neutral("trout", "Trout", 25).with_difficulty(1.0, 1.1, 1.0),
    ]
}

fn builtin_characters() -> Vec<(String, CharacterStats)> {
    vec![
        (
            crate::constants::DEFAULT_CHARACTER_ID.to_string(),
            CharacterStats::default(),
        ),
        (
            String::from("Fisherman_Fin"),
            CharacterStats::new(0.15, 0.10, 0.20),
        ),
    ]
}

fn builtin_rods() -> Vec<RodParams> {
    vec![
        RodParams::neutral(DEFAULT_ROD_ID, "Starter Rod"),
        RodParams::neutral("bamboo_rod", "Bamboo Rod").with_bonuses(150, 0.10, 0.05, 0.10, 0.05),
        RodParams::neutral("pro_rod", "Pro Rod").with_bonuses(400, 0.20, 0.10, 0.20, 0.12),
        RodParams::neutral("legend_rod", "Legend Rod").with_bonuses(1_200, 0.35, 0.18, 0.30, 0.25),
    ]
}
