//! Immutable tuning records for worlds, fish, characters and rods.

use serde::{Deserialize, Serialize};

/// Map layout hints carried alongside a world. The engine never interprets
/// them; they are passed through for presentation collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSpec {
    #[serde(default = "MapSpec::default_width")]
    pub width: u32,
    #[serde(default = "MapSpec::default_height")]
    pub height: u32,
    #[serde(default)]
    pub center_water: bool,
    #[serde(default = "MapSpec::default_water_radius")]
    pub water_radius: u32,
    #[serde(default = "MapSpec::default_ground_tile")]
    pub ground_tile: String,
    #[serde(default = "MapSpec::default_water_tile")]
    pub water_tile: String,
}

impl MapSpec {
    const fn default_width() -> u32 {
        32
    }

    const fn default_height() -> u32 {
        18
    }

    const fn default_water_radius() -> u32 {
        6
    }

    fn default_ground_tile() -> String {
        String::from("GROUND")
    }

    fn default_water_tile() -> String {
        String::from("WATER")
    }

    #[must_use]
    pub fn standard(center_water: bool) -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            center_water,
            water_radius: Self::default_water_radius(),
            ground_tile: Self::default_ground_tile(),
            water_tile: Self::default_water_tile(),
        }
    }
}

/// Per-world reel and bite tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldParams {
    pub id: i32,
    pub name: String,
    pub reel_progress_rate: f64,
    pub fish_wiggle_strength: f64,
    pub bite_time_base_ms: i64,
    pub bite_time_variance_ms: i64,
    pub reel_bar_scale: f64,
    #[serde(default)]
    pub map: Option<MapSpec>,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            id: crate::constants::DEFAULT_WORLD_ID,
            name: String::from("World 1"),
            reel_progress_rate: 1.0,
            fish_wiggle_strength: 1.0,
            bite_time_base_ms: 2_000,
            bite_time_variance_ms: 1_000,
            reel_bar_scale: 1.0,
            map: Some(MapSpec::standard(false)),
        }
    }
}

/// A catchable species and its difficulty multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishParams {
    pub id: String,
    pub display_name: String,
    pub base_price: i64,
    #[serde(default)]
    pub image_path: Option<String>,
    pub reel_rate_mul: f64,
    pub wiggle_mul: f64,
    pub bite_speed_mul: f64,
}

impl FishParams {
    /// Neutral species: every multiplier is 1.0.
    #[must_use]
    pub fn neutral(id: &str, display_name: &str, base_price: i64) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            base_price,
            image_path: None,
            reel_rate_mul: 1.0,
            wiggle_mul: 1.0,
            bite_speed_mul: 1.0,
        }
    }

    #[must_use]
    pub fn with_difficulty(mut self, reel_rate_mul: f64, wiggle_mul: f64, bite_speed_mul: f64) -> Self {
        self.reel_rate_mul = reel_rate_mul;
        self.wiggle_mul = wiggle_mul;
        self.bite_speed_mul = bite_speed_mul;
        self
    }
}

/// Character archetype bonuses. Missing characters resolve to all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    #[serde(default)]
    pub luck: f64,
    #[serde(default)]
    pub reel_bar_scale_bonus: f64,
    #[serde(default)]
    pub bite_speed_bonus: f64,
}

impl CharacterStats {
    #[must_use]
    pub const fn new(luck: f64, reel_bar_scale_bonus: f64, bite_speed_bonus: f64) -> Self {
        Self {
            luck,
            reel_bar_scale_bonus,
            bite_speed_bonus,
        }
    }
}

/// Fishing rod equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RodParams {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub reel_bar_scale_bonus: f64,
    #[serde(default)]
    pub luck_bonus: f64,
    #[serde(default)]
    pub bite_speed_bonus: f64,
    #[serde(default)]
    pub golden_chance_bonus: f64,
}

impl RodParams {
    /// A rod with no bonuses and no price.
    #[must_use]
    pub fn neutral(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            price: 0,
            reel_bar_scale_bonus: 0.0,
            luck_bonus: 0.0,
            bite_speed_bonus: 0.0,
            golden_chance_bonus: 0.0,
        }
    }

    #[must_use]
    pub fn with_bonuses(
        mut self,
        price: i64,
        reel_bar_scale_bonus: f64,
        luck_bonus: f64,
        bite_speed_bonus: f64,
        golden_chance_bonus: f64,
    ) -> Self {
        self.price = price;
        self.reel_bar_scale_bonus = reel_bar_scale_bonus;
        self.luck_bonus = luck_bonus;
        self.bite_speed_bonus = bite_speed_bonus;
        self.golden_chance_bonus = golden_chance_bonus;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_stats_default_is_zero() {
        let stats = CharacterStats::default();
        assert!(stats.luck.abs() < f64::EPSILON);
        assert!(stats.reel_bar_scale_bonus.abs() < f64::EPSILON);
        assert!(stats.bite_speed_bonus.abs() < f64::EPSILON);
    }

    #[test]
    fn records_use_camel_case_fields() {
        let rod = RodParams::neutral("pro_rod", "Pro Rod").with_bonuses(400, 0.2, 0.1, 0.2, 0.12);
        let value = serde_json::to_value(&rod).unwrap();
        assert_eq!(value["displayName"], "Pro Rod");
        assert_eq!(value["goldenChanceBonus"], 0.12);

        let world: WorldParams = serde_json::from_str(
            r#"{"id":3,"name":"Reef","reelProgressRate":0.9,"fishWiggleStrength":1.2,
                "biteTimeBaseMs":1800,"biteTimeVarianceMs":400,"reelBarScale":1.0}"#,
        )
        .unwrap();
        assert_eq!(world.id, 3);
        assert!(world.map.is_none());
    }

    #[test]
    fn map_spec_fills_missing_fields() {
        let map: MapSpec = serde_json::from_str(r#"{"centerWater":true}"#).unwrap();
        assert_eq!(map, MapSpec::standard(true));
    }
}
