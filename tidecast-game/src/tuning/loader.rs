//! JSON tuning documents.
//!
//! The engine never touches the filesystem: callers read the documents and
//! hand over their text. Each document wraps one table (`{"worlds": [...]}`,
//! `{"fish": [...]}`, `{"characters": [...]}`, `{"rods": [...]}`). Entries
//! without a usable id are skipped; absent fields take neutral defaults; a
//! missing or empty table falls back to the built-in records.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::numbers::round_f64_to_i64;
use crate::tuning::catalog::TuningCatalog;
use crate::tuning::records::{CharacterStats, FishParams, MapSpec, RodParams, WorldParams};

/// Raw document text for each tuning table. `None` means "use built-ins".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuningDocuments {
    pub worlds: Option<String>,
    pub fish: Option<String>,
    pub characters: Option<String>,
    pub rods: Option<String>,
    /// Guide quest document; parsed by [`crate::quests::QuestDef::from_json`].
    pub quests: Option<String>,
}

/// Errors raised when a tuning document cannot be parsed at all.
#[derive(Debug, Error)]
pub enum TuningLoadError {
    #[error("malformed {table} document: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TuningCatalog {
    /// Build a catalog from tuning documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any supplied document is not valid JSON of the
    /// expected envelope shape.
    pub fn from_documents(docs: &TuningDocuments) -> Result<Self, TuningLoadError> {
        let worlds = docs.worlds.as_deref().map(parse_worlds).transpose()?;
        let fish = docs.fish.as_deref().map(parse_fish).transpose()?;
        let characters = docs.characters.as_deref().map(parse_characters).transpose()?;
        let rods = docs.rods.as_deref().map(parse_rods).transpose()?;

        for (table, empty) in [
            ("worlds", worlds.as_ref().is_some_and(Vec::is_empty)),
            ("fish", fish.as_ref().is_some_and(Vec::is_empty)),
            ("characters", characters.as_ref().is_some_and(Vec::is_empty)),
            ("rods", rods.as_ref().is_some_and(Vec::is_empty)),
        ] {
            if empty {
                log::warn!("{table} document has no usable entries; using built-in {table}");
            }
        }

        Ok(Self::new(
            worlds.unwrap_or_default(),
            fish.unwrap_or_default(),
            characters.unwrap_or_default(),
            rods.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct WorldsDoc {
    #[serde(default)]
    worlds: Vec<RawWorld>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorld {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "one")]
    reel_progress_rate: f64,
    #[serde(default = "one")]
    fish_wiggle_strength: f64,
    #[serde(default = "RawWorld::default_bite_base")]
    bite_time_base_ms: f64,
    #[serde(default = "RawWorld::default_bite_variance")]
    bite_time_variance_ms: f64,
    #[serde(default = "one")]
    reel_bar_scale: f64,
    #[serde(default)]
    map: Option<RawMap>,
}

impl RawWorld {
    const fn default_bite_base() -> f64 {
        2_000.0
    }

    const fn default_bite_variance() -> f64 {
        1_000.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMap {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    center_water: Option<Value>,
    #[serde(default)]
    water_radius: Option<u32>,
    #[serde(default)]
    ground_tile: Option<String>,
    #[serde(default)]
    water_tile: Option<String>,
}

impl RawMap {
    fn into_spec(self) -> MapSpec {
        // Older documents store the flag as a string.
        let center_water = match self.center_water {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
            _ => false,
        };
        let base = MapSpec::standard(center_water);
        MapSpec {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            center_water,
            water_radius: self.water_radius.unwrap_or(base.water_radius),
            ground_tile: self.ground_tile.unwrap_or(base.ground_tile),
            water_tile: self.water_tile.unwrap_or(base.water_tile),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FishDoc {
    #[serde(default)]
    fish: Vec<RawFish>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFish {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default = "RawFish::default_price")]
    base_price: f64,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    difficulty: Option<RawDifficulty>,
}

impl RawFish {
    const fn default_price() -> f64 {
        10.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDifficulty {
    #[serde(default = "one")]
    reel_rate_mul: f64,
    #[serde(default = "one")]
    wiggle_mul: f64,
    #[serde(default = "one")]
    bite_speed_mul: f64,
}

#[derive(Debug, Deserialize)]
struct CharactersDoc {
    #[serde(default)]
    characters: Vec<RawCharacter>,
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    stats: Option<CharacterStats>,
}

#[derive(Debug, Deserialize)]
struct RodsDoc {
    #[serde(default)]
    rods: Vec<RawRod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRod {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    reel_bar_scale_bonus: f64,
    #[serde(default)]
    luck_bonus: f64,
    #[serde(default)]
    bite_speed_bonus: f64,
    #[serde(default)]
    golden_chance_bonus: f64,
}

const fn one() -> f64 {
    1.0
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|value| !value.is_empty())
}

/// Parse a worlds document. Entries with a missing or negative id are skipped.
///
/// # Errors
///
/// Returns an error if the text is not a valid worlds document.
pub fn parse_worlds(json: &str) -> Result<Vec<WorldParams>, TuningLoadError> {
    let doc: WorldsDoc = serde_json::from_str(json).map_err(|source| TuningLoadError::Malformed {
        table: "worlds",
        source,
    })?;
    Ok(doc
        .worlds
        .into_iter()
        .filter_map(|raw| {
            let id = i32::try_from(raw.id?).ok().filter(|id| *id >= 0)?;
            Some(WorldParams {
                id,
                name: raw.name.unwrap_or_else(|| format!("World {id}")),
                reel_progress_rate: raw.reel_progress_rate,
                fish_wiggle_strength: raw.fish_wiggle_strength,
                bite_time_base_ms: round_f64_to_i64(raw.bite_time_base_ms),
                bite_time_variance_ms: round_f64_to_i64(raw.bite_time_variance_ms),
                reel_bar_scale: raw.reel_bar_scale,
                map: raw.map.map(RawMap::into_spec),
            })
        })
        .collect())
}

/// Parse a fish document; difficulty multipliers default to 1.0.
///
/// # Errors
///
/// Returns an error if the text is not a valid fish document.
pub fn parse_fish(json: &str) -> Result<Vec<FishParams>, TuningLoadError> {
    let doc: FishDoc = serde_json::from_str(json).map_err(|source| TuningLoadError::Malformed {
        table: "fish",
        source,
    })?;
    Ok(doc
        .fish
        .into_iter()
        .filter_map(|raw| {
            let id = non_empty(raw.id)?;
            let difficulty = raw.difficulty.unwrap_or(RawDifficulty {
                reel_rate_mul: 1.0,
                wiggle_mul: 1.0,
                bite_speed_mul: 1.0,
            });
            Some(FishParams {
                display_name: raw.display_name.unwrap_or_else(|| id.clone()),
                id,
                base_price: round_f64_to_i64(raw.base_price),
                image_path: raw.image_path,
                reel_rate_mul: difficulty.reel_rate_mul,
                wiggle_mul: difficulty.wiggle_mul,
                bite_speed_mul: difficulty.bite_speed_mul,
            })
        })
        .collect())
}

/// Parse a characters document; missing stats are all zero.
///
/// # Errors
///
/// Returns an error if the text is not a valid characters document.
pub fn parse_characters(json: &str) -> Result<Vec<(String, CharacterStats)>, TuningLoadError> {
    let doc: CharactersDoc =
        serde_json::from_str(json).map_err(|source| TuningLoadError::Malformed {
            table: "characters",
            source,
        })?;
    Ok(doc
        .characters
        .into_iter()
        .filter_map(|raw| Some((non_empty(raw.id)?, raw.stats.unwrap_or_default())))
        .collect())
}

/// Parse a rods document; missing bonuses are zero.
///
/// # Errors
///
/// Returns an error if the text is not a valid rods document.
pub fn parse_rods(json: &str) -> Result<Vec<RodParams>, TuningLoadError> {
    let doc: RodsDoc = serde_json::from_str(json).map_err(|source| TuningLoadError::Malformed {
        table: "rods",
        source,
    })?;
    Ok(doc
        .rods
        .into_iter()
        .filter_map(|raw| {
            let id = non_empty(raw.id)?;
            Some(RodParams {
                display_name: raw.display_name.unwrap_or_else(|| id.clone()),
                id,
                price: round_f64_to_i64(raw.price),
                reel_bar_scale_bonus: raw.reel_bar_scale_bonus,
                luck_bonus: raw.luck_bonus,
                bite_speed_bonus: raw.bite_speed_bonus,
                golden_chance_bonus: raw.golden_chance_bonus,
            })
        })
        .collect())
}
