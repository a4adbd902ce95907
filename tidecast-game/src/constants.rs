//! Centralized balance and tuning constants for the Tidecast fishing engine.
//!
//! These values define the deterministic math for the core simulation.
//! Per-world, per-fish, per-character and per-rod modifiers come from tuning
//! records; everything that is not a data-driven modifier lives here.

// Reel physics -------------------------------------------------------------
pub(crate) const REEL_VELOCITY_MAX: f64 = 14.0;
pub(crate) const REEL_ACCELERATION: f64 = 1.0;
pub(crate) const REEL_FRAME_RATE: f64 = 60.0;
pub(crate) const REEL_VELOCITY_TO_TRACK: f64 = 0.001;
pub(crate) const REEL_START_PROGRESS: f64 = 20.0;
pub(crate) const REEL_START_WINDOW: f64 = 1.0;
pub(crate) const REEL_START_FISH: f64 = 0.5;
pub(crate) const PROGRESS_MIN: f64 = -1.0;
pub(crate) const PROGRESS_MAX: f64 = 100.0;
pub(crate) const PROGRESS_GAIN_PER_FRAME: f64 = 0.2;
pub(crate) const PROGRESS_DECAY_PER_FRAME: f64 = 0.2;
pub(crate) const PROGRESS_DECAY_RESILIENCE: f64 = 0.0017;
pub(crate) const FISH_MARKER_PX: f64 = 8.0;

// Reel parameter floors ----------------------------------------------------
pub(crate) const CONTROL_WIDTH_MIN: f64 = 0.2;
pub(crate) const CONTROL_WIDTH_MAX: f64 = 0.9;
pub(crate) const EFFICIENCY_MIN: f64 = 0.1;
pub(crate) const RESILIENCE_MIN: f64 = 0.2;
pub(crate) const MOVEMENT_FACTOR_MIN: f64 = 0.1;

// Fish AI ------------------------------------------------------------------
pub(crate) const FISH_TARGET_MIN: f64 = 0.03;
pub(crate) const FISH_TARGET_MAX: f64 = 0.97;
pub(crate) const FISH_RETARGET_SPAN: f64 = 0.32;
pub(crate) const FISH_RETARGET_RES_MIN: f64 = 0.8;
pub(crate) const FISH_RETARGET_RES_MAX: f64 = 1.2;
pub(crate) const FISH_COOLDOWN_MIN_SECS: f64 = 1.3;
pub(crate) const FISH_COOLDOWN_MAX_SECS: f64 = 3.5;
pub(crate) const FISH_COOLDOWN_RES_MIN: f64 = 0.1;
pub(crate) const FISH_COOLDOWN_RES_MAX: f64 = 1.5;
pub(crate) const FISH_SMOOTHING_PER_FRAME: f64 = 0.08;
pub(crate) const FISH_SMOOTHING_RES_MIN: f64 = 0.8;
pub(crate) const FISH_SMOOTHING_RES_MAX: f64 = 1.4;

// Session resolution -------------------------------------------------------
pub(crate) const BITE_TIME_MIN_MS: i64 = 500;
pub(crate) const BITE_MUL_FLOOR: f64 = 0.25;
pub(crate) const WIGGLE_FLOOR: f64 = 0.25;
pub(crate) const MOVEMENT_FACTOR_FLOOR: f64 = 0.3;
pub(crate) const UI_SCALE_FLOOR: f64 = 0.6;
pub(crate) const CONTROL_WIDTH_PER_SCALE: f64 = 0.18;
pub(crate) const BAR_SCALE_UI_MIN: f64 = 0.75;
pub(crate) const BAR_SCALE_UI_MAX: f64 = 1.8;
pub(crate) const GOLDEN_BASE_CHANCE: f64 = 0.15;
pub(crate) const GOLDEN_CHANCE_MAX: f64 = 0.9;
pub(crate) const GOLDEN_PRICE_MULTIPLIER: f64 = 2.0;
pub(crate) const GOLDEN_NAME_PREFIX: &str = "Golden ";

// Catalog fallbacks --------------------------------------------------------
pub(crate) const DEFAULT_WORLD_ID: i32 = 1;
pub(crate) const DEFAULT_ROD_ID: &str = "starter_rod";
pub(crate) const DEFAULT_CHARACTER_ID: &str = "starter";

// Drivers ------------------------------------------------------------------
pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_TRACK_PX: f64 = 420.0;
pub const DEFAULT_MAX_TICKS: u32 = 10_000;
