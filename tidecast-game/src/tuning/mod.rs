//! Tuning resolution: records, catalog, and effective per-session constants.

pub mod catalog;
pub mod effective;
pub mod loader;
pub mod records;

pub use catalog::TuningCatalog;
pub use effective::EffectiveSessionParams;
pub use loader::{TuningDocuments, TuningLoadError};
pub use records::{CharacterStats, FishParams, MapSpec, RodParams, WorldParams};
