//! Tidecast Game Engine
//!
//! Platform-agnostic simulation core for the Tidecast fishing minigame: tuning
//! resolution, the cast/bite/reel state machine and the angler's profile.
//! This crate never touches files, clocks or threads on its own; drivers feed
//! it time and input one step at a time.

pub mod angler;
pub mod constants;
pub mod driver;
pub mod fish;
pub mod numbers;
pub mod quests;
pub mod reel;
pub mod rng;
pub mod session;
pub mod tuning;

use std::convert::Infallible;

use thiserror::Error;

// Re-export commonly used types
pub use angler::{Angler, ShopError, ShopOutcome, rod_for_slot};
pub use constants::{DEFAULT_MAX_TICKS, DEFAULT_TICK_MS, DEFAULT_TRACK_PX};
#[cfg(feature = "async")]
pub use driver::run_async;
pub use driver::{
    FixedTickDriver, ObservedDriver, SessionDriver, SessionObserver, ThreadedSession,
    spawn_threaded,
};
pub use fish::{CaughtFish, roll_catch};
pub use quests::{GoalDef, GoalPayout, QuestDef, QuestLog};
pub use reel::{ReelMinigame, ReelParams, ReelView};
pub use rng::{CountingRng, RngBundle, StreamRng};
pub use session::{FishingPhase, FishingSession, Loadout, SessionResult, StepOutcome};
pub use tuning::{
    CharacterStats, EffectiveSessionParams, FishParams, MapSpec, RodParams, TuningCatalog,
    TuningDocuments, TuningLoadError, WorldParams,
};

/// Trait for abstracting where tuning documents come from.
/// Platform-specific implementations should provide this
pub trait TuningSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the raw tuning documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the documents cannot be read.
    fn load_documents(&self) -> Result<TuningDocuments, Self::Error>;
}

/// Source that always yields the built-in records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTuning;

impl TuningSource for BuiltinTuning {
    type Error = Infallible;

    fn load_documents(&self) -> Result<TuningDocuments, Self::Error> {
        Ok(TuningDocuments::default())
    }
}

impl TuningSource for TuningDocuments {
    type Error = Infallible;

    fn load_documents(&self) -> Result<TuningDocuments, Self::Error> {
        Ok(self.clone())
    }
}

#[derive(Debug, Error)]
pub enum EngineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("tuning source failed: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Tuning(#[from] TuningLoadError),
}

/// Main engine: owns the tuning source and the catalog loaded from it.
#[derive(Debug, Clone)]
pub struct FishingEngine<L>
where
    L: TuningSource,
{
    source: L,
    catalog: TuningCatalog,
    quests: QuestDef,
}

impl<L> FishingEngine<L>
where
    L: TuningSource,
{
    /// Load the catalog and quest definition from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or a document is malformed.
    pub fn new(source: L) -> Result<Self, EngineError<L::Error>> {
        let (catalog, quests) = Self::load(&source)?;
        Ok(Self {
            source,
            catalog,
            quests,
        })
    }

    fn load(source: &L) -> Result<(TuningCatalog, QuestDef), EngineError<L::Error>> {
        let docs = source.load_documents().map_err(EngineError::Source)?;
        let catalog = TuningCatalog::from_documents(&docs)?;
        let quests = match docs.quests.as_deref() {
            Some(json) => QuestDef::from_json(json)?,
            None => QuestDef::builtin(),
        };
        log::debug!(
            "loaded tuning: {} worlds, {} fish, {} rods, quest `{}`",
            catalog.worlds().count(),
            catalog.fishes().len(),
            catalog.rods().len(),
            quests.title
        );
        Ok((catalog, quests))
    }

    #[must_use]
    pub const fn catalog(&self) -> &TuningCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn quests(&self) -> &QuestDef {
        &self.quests
    }

    #[must_use]
    pub const fn source(&self) -> &L {
        &self.source
    }

    /// A fresh angler following this engine's quest.
    #[must_use]
    pub fn new_angler(&self, character_id: &str) -> Angler {
        Angler::new(character_id, self.quests.clone())
    }

    /// Start a session whose every random draw derives from `seed`.
    #[must_use]
    pub fn start_session(&self, loadout: &Loadout, seed: u64) -> FishingSession {
        let mut rngs = RngBundle::from_user_seed(seed);
        FishingSession::start(&self.catalog, loadout, &mut rngs)
    }
}

impl FishingEngine<BuiltinTuning> {
    /// Engine over the built-in records only.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            source: BuiltinTuning,
            catalog: TuningCatalog::builtin(),
            quests: QuestDef::builtin(),
        }
    }
}
