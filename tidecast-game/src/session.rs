//! One fishing attempt: cast, wait for the bite, reel, land or lose.
//!
//! Phases only move forward (`Casting -> Reeling -> Succeeded | Failed`).
//! A session is single-use; start a new one for the next cast.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHARACTER_ID, DEFAULT_ROD_ID, DEFAULT_WORLD_ID};
use crate::fish::{CaughtFish, roll_catch};
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::reel::{ReelMinigame, ReelView};
use crate::rng::{RngBundle, StreamRng};
use crate::tuning::{EffectiveSessionParams, TuningCatalog};

/// Who is fishing where, with what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loadout {
    pub world_id: i32,
    pub character_id: String,
    pub rod_id: String,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            world_id: DEFAULT_WORLD_ID,
            character_id: DEFAULT_CHARACTER_ID.to_string(),
            rod_id: DEFAULT_ROD_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FishingPhase {
    Casting,
    Reeling,
    Succeeded,
    Failed,
}

impl FishingPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Terminal outcome of a session. Every session ends with exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub fish: CaughtFish,
    pub success: bool,
    pub perfect: bool,
    pub cancelled: bool,
    pub ticks: u64,
    pub final_progress: f64,
}

impl SessionResult {
    /// Result for a session that was abandoned before it could report.
    #[must_use]
    pub const fn cancelled(fish: CaughtFish) -> Self {
        Self {
            fish,
            success: false,
            perfect: false,
            cancelled: true,
            ticks: 0,
            final_progress: 0.0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> FishingPhase {
        if self.success {
            FishingPhase::Succeeded
        } else {
            FishingPhase::Failed
        }
    }
}

/// What a single `update` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Still waiting; `progress` is the cast bar fill in `[0, 1]`.
    Casting { progress: f64 },
    /// The cast countdown ran out on this step; reeling starts next step.
    Bite,
    Reeling { progress: f64 },
    /// The session became terminal on this step.
    Finished(SessionResult),
    /// The session was already terminal; nothing changed.
    Idle,
}

#[derive(Debug, Clone)]
enum Stage {
    Casting { remaining_ms: i64, reel_rng: StreamRng },
    Reeling(ReelMinigame),
    Done {
        reel: Option<ReelMinigame>,
        result: SessionResult,
    },
}

#[derive(Debug, Clone)]
pub struct FishingSession {
    fish: CaughtFish,
    params: EffectiveSessionParams,
    cast_max_ms: i64,
    ticks: u64,
    stage: Stage,
}

impl FishingSession {
    /// Start in `Casting` with the resolved bite time as the countdown.
    #[must_use]
    pub fn new(fish: CaughtFish, params: EffectiveSessionParams, reel_rng: StreamRng) -> Self {
        let cast_max_ms = params.bite_time_ms.max(0);
        log::debug!(
            "casting for {} in world {} (bite in {cast_max_ms} ms)",
            fish.id,
            params.world_id
        );
        Self {
            fish,
            params,
            cast_max_ms,
            ticks: 0,
            stage: Stage::Casting {
                remaining_ms: cast_max_ms,
                reel_rng,
            },
        }
    }

    /// Roll a catch, resolve its parameters and start casting, drawing each
    /// random decision from its own stream of `rngs`.
    #[must_use]
    pub fn start(catalog: &TuningCatalog, loadout: &Loadout, rngs: &mut RngBundle) -> Self {
        let fish = roll_catch(catalog, &loadout.character_id, &loadout.rod_id, rngs.catch());
        let params = catalog.resolve(
            loadout.world_id,
            &loadout.character_id,
            &loadout.rod_id,
            &fish,
            rngs.bite(),
        );
        Self::new(fish, params, rngs.reel())
    }

    /// Pull input; ignored outside `Reeling`.
    pub fn press(&mut self) {
        if let Stage::Reeling(reel) = &mut self.stage {
            reel.press();
        }
    }

    pub fn release(&mut self) {
        if let Stage::Reeling(reel) = &mut self.stage {
            reel.release();
        }
    }

    /// Advance by one driver step.
    pub fn update(&mut self, dt_seconds: f64, track_pixel_width: f64) -> StepOutcome {
        match &mut self.stage {
            Stage::Done { .. } => StepOutcome::Idle,
            Stage::Casting {
                remaining_ms,
                reel_rng,
            } => {
                self.ticks = self.ticks.saturating_add(1);
                let step_ms = round_f64_to_i64(dt_seconds * 1_000.0).max(0);
                *remaining_ms = remaining_ms.saturating_sub(step_ms).max(0);
                if *remaining_ms > 0 {
                    let remaining = *remaining_ms;
                    return StepOutcome::Casting {
                        progress: self.cast_progress_for(remaining),
                    };
                }
                let reel = ReelMinigame::new(self.params.reel_params(), reel_rng.clone());
                self.stage = Stage::Reeling(reel);
                log::debug!("bite after {} ticks; reeling {}", self.ticks, self.fish.id);
                StepOutcome::Bite
            }
            Stage::Reeling(reel) => {
                self.ticks = self.ticks.saturating_add(1);
                reel.update(dt_seconds, track_pixel_width);
                if !reel.is_finished() {
                    return StepOutcome::Reeling {
                        progress: reel.progress(),
                    };
                }
                let success = reel.is_success();
                let perfect = success && reel.is_perfect();
                StepOutcome::Finished(self.finish(success, perfect, false))
            }
        }
    }

    /// Force the session to `Failed` and return its result. Once terminal
    /// this changes nothing and returns the existing result.
    pub fn cancel(&mut self) -> SessionResult {
        if let Stage::Done { result, .. } = &self.stage {
            return result.clone();
        }
        log::debug!("session for {} cancelled after {} ticks", self.fish.id, self.ticks);
        self.finish(false, false, true)
    }

    fn finish(&mut self, success: bool, perfect: bool, cancelled: bool) -> SessionResult {
        let result = SessionResult {
            fish: self.fish.clone(),
            success,
            perfect,
            cancelled,
            ticks: self.ticks,
            final_progress: self.progress().unwrap_or_default(),
        };
        let previous = std::mem::replace(
            &mut self.stage,
            Stage::Done {
                reel: None,
                result: result.clone(),
            },
        );
        if let (Stage::Reeling(finished_reel), Stage::Done { reel, .. }) = (previous, &mut self.stage)
        {
            *reel = Some(finished_reel);
        }
        log::debug!(
            "session ended: {:?} (perfect: {perfect}, cancelled: {cancelled})",
            result.phase()
        );
        result
    }

    fn cast_progress_for(&self, remaining_ms: i64) -> f64 {
        1.0 - i64_to_f64(remaining_ms) / i64_to_f64(self.cast_max_ms.max(1))
    }

    #[must_use]
    pub fn phase(&self) -> FishingPhase {
        match &self.stage {
            Stage::Casting { .. } => FishingPhase::Casting,
            Stage::Reeling(_) => FishingPhase::Reeling,
            Stage::Done { result, .. } => result.phase(),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.stage, Stage::Done { .. })
    }

    /// Cast bar fill in `[0, 1]`; 1 once the bite has happened.
    #[must_use]
    pub fn cast_progress(&self) -> f64 {
        match &self.stage {
            Stage::Casting { remaining_ms, .. } => self.cast_progress_for(*remaining_ms),
            _ => 1.0,
        }
    }

    #[must_use]
    pub fn cast_remaining_ms(&self) -> i64 {
        match &self.stage {
            Stage::Casting { remaining_ms, .. } => *remaining_ms,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn cast_max_ms(&self) -> i64 {
        self.cast_max_ms
    }

    /// The reel, once the fish has bitten.
    #[must_use]
    pub fn reel(&self) -> Option<&ReelMinigame> {
        match &self.stage {
            Stage::Reeling(reel) => Some(reel),
            Stage::Done { reel, .. } => reel.as_ref(),
            Stage::Casting { .. } => None,
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<ReelView> {
        self.reel().map(ReelMinigame::view)
    }

    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.reel().map(ReelMinigame::progress)
    }

    #[must_use]
    pub const fn fish(&self) -> &CaughtFish {
        &self.fish
    }

    #[must_use]
    pub const fn params(&self) -> &EffectiveSessionParams {
        &self.params
    }

    /// Non-idle steps taken so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        match &self.stage {
            Stage::Done { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::CountingRng;
    use crate::tuning::FishParams;

    const DT: f64 = 0.05;
    const TRACK: f64 = 420.0;

    fn session_with_bite(bite_ms: i64) -> FishingSession {
        let catalog = TuningCatalog::builtin();
        let fish = CaughtFish::from_params(&FishParams::neutral("carp", "Carp", 20), false);
        let mut params = catalog.resolve_with_bite_roll(1, "starter", "starter_rod", &fish, 0.0);
        params.bite_time_ms = bite_ms;
        FishingSession::new(fish, params, CountingRng::seeded(8))
    }

    #[test]
    fn bite_arrives_on_exactly_tick_forty() {
        let mut session = session_with_bite(2_000);
        let mut transitions = 0;
        for tick in 1..=60 {
            let before = session.phase();
            let outcome = session.update(DT, TRACK);
            if before == FishingPhase::Casting && session.phase() == FishingPhase::Reeling {
                transitions += 1;
                assert_eq!(tick, 40);
                assert_eq!(outcome, StepOutcome::Bite);
            }
        }
        assert_eq!(transitions, 1);
    }

    #[test]
    fn cast_progress_fills_linearly() {
        let mut session = session_with_bite(1_000);
        assert!(session.cast_progress().abs() < f64::EPSILON);
        for _ in 0..5 {
            session.update(DT, TRACK);
        }
        assert_eq!(session.cast_remaining_ms(), 750);
        assert!((session.cast_progress() - 0.25).abs() < 1e-12);
        assert!(session.reel().is_none());
    }

    #[test]
    fn oversized_step_floors_countdown_at_zero() {
        let mut session = session_with_bite(600);
        assert_eq!(session.update(10.0, TRACK), StepOutcome::Bite);
        assert_eq!(session.cast_remaining_ms(), 0);
        assert!((session.cast_progress() - 1.0).abs() < f64::EPSILON);
        assert!(session.reel().is_some());
    }

    #[test]
    fn input_during_cast_is_ignored() {
        let mut session = session_with_bite(500);
        session.press();
        while session.phase() == FishingPhase::Casting {
            session.update(DT, TRACK);
        }
        let reel = session.reel().unwrap();
        assert!(!reel.is_pulling());
        assert!((reel.progress() - 20.0).abs() < f64::EPSILON);
    }

    /// A fish that settles in the middle band and stays there for over 200
    /// ticks, so a released window resting at the near end never reaches it.
    fn slow_fish_session() -> FishingSession {
        let catalog = TuningCatalog::builtin();
        let fish = CaughtFish::from_params(&FishParams::neutral("carp", "Carp", 20), false);
        let mut params = catalog.resolve_with_bite_roll(1, "starter", "starter_rod", &fish, 0.0);
        params.bite_time_ms = 500;
        params.resilience = 0.8;
        params.movement_factor = 0.1;
        params.control_width = 0.2;
        params.progress_efficiency = 1.0;
        FishingSession::new(fish, params, CountingRng::seeded(8))
    }

    #[test]
    fn idle_session_eventually_fails() {
        let mut session = slow_fish_session();
        let mut finished = None;
        for _ in 0..5_000 {
            if let StepOutcome::Finished(result) = session.update(DT, TRACK) {
                finished = Some(result);
                break;
            }
        }
        let result = finished.expect("session should end");
        assert_eq!(session.phase(), FishingPhase::Failed);
        assert_eq!(result.phase(), FishingPhase::Failed);
        assert!(!result.success);
        assert!(!result.perfect);
        assert!(!result.cancelled);
        assert!((result.final_progress + 1.0).abs() < f64::EPSILON);
        assert!(session.is_terminal());
        assert_eq!(session.update(DT, TRACK), StepOutcome::Idle);
        assert_eq!(session.ticks(), result.ticks);
        assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn cancel_forces_failed_and_is_stable() {
        let mut session = session_with_bite(2_000);
        session.update(DT, TRACK);
        let result = session.cancel();
        assert!(result.cancelled);
        assert!(!result.success);
        assert_eq!(session.phase(), FishingPhase::Failed);
        assert_eq!(session.cancel(), result);
        assert_eq!(session.update(DT, TRACK), StepOutcome::Idle);
    }

    #[test]
    fn cancel_while_reeling_keeps_reel_state() {
        let mut session = session_with_bite(500);
        while session.phase() == FishingPhase::Casting {
            session.update(DT, TRACK);
        }
        session.update(DT, TRACK);
        let progress = session.progress().unwrap();
        let result = session.cancel();
        assert!((result.final_progress - progress).abs() < f64::EPSILON);
        assert!(session.reel().is_some());
    }

    #[test]
    fn start_draws_from_separate_streams() {
        let catalog = TuningCatalog::builtin();
        let loadout = Loadout::default();
        let mut a = RngBundle::from_user_seed(42);
        let mut b = RngBundle::from_user_seed(42);
        let first = FishingSession::start(&catalog, &loadout, &mut a);
        let second = FishingSession::start(&catalog, &loadout, &mut b);
        assert_eq!(first.fish(), second.fish());
        assert_eq!(first.cast_max_ms(), second.cast_max_ms());
        assert_eq!(a.catch().draws(), 2);
    }
}
