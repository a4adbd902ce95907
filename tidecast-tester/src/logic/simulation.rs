use serde::{Deserialize, Serialize};
use tidecast_game::{
    DEFAULT_MAX_TICKS, FishingSession, FixedTickDriver, Loadout, ObservedDriver, ReelView,
    RngBundle, SessionObserver, SessionResult, TuningCatalog,
};

use crate::logic::policy::PlayerStrategy;

const PROGRESS_FLOOR: f64 = -1.0;
const PROGRESS_CEIL: f64 = 100.0;

/// Everything that stays fixed across the runs of one harness invocation.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub loadout: Loadout,
    pub driver: FixedTickDriver,
    pub max_ticks: u32,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(loadout: Loadout) -> Self {
        Self {
            loadout,
            driver: FixedTickDriver::default(),
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

/// One scripted session, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub strategy: PlayerStrategy,
    pub seed: u64,
    pub iteration: u64,
    pub fish_id: String,
    pub fish_name: String,
    pub golden: bool,
    pub price: i64,
    pub bite_time_ms: i64,
    pub success: bool,
    pub perfect: bool,
    pub cancelled: bool,
    pub ticks: u64,
    pub final_progress: f64,
    pub violations: Vec<String>,
}

/// Observer that checks the reel's invariants on every step it sees.
#[derive(Debug, Default)]
struct InvariantProbe {
    violations: Vec<String>,
    reel_steps: u64,
}

impl SessionObserver for InvariantProbe {
    fn on_progress(&mut self, view: &ReelView) {
        self.reel_steps += 1;
        let progress = view.progress;
        if !(PROGRESS_FLOOR..=PROGRESS_CEIL).contains(&progress) {
            self.violations.push(format!(
                "reel step {}: progress {progress} outside [{PROGRESS_FLOOR}, {PROGRESS_CEIL}]",
                self.reel_steps
            ));
        } else if progress >= PROGRESS_CEIL || progress <= PROGRESS_FLOOR {
            self.violations.push(format!(
                "reel step {}: progress {progress} at a bound but reel not finished",
                self.reel_steps
            ));
        }
    }

    fn on_end(&mut self, result: &SessionResult) {
        if result.cancelled {
            return;
        }
        let progress = result.final_progress;
        if result.success && progress < PROGRESS_CEIL {
            self.violations
                .push(format!("landed with final progress {progress}"));
        }
        if !result.success && progress > PROGRESS_FLOOR {
            self.violations
                .push(format!("lost with final progress {progress}"));
        }
        if result.perfect && !result.success {
            self.violations.push("perfect flag on a lost fish".to_string());
        }
    }
}

/// Play one session for `strategy`, seeded from `seed + iteration`.
///
/// Returns the flattened record together with the raw session result so the
/// caller can feed it to an angler profile.
#[must_use]
pub fn simulate_run(
    catalog: &TuningCatalog,
    plan: &SimulationPlan,
    strategy: PlayerStrategy,
    seed: u64,
    iteration: u64,
) -> (RunRecord, SessionResult) {
    let run_seed = seed.wrapping_add(iteration);
    let mut rngs = RngBundle::from_user_seed(run_seed);
    let session = FishingSession::start(catalog, &plan.loadout, &mut rngs);
    let bite_time_ms = session.params().bite_time_ms;

    let mut policy = strategy.create_policy(run_seed);
    let mut observed = ObservedDriver::new(session, InvariantProbe::default());
    let result = plan.driver.run(
        &mut observed,
        |view: &ReelView| policy.wants_pull(view),
        plan.max_ticks,
    );
    let (_, probe) = observed.into_parts();

    log::trace!(
        "{} seed {run_seed}: {} {} after {} ticks",
        policy.name(),
        if result.success { "landed" } else { "lost" },
        result.fish.name,
        result.ticks
    );

    let record = RunRecord {
        strategy,
        seed,
        iteration,
        fish_id: result.fish.id.clone(),
        fish_name: result.fish.name.clone(),
        golden: result.fish.golden,
        price: result.fish.price,
        bite_time_ms,
        success: result.success,
        perfect: result.perfect,
        cancelled: result.cancelled,
        ticks: result.ticks,
        final_progress: result.final_progress,
        violations: probe.violations,
    };
    (record, result)
}
