use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tidecast_game::ReelView;

/// Half-width of the band in which the tracker coasts instead of steering.
const TRACKER_DEAD_ZONE: f64 = 0.02;
/// Chance per tick that the jittery hand does the opposite of the tracker.
const JITTER_FLIP_CHANCE: f64 = 0.15;

/// Policy interface for automated reeling.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Decide whether the player holds the reel button on this tick.
    fn wants_pull(&mut self, view: &ReelView) -> bool;
}

/// Built-in reeling strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStrategy {
    Idle,
    Hold,
    Tracker,
    Jittery,
}

impl PlayerStrategy {
    pub const ALL: [Self; 4] = [Self::Idle, Self::Hold, Self::Tracker, Self::Jittery];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hold => "hold",
            Self::Tracker => "tracker",
            Self::Jittery => "jittery",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Hold => "Hold",
            Self::Tracker => "Tracker",
            Self::Jittery => "Jittery",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Idle => "never touches the reel button",
            Self::Hold => "holds the reel button for the whole fight",
            Self::Tracker => "steers the window toward the fish with a small dead zone",
            Self::Jittery => "tracker with a seeded, unreliable hand",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(key.trim()))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Idle => Box::new(IdlePolicy),
            Self::Hold => Box::new(HoldPolicy),
            Self::Tracker => Box::new(TrackerPolicy::default()),
            Self::Jittery => Box::new(JitteryPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct IdlePolicy;
struct HoldPolicy;

#[derive(Default)]
struct TrackerPolicy {
    pulling: bool,
}

struct JitteryPolicy {
    tracker: TrackerPolicy,
    rng: ChaCha20Rng,
}

impl JitteryPolicy {
    fn new(seed: u64) -> Self {
        Self {
            tracker: TrackerPolicy::default(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn wants_pull(&mut self, _view: &ReelView) -> bool {
        false
    }
}

impl PlayerPolicy for HoldPolicy {
    fn name(&self) -> &'static str {
        "Hold"
    }

    fn wants_pull(&mut self, _view: &ReelView) -> bool {
        true
    }
}

impl PlayerPolicy for TrackerPolicy {
    fn name(&self) -> &'static str {
        "Tracker"
    }

    fn wants_pull(&mut self, view: &ReelView) -> bool {
        let gap = view.fish_center - view.window_center;
        if gap > TRACKER_DEAD_ZONE {
            self.pulling = true;
        } else if gap < -TRACKER_DEAD_ZONE {
            self.pulling = false;
        } else {
            // Inside the dead zone: lean against the current drift.
            self.pulling = view.velocity < 0.0;
        }
        self.pulling
    }
}

impl PlayerPolicy for JitteryPolicy {
    fn name(&self) -> &'static str {
        "Jittery"
    }

    fn wants_pull(&mut self, view: &ReelView) -> bool {
        let intent = self.tracker.wants_pull(view);
        if self.rng.gen_bool(JITTER_FLIP_CHANCE) {
            !intent
        } else {
            intent
        }
    }
}
