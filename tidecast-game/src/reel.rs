//! The reel minigame: a pursuit game between the player's control window and
//! a randomly wandering fish marker.
//!
//! All positions are normalised to `[0, 1]` along the track. The minigame is
//! purely step-driven; it owns its RNG stream so that a fixed seed and a
//! fixed input sequence always reproduce the same trajectory.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTROL_WIDTH_MAX, CONTROL_WIDTH_MIN, EFFICIENCY_MIN, FISH_COOLDOWN_MAX_SECS,
    FISH_COOLDOWN_MIN_SECS, FISH_COOLDOWN_RES_MAX, FISH_COOLDOWN_RES_MIN, FISH_MARKER_PX,
    FISH_RETARGET_RES_MAX, FISH_RETARGET_RES_MIN, FISH_RETARGET_SPAN, FISH_SMOOTHING_PER_FRAME,
    FISH_SMOOTHING_RES_MAX, FISH_SMOOTHING_RES_MIN, FISH_TARGET_MAX, FISH_TARGET_MIN,
    MOVEMENT_FACTOR_MIN, PROGRESS_DECAY_PER_FRAME, PROGRESS_DECAY_RESILIENCE,
    PROGRESS_GAIN_PER_FRAME, PROGRESS_MAX, PROGRESS_MIN, REEL_ACCELERATION, REEL_FRAME_RATE,
    REEL_START_FISH, REEL_START_PROGRESS, REEL_START_WINDOW, REEL_VELOCITY_MAX,
    REEL_VELOCITY_TO_TRACK, RESILIENCE_MIN,
};
use crate::numbers::{clamp, clamp_min, lerp};
use crate::rng::{CountingRng, StreamRng};

/// Inputs for one reel minigame. Out-of-range values are clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelParams {
    pub resilience: f64,
    pub progress_efficiency: f64,
    pub control_width: f64,
    pub movement_factor: f64,
    pub initial_progress: f64,
}

impl Default for ReelParams {
    fn default() -> Self {
        Self {
            resilience: 1.0,
            progress_efficiency: 1.0,
            control_width: CONTROL_WIDTH_MIN,
            movement_factor: 1.0,
            initial_progress: REEL_START_PROGRESS,
        }
    }
}

impl ReelParams {
    #[must_use]
    fn sanitized(self) -> Self {
        Self {
            resilience: clamp_min(RESILIENCE_MIN, self.resilience),
            progress_efficiency: clamp_min(EFFICIENCY_MIN, self.progress_efficiency),
            control_width: clamp(CONTROL_WIDTH_MIN, CONTROL_WIDTH_MAX, self.control_width),
            movement_factor: clamp_min(MOVEMENT_FACTOR_MIN, self.movement_factor),
            initial_progress: clamp(PROGRESS_MIN, PROGRESS_MAX, self.initial_progress),
        }
    }
}

/// Read-only snapshot of the reel, handed to presentation code and policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelView {
    pub progress: f64,
    pub window_center: f64,
    pub control_width: f64,
    pub fish_center: f64,
    pub velocity: f64,
    pub pulling: bool,
}

#[derive(Debug, Clone)]
pub struct ReelMinigame {
    params: ReelParams,
    progress: f64,
    direction: f64,
    velocity: f64,
    window_center: f64,
    fish_center: f64,
    fish_target: f64,
    fish_cooldown: f64,
    finished: bool,
    success: bool,
    perfect: bool,
    steps: u64,
    rng: StreamRng,
}

impl ReelMinigame {
    /// Start a reel; the window begins released at the far end of the track.
    #[must_use]
    pub fn new(params: ReelParams, rng: StreamRng) -> Self {
        let params = params.sanitized();
        let half = params.control_width / 2.0;
        let mut reel = Self {
            params,
            progress: params.initial_progress,
            direction: -1.0,
            velocity: 0.0,
            window_center: clamp(half, 1.0 - half, REEL_START_WINDOW),
            fish_center: REEL_START_FISH,
            fish_target: REEL_START_FISH,
            fish_cooldown: 0.0,
            finished: false,
            success: false,
            perfect: true,
            steps: 0,
            rng,
        };
        reel.check_finished();
        reel
    }

    #[must_use]
    pub fn seeded(params: ReelParams, seed: u64) -> Self {
        Self::new(params, CountingRng::seeded(seed))
    }

    /// Begin pulling the window toward the far end.
    pub const fn press(&mut self) {
        self.direction = 1.0;
    }

    pub const fn release(&mut self) {
        self.direction = -1.0;
    }

    /// Advance one step of `dt_seconds` on a track `track_pixel_width` pixels wide.
    /// No-op once finished.
    pub fn update(&mut self, dt_seconds: f64, track_pixel_width: f64) {
        if self.finished {
            return;
        }
        self.steps = self.steps.saturating_add(1);
        let frames = dt_seconds * REEL_FRAME_RATE;

        self.velocity = clamp(
            -REEL_VELOCITY_MAX,
            REEL_VELOCITY_MAX,
            self.velocity + self.direction * REEL_ACCELERATION * frames,
        );
        let half = self.params.control_width / 2.0;
        self.window_center = clamp(
            half,
            1.0 - half,
            self.window_center + self.velocity * REEL_VELOCITY_TO_TRACK * frames,
        );

        self.fish_cooldown -= dt_seconds;
        if self.fish_cooldown <= 0.0 {
            self.retarget_fish();
        }

        let smoothing = clamp(
            0.0,
            1.0,
            FISH_SMOOTHING_PER_FRAME * frames
                / clamp(FISH_SMOOTHING_RES_MIN, FISH_SMOOTHING_RES_MAX, self.params.resilience),
        );
        self.fish_center = lerp(self.fish_center, self.fish_target, smoothing);

        let marker = FISH_MARKER_PX / track_pixel_width.max(1.0);
        let fish_left = self.fish_center - marker / 2.0;
        let fish_right = self.fish_center + marker / 2.0;
        let window_left = self.window_center - half;
        let window_right = self.window_center + half;
        let overlapping = fish_right > window_left && fish_left < window_right;

        self.apply_contact(dt_seconds, overlapping);
        log::trace!(
            "reel step {}: window {:.3} fish {:.3} progress {:.2} overlap {overlapping}",
            self.steps,
            self.window_center,
            self.fish_center,
            self.progress
        );
    }

    /// Apply the progress rule for one step with a known overlap result.
    ///
    /// `update` calls this after moving the window and the fish; harnesses
    /// can call it directly to force contact or a miss. No-op once finished.
    pub fn apply_contact(&mut self, dt_seconds: f64, overlapping: bool) {
        if self.finished {
            return;
        }
        let frames = dt_seconds * REEL_FRAME_RATE;
        if overlapping {
            self.progress += PROGRESS_GAIN_PER_FRAME * self.params.progress_efficiency * frames;
        } else {
            // The resilience term is per step, not per frame.
            self.progress -=
                PROGRESS_DECAY_PER_FRAME * frames + PROGRESS_DECAY_RESILIENCE * self.params.resilience;
            self.perfect = false;
        }
        self.progress = clamp(PROGRESS_MIN, PROGRESS_MAX, self.progress);
        self.check_finished();
    }

    fn retarget_fish(&mut self) {
        let swing = self.rng.gen_range(-FISH_RETARGET_SPAN..FISH_RETARGET_SPAN)
            * clamp(FISH_RETARGET_RES_MIN, FISH_RETARGET_RES_MAX, self.params.resilience);
        self.fish_target = clamp(FISH_TARGET_MIN, FISH_TARGET_MAX, self.fish_center + swing);
        self.fish_cooldown = self.rng.gen_range(FISH_COOLDOWN_MIN_SECS..FISH_COOLDOWN_MAX_SECS)
            * clamp(FISH_COOLDOWN_RES_MIN, FISH_COOLDOWN_RES_MAX, self.params.resilience)
            / self.params.movement_factor;
    }

    fn check_finished(&mut self) {
        if self.progress >= PROGRESS_MAX {
            self.finished = true;
            self.success = true;
        } else if self.progress <= PROGRESS_MIN {
            self.finished = true;
            self.success = false;
        }
    }

    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub const fn player_window_center(&self) -> f64 {
        self.window_center
    }

    #[must_use]
    pub const fn control_width(&self) -> f64 {
        self.params.control_width
    }

    #[must_use]
    pub const fn fish_center(&self) -> f64 {
        self.fish_center
    }

    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub const fn is_pulling(&self) -> bool {
        self.direction > 0.0
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// True while the window has never lost contact with the fish.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.perfect
    }

    #[must_use]
    pub const fn params(&self) -> &ReelParams {
        &self.params
    }

    /// Steps applied through `update`.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Draws taken from the reel's RNG stream so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub const fn view(&self) -> ReelView {
        ReelView {
            progress: self.progress,
            window_center: self.window_center,
            control_width: self.params.control_width,
            fish_center: self.fish_center,
            velocity: self.velocity,
            pulling: self.direction > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.05;
    const TRACK: f64 = 420.0;

    fn scenario_params() -> ReelParams {
        ReelParams {
            resilience: 0.9,
            progress_efficiency: 1.0,
            control_width: 0.18,
            movement_factor: 1.0,
            initial_progress: 20.0,
        }
    }

    #[test]
    fn construction_clamps_params_and_window() {
        let reel = ReelMinigame::seeded(
            ReelParams {
                resilience: 0.0,
                progress_efficiency: -3.0,
                control_width: 2.0,
                movement_factor: 0.0,
                initial_progress: 500.0,
            },
            1,
        );
        let params = reel.params();
        assert!((params.resilience - 0.2).abs() < f64::EPSILON);
        assert!((params.progress_efficiency - 0.1).abs() < f64::EPSILON);
        assert!((params.control_width - 0.9).abs() < f64::EPSILON);
        assert!((params.movement_factor - 0.1).abs() < f64::EPSILON);
        assert!((reel.progress() - 100.0).abs() < f64::EPSILON);
        assert!(reel.is_finished());
        assert!(reel.is_success());

        let fresh = ReelMinigame::seeded(scenario_params(), 1);
        assert!((fresh.player_window_center() - 0.9).abs() < 1e-12);
        assert!((fresh.fish_center() - 0.5).abs() < f64::EPSILON);
        assert!(!fresh.is_pulling());
    }

    #[test]
    fn forced_contact_gains_point_six_per_tick() {
        let mut reel = ReelMinigame::seeded(scenario_params(), 3);
        let mut last = reel.progress();
        for _ in 0..60 {
            reel.apply_contact(DT, true);
            assert!(reel.progress() > last);
            last = reel.progress();
        }
        assert!((reel.progress() - 56.0).abs() < 1e-6);
        assert!(reel.is_perfect());
        let mut ticks = 60;
        while !reel.is_finished() {
            reel.apply_contact(DT, true);
            ticks += 1;
        }
        assert_eq!(ticks, 134);
        assert!(reel.is_success());
        assert!((reel.progress() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn forced_miss_fails_on_tick_thirty_five() {
        let mut reel = ReelMinigame::seeded(scenario_params(), 3);
        let mut ticks = 0;
        let mut last = reel.progress();
        while !reel.is_finished() {
            reel.apply_contact(DT, false);
            ticks += 1;
            assert!(reel.progress() < last);
            last = reel.progress();
        }
        assert_eq!(ticks, 35);
        assert!(!reel.is_success());
        assert!(!reel.is_perfect());
        assert!((reel.progress() + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn finished_reel_ignores_updates() {
        let mut reel = ReelMinigame::seeded(scenario_params(), 9);
        while !reel.is_finished() {
            reel.apply_contact(DT, false);
        }
        let before = reel.view();
        let draws = reel.rng_draws();
        for _ in 0..10 {
            reel.press();
            reel.update(DT, TRACK);
            reel.release();
        }
        assert_eq!(reel.view().progress, before.progress);
        assert_eq!(reel.view().fish_center, before.fish_center);
        assert_eq!(reel.rng_draws(), draws);
    }

    #[test]
    fn holding_pull_caps_velocity_and_window() {
        let mut reel = ReelMinigame::seeded(scenario_params(), 4);
        reel.press();
        for _ in 0..40 {
            reel.update(DT, TRACK);
            assert!(reel.velocity() <= 14.0);
            let half = reel.control_width() / 2.0;
            assert!(reel.player_window_center() >= half - 1e-12);
            assert!(reel.player_window_center() <= 1.0 - half + 1e-12);
        }
        assert!((reel.velocity() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fish_stays_inside_target_band() {
        let mut reel = ReelMinigame::seeded(
            ReelParams {
                resilience: 0.2,
                movement_factor: 5.0,
                progress_efficiency: 50.0,
                ..scenario_params()
            },
            77,
        );
        for step in 0..2_000 {
            if reel.is_finished() {
                break;
            }
            if step % 7 < 3 {
                reel.press();
            } else {
                reel.release();
            }
            reel.update(DT, TRACK);
            assert!((0.03..=0.97).contains(&reel.fish_center()));
            assert!((-1.0..=100.0).contains(&reel.progress()));
        }
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed: u64| {
            let mut reel = ReelMinigame::seeded(scenario_params(), seed);
            let mut trace = Vec::new();
            for step in 0..300 {
                if step % 11 < 5 {
                    reel.press();
                } else {
                    reel.release();
                }
                reel.update(DT, TRACK);
                trace.push((reel.progress(), reel.fish_center(), reel.player_window_center()));
            }
            trace
        };
        assert_eq!(run(21), run(21));
        assert_ne!(run(21), run(22));
    }
}
