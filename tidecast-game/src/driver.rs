//! Drivers that feed time and input into a session.
//!
//! The session itself has no timers or threads. Everything here is an adapter
//! around the step contract of [`SessionDriver`]: a cooperative fixed-tick
//! loop, a callback adapter, a background-thread runner and (with the `async`
//! feature) a tokio interval runner. They are interchangeable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::constants::{DEFAULT_TICK_MS, DEFAULT_TRACK_PX};
use crate::fish::CaughtFish;
use crate::numbers::duration_secs;
use crate::reel::ReelView;
use crate::session::{FishingSession, SessionResult, StepOutcome};

/// The step contract every scheduler drives.
pub trait SessionDriver {
    fn press(&mut self);
    fn release(&mut self);
    fn update(&mut self, dt_seconds: f64, track_pixel_width: f64) -> StepOutcome;
    /// Reel snapshot, once the fish has bitten.
    fn view(&self) -> Option<ReelView>;
    fn is_terminal(&self) -> bool;
    /// Force a `Failed` result; returns the existing result when already terminal.
    fn cancel(&mut self) -> SessionResult;
}

impl SessionDriver for FishingSession {
    fn press(&mut self) {
        Self::press(self);
    }

    fn release(&mut self) {
        Self::release(self);
    }

    fn update(&mut self, dt_seconds: f64, track_pixel_width: f64) -> StepOutcome {
        Self::update(self, dt_seconds, track_pixel_width)
    }

    fn view(&self) -> Option<ReelView> {
        Self::view(self)
    }

    fn is_terminal(&self) -> bool {
        Self::is_terminal(self)
    }

    fn cancel(&mut self) -> SessionResult {
        Self::cancel(self)
    }
}

/// Callbacks for presentation layers. Every hook defaults to a no-op.
pub trait SessionObserver {
    fn on_cast(&mut self, _progress: f64) {}
    fn on_bite(&mut self) {}
    fn on_progress(&mut self, _view: &ReelView) {}
    fn on_end(&mut self, _result: &SessionResult) {}
}

impl SessionObserver for () {}

/// Turns step outcomes of an inner driver into observer callbacks.
#[derive(Debug)]
pub struct ObservedDriver<D, O> {
    inner: D,
    observer: O,
}

impl<D: SessionDriver, O: SessionObserver> ObservedDriver<D, O> {
    pub const fn new(inner: D, observer: O) -> Self {
        Self { inner, observer }
    }

    pub const fn inner(&self) -> &D {
        &self.inner
    }

    pub const fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (D, O) {
        (self.inner, self.observer)
    }
}

impl<D: SessionDriver, O: SessionObserver> SessionDriver for ObservedDriver<D, O> {
    fn press(&mut self) {
        self.inner.press();
    }

    fn release(&mut self) {
        self.inner.release();
    }

    fn update(&mut self, dt_seconds: f64, track_pixel_width: f64) -> StepOutcome {
        let outcome = self.inner.update(dt_seconds, track_pixel_width);
        match &outcome {
            StepOutcome::Casting { progress } => self.observer.on_cast(*progress),
            StepOutcome::Bite => self.observer.on_bite(),
            StepOutcome::Reeling { .. } => {
                if let Some(view) = self.inner.view() {
                    self.observer.on_progress(&view);
                }
            }
            StepOutcome::Finished(result) => self.observer.on_end(result),
            StepOutcome::Idle => {}
        }
        outcome
    }

    fn view(&self) -> Option<ReelView> {
        self.inner.view()
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    fn cancel(&mut self) -> SessionResult {
        let was_terminal = self.inner.is_terminal();
        let result = self.inner.cancel();
        if !was_terminal {
            self.observer.on_end(&result);
        }
        result
    }
}

/// Cooperative loop stepping a session by a fixed simulated tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTickDriver {
    /// Simulated time per step.
    pub tick: Duration,
    pub track_px: f64,
    /// Wall-clock sleep between steps; `None` runs as fast as possible.
    pub pace: Option<Duration>,
}

impl Default for FixedTickDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_MS), DEFAULT_TRACK_PX)
    }
}

impl FixedTickDriver {
    #[must_use]
    pub const fn new(tick: Duration, track_px: f64) -> Self {
        Self {
            tick,
            track_px,
            pace: None,
        }
    }

    /// Sleep for `pace` after every step.
    #[must_use]
    pub const fn paced(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f64 {
        duration_secs(self.tick)
    }

    /// Apply the policy's input for this tick, then advance one tick.
    pub fn step<D, P>(&self, session: &mut D, policy: &mut P) -> StepOutcome
    where
        D: SessionDriver + ?Sized,
        P: FnMut(&ReelView) -> bool + ?Sized,
    {
        if let Some(view) = session.view() {
            if policy(&view) {
                session.press();
            } else {
                session.release();
            }
        }
        session.update(self.dt_seconds(), self.track_px)
    }

    /// Step until the session ends. Past `max_ticks` steps the session is
    /// cancelled and reported as `Failed`.
    pub fn run<D, P>(&self, session: &mut D, policy: P, max_ticks: u32) -> SessionResult
    where
        D: SessionDriver + ?Sized,
        P: FnMut(&ReelView) -> bool,
    {
        self.run_until(session, policy, max_ticks, || false)
    }

    /// Like [`run`](Self::run), also cancelling as soon as `stop` returns true.
    pub fn run_until<D, P, S>(
        &self,
        session: &mut D,
        mut policy: P,
        max_ticks: u32,
        mut stop: S,
    ) -> SessionResult
    where
        D: SessionDriver + ?Sized,
        P: FnMut(&ReelView) -> bool,
        S: FnMut() -> bool,
    {
        let mut ticks = 0_u32;
        loop {
            if stop() {
                return session.cancel();
            }
            if ticks >= max_ticks {
                log::warn!("session still running after {max_ticks} ticks; cancelling");
                return session.cancel();
            }
            match self.step(session, &mut policy) {
                StepOutcome::Finished(result) => return result,
                StepOutcome::Idle => return session.cancel(),
                StepOutcome::Casting { .. } | StepOutcome::Bite | StepOutcome::Reeling { .. } => {}
            }
            ticks = ticks.saturating_add(1);
            if let Some(pace) = self.pace {
                thread::sleep(pace);
            }
        }
    }
}

/// A session running on its own thread.
///
/// Dropping the handle cancels the worker and waits for it, so the session
/// always settles into a result its observer hears about.
#[derive(Debug)]
pub struct ThreadedSession {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<SessionResult>>,
    fish: CaughtFish,
}

impl ThreadedSession {
    /// Ask the worker to stop; it ends with a cancelled `Failed` result.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    #[must_use]
    pub const fn fish(&self) -> &CaughtFish {
        &self.fish
    }

    /// Wait for the worker. A worker that panicked still yields a cancelled result.
    #[must_use]
    pub fn join(mut self) -> SessionResult {
        self.wait()
    }

    fn wait(&mut self) -> SessionResult {
        let Some(handle) = self.handle.take() else {
            return SessionResult::cancelled(self.fish.clone());
        };
        match handle.join() {
            Ok(result) => result,
            Err(_) => {
                log::warn!("session worker for {} panicked; reporting cancellation", self.fish.id);
                SessionResult::cancelled(self.fish.clone())
            }
        }
    }
}

impl Drop for ThreadedSession {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        self.cancel();
        let result = self.wait();
        log::debug!(
            "session handle for {} dropped; worker ended {:?} (cancelled: {})",
            self.fish.id,
            result.phase(),
            result.cancelled
        );
    }
}

/// Move `session` onto a background thread that owns it until it ends.
///
/// # Errors
///
/// Returns an error if the operating system refuses to spawn the thread.
pub fn spawn_threaded<P, O>(
    session: FishingSession,
    driver: FixedTickDriver,
    policy: P,
    observer: O,
    max_ticks: u32,
) -> std::io::Result<ThreadedSession>
where
    P: FnMut(&ReelView) -> bool + Send + 'static,
    O: SessionObserver + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let fish = session.fish().clone();
    let worker_stop = Arc::clone(&stop);
    // Thread names cannot hold NUL bytes, and ids come straight from tuning data.
    let handle = thread::Builder::new()
        .name(format!("tidecast-session-{}", fish.id.replace('\0', "")))
        .spawn(move || {
            let mut observed = ObservedDriver::new(session, observer);
            driver.run_until(&mut observed, policy, max_ticks, || {
                worker_stop.load(Ordering::Acquire)
            })
        })?;
    Ok(ThreadedSession {
        stop,
        handle: Some(handle),
        fish,
    })
}

/// Drive a session from a tokio interval. Dropping the future leaves the
/// session untouched; call [`SessionDriver::cancel`] to settle it.
#[cfg(feature = "async")]
pub async fn run_async<D, P>(
    session: &mut D,
    driver: FixedTickDriver,
    mut policy: P,
    max_ticks: u32,
) -> SessionResult
where
    D: SessionDriver + ?Sized,
    P: FnMut(&ReelView) -> bool,
{
    // tokio rejects a zero period.
    let period = driver.tick.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut ticks = 0_u32;
    loop {
        interval.tick().await;
        if ticks >= max_ticks {
            log::warn!("async session still running after {max_ticks} ticks; cancelling");
            return session.cancel();
        }
        match driver.step(session, &mut policy) {
            StepOutcome::Finished(result) => return result,
            StepOutcome::Idle => return session.cancel(),
            StepOutcome::Casting { .. } | StepOutcome::Bite | StepOutcome::Reeling { .. } => {}
        }
        ticks = ticks.saturating_add(1);
    }
}
