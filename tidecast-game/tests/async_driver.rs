#![cfg(feature = "async")]

use std::time::Duration;

use tidecast_game::{
    FishingEngine, FishingPhase, FixedTickDriver, Loadout, ReelView, SessionDriver, run_async,
};

#[tokio::test(start_paused = true)]
async fn async_runner_matches_fixed_tick_loop() {
    let engine = FishingEngine::builtin();
    let loadout = Loadout::default();
    let driver = FixedTickDriver::default();
    let policy = |view: &ReelView| view.window_center < view.fish_center;

    let mut sync_session = engine.start_session(&loadout, 99);
    let expected = driver.run(&mut sync_session, policy, 10_000);

    let mut async_session = engine.start_session(&loadout, 99);
    let result = run_async(&mut async_session, driver, policy, 10_000).await;
    assert_eq!(result, expected);
    assert!(async_session.is_terminal());
}

#[tokio::test(start_paused = true)]
async fn async_runner_cancels_past_cap() {
    let engine = FishingEngine::builtin();
    let mut session = engine.start_session(&Loadout::default(), 5);
    let driver = FixedTickDriver::new(Duration::from_millis(10), 420.0);
    let result = run_async(&mut session, driver, |_| false, 3).await;
    assert!(result.cancelled);
    assert_eq!(session.phase(), FishingPhase::Failed);
}
