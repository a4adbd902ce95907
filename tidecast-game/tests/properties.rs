use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tidecast_game::{
    CaughtFish, CharacterStats, FishParams, MapSpec, ReelMinigame, ReelParams, RodParams,
    TuningCatalog, WorldParams,
};

const SWEEP: usize = 400;

fn wild(rng: &mut ChaCha20Rng) -> f64 {
    // Mix sane values with negative and oversized ones.
    match rng.gen_range(0..4) {
        0 => rng.gen_range(-5.0..0.0),
        1 => rng.gen_range(5.0..500.0),
        _ => rng.gen_range(0.0..2.0),
    }
}

fn random_catalog(rng: &mut ChaCha20Rng) -> (TuningCatalog, CaughtFish) {
    let world = WorldParams {
        id: 1,
        name: String::from("Sweep"),
        reel_progress_rate: wild(rng),
        fish_wiggle_strength: wild(rng),
        bite_time_base_ms: rng.gen_range(-5_000..20_000),
        bite_time_variance_ms: rng.gen_range(-5_000..20_000),
        reel_bar_scale: wild(rng),
        map: Some(MapSpec::standard(false)),
    };
    let fish = FishParams::neutral("sweep_fish", "Sweep Fish", rng.gen_range(0..500))
        .with_difficulty(wild(rng), wild(rng), wild(rng));
    let rod = RodParams::neutral("starter_rod", "Sweep Rod")
        .with_bonuses(0, wild(rng), wild(rng), wild(rng), wild(rng));
    let character = CharacterStats::new(wild(rng), wild(rng), wild(rng));
    let catalog = TuningCatalog::new(
        vec![world],
        vec![fish.clone()],
        vec![(String::from("sweeper"), character)],
        vec![rod],
    );
    let golden = rng.gen_bool(0.5);
    (catalog, CaughtFish::from_params(&fish, golden))
}

#[test]
fn resolved_params_stay_in_bounds() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5EED);
    for _ in 0..SWEEP {
        let (catalog, fish) = random_catalog(&mut rng);
        let params = catalog.resolve(1, "sweeper", "starter_rod", &fish, &mut rng);
        assert!(params.bite_time_ms >= 500, "{params:?}");
        assert!((0.0..=0.9).contains(&params.golden_chance), "{params:?}");
        assert!((0.2..=0.9).contains(&params.control_width), "{params:?}");
        assert!((0.75..=1.8).contains(&params.bar_scale_ui), "{params:?}");
        assert!(params.resilience >= 0.2);
        assert!(params.movement_factor >= 0.3);
        assert!(params.total_bite_mul >= 0.25);
    }
}

#[test]
fn reel_invariants_hold_under_random_input() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xBEEF);
    for run in 0..60_u64 {
        let params = ReelParams {
            resilience: wild(&mut rng),
            progress_efficiency: wild(&mut rng),
            control_width: wild(&mut rng),
            movement_factor: wild(&mut rng),
            initial_progress: rng.gen_range(-10.0..120.0),
        };
        let mut reel = ReelMinigame::seeded(params, run);
        for _ in 0..3_000 {
            if rng.gen_bool(0.5) {
                reel.press();
            } else {
                reel.release();
            }
            let dt = rng.gen_range(0.0..0.2);
            reel.update(dt, rng.gen_range(0.0..1_000.0));
            let progress = reel.progress();
            assert!((-1.0..=100.0).contains(&progress));
            let at_bound = progress >= 100.0 || progress <= -1.0;
            assert_eq!(reel.is_finished(), at_bound);
            if reel.is_finished() {
                assert_eq!(reel.is_success(), progress >= 100.0);
                break;
            }
        }
    }
}

#[test]
fn finished_reel_is_frozen() {
    let mut reel = ReelMinigame::seeded(ReelParams::default(), 12);
    for _ in 0..100_000 {
        if reel.is_finished() {
            break;
        }
        reel.update(0.05, 420.0);
    }
    assert!(reel.is_finished());
    let frozen = (reel.view(), reel.rng_draws(), reel.steps());
    for step in 0..50 {
        if step % 2 == 0 {
            reel.press();
        } else {
            reel.release();
        }
        reel.update(0.05, 420.0);
        reel.apply_contact(0.05, true);
    }
    let after = reel.view();
    assert_eq!(after.progress, frozen.0.progress);
    assert_eq!(after.fish_center, frozen.0.fish_center);
    assert_eq!(after.window_center, frozen.0.window_center);
    assert_eq!(reel.rng_draws(), frozen.1);
    assert_eq!(reel.steps(), frozen.2);
}

#[test]
fn identical_inputs_replay_identically() {
    let inputs: Vec<(f64, bool)> = {
        let mut rng = ChaCha20Rng::seed_from_u64(77);
        (0..1_500)
            .map(|_| (rng.gen_range(0.01..0.1), rng.gen_bool(0.4)))
            .collect()
    };
    let replay = || {
        let mut reel = ReelMinigame::seeded(ReelParams::default(), 0xFEED);
        inputs
            .iter()
            .map(|&(dt, pulling)| {
                if pulling {
                    reel.press();
                } else {
                    reel.release();
                }
                reel.update(dt, 420.0);
                reel.view()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(replay(), replay());
}
