use std::fs;

use chordwalk_bodies::{HPolytope, Spectrahedron};
use chordwalk_core::{ConvexBody, Halfspace, Point, RngHandle, SamplerError};
use chordwalk_mcmc::{
    boltzmann_walk, sample_boltzmann, sample_nested, sample_polytope, sample_spectrahedron,
    sample_spectrahedron_constrained, BoltzmannTarget, SampleRun, SamplerConfig, WalkKind,
};
use chordwalk_mcmc::walk_boltzmann::boltzmann_step;
use chordwalk_mcmc::{BilliardPhase, WalkState};
use tempfile::tempdir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_for(walk: WalkKind, walk_len: usize) -> SamplerConfig {
    SamplerConfig {
        walk,
        walk_len,
        ..SamplerConfig::default()
    }
}

#[test]
fn polytope_driver_counts_steps_and_stays_inside() {
    init_logging();
    let body = HPolytope::cube(3, 1.0);
    let start = Point::new(3);
    for walk in [
        WalkKind::HitAndRun,
        WalkKind::CoordinateHitAndRun,
        WalkKind::Ball { delta: 0.3 },
        WalkKind::Billiard { diameter: 3.5 },
    ] {
        let config = config_for(walk, 4);
        let run = sample_polytope(&body, &start, 200, &config, &mut config.rng()).unwrap();
        assert_eq!(run.points.len(), 200);
        assert_eq!(run.stats.steps, 1 + 200 * 4);
        assert_eq!(run.stats.generated, 200);
        assert_eq!(run.stats.retained, 200);
        for point in &run.points {
            assert!(body.is_in(point).is_interior(), "{walk:?} left the cube");
        }
    }
}

#[test]
fn polytope_driver_collects_walk_counters() {
    let body = HPolytope::cube(2, 1.0);
    let start = Point::new(2);

    let config = config_for(WalkKind::Ball { delta: 0.5 }, 2);
    let run = sample_polytope(&body, &start, 500, &config, &mut config.rng()).unwrap();
    assert_eq!(run.stats.ball_accepted + run.stats.ball_rejected, run.stats.steps);
    let rate = run.stats.ball_acceptance_rate().unwrap();
    assert!(rate > 0.5 && rate < 1.0, "acceptance {rate}");

    let config = config_for(WalkKind::Billiard { diameter: 6.0 }, 1);
    let run = sample_polytope(&body, &start, 500, &config, &mut config.rng()).unwrap();
    assert!(run.stats.reflections > 0);
    assert!(run.stats.reflections <= run.stats.steps * 3 * 2);
}

#[test]
fn polytope_driver_rejects_bad_input() {
    let body = HPolytope::cube(3, 1.0);
    let config = SamplerConfig::default();
    let err = sample_polytope(&body, &Point::new(2), 10, &config, &mut config.rng()).unwrap_err();
    assert!(matches!(err, SamplerError::Dimension(_)));
    assert_eq!(err.info().context.get("expected").map(String::as_str), Some("3"));

    let config = config_for(WalkKind::HitAndRun, 0);
    let err = sample_polytope(&body, &Point::new(3), 10, &config, &mut config.rng()).unwrap_err();
    assert_eq!(err.info().code, "invalid-parameter");
}

#[test]
fn nested_driver_keeps_inner_points() {
    let large = HPolytope::cube(2, 1.0);
    let small = HPolytope::cube(2, 0.5);
    let config = config_for(WalkKind::HitAndRun, 3);
    let run = sample_nested(&large, &small, &Point::new(2), 20_000, &config, &mut config.rng())
        .unwrap();
    assert_eq!(run.stats.generated, 20_000);
    assert_eq!(run.stats.retained, run.points.len());
    for point in &run.points {
        assert!(small.is_in(point).is_interior());
    }
    let ratio = run.stats.retention_rate().unwrap();
    assert!((ratio - 0.25).abs() < 0.03, "retention {ratio}");

    let wrong = HPolytope::cube(3, 0.5);
    let err = sample_nested(&large, &wrong, &Point::new(2), 1, &config, &mut config.rng())
        .unwrap_err();
    assert_eq!(err.info().code, "dimension-mismatch");
}

#[test]
fn spectrahedron_driver_samples_the_disc() {
    init_logging();
    let body = Spectrahedron::unit_ball(2);
    let mut rng = RngHandle::from_seed(12);
    let run = sample_spectrahedron(&body, &Point::new(2), 2_000, 3, &mut rng).unwrap();
    assert_eq!(run.points.len(), 2_000);
    assert_eq!(run.stats.steps, 6_000);
    let mut mean = [0.0; 2];
    for point in &run.points {
        assert!(point.norm() < 1.0);
        mean[0] += point.coord(0);
        mean[1] += point.coord(1);
    }
    for m in mean {
        assert!((m / 2_000.0).abs() < 0.1);
    }
}

#[test]
fn constrained_spectrahedron_driver_respects_halfspace() {
    let body = Spectrahedron::unit_ball(2);
    let cut = Halfspace::new(Point::from_vec(vec![1.0, 0.0]), 0.0);
    let start = Point::from_vec(vec![-0.5, 0.0]);
    let mut rng = RngHandle::from_seed(13);
    let run = sample_spectrahedron_constrained(&body, &start, 1_000, 2, &cut, &mut rng).unwrap();
    for point in &run.points {
        assert!(point.coord(0) <= 1e-12);
        assert!(body.is_in(point).is_interior());
    }

    let err = sample_spectrahedron(&body, &start, 10, 0, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "invalid-parameter");
    let skew = Halfspace::new(Point::new(3), 0.0);
    let err =
        sample_spectrahedron_constrained(&body, &start, 10, 1, &skew, &mut rng).unwrap_err();
    assert!(matches!(err, SamplerError::Dimension(_)));
}

#[test]
fn boltzmann_driver_restarts_every_sample() {
    let body = HPolytope::cube(2, 1.0);
    let target = BoltzmannTarget::isotropic(Point::from_vec(vec![0.0, 1.0]), 0.2);
    let start = Point::new(2);
    let mut rng = RngHandle::from_seed(5);
    let run = sample_boltzmann(&body, &target, &start, 300, 10, &mut rng).unwrap();
    assert_eq!(run.points.len(), 300);
    assert_eq!(run.stats.steps, 3_000);
    let mean: f64 = run.points.iter().map(|p| p.coord(1)).sum::<f64>() / 300.0;
    assert!(mean < -0.4, "mean {mean}");

    let mut point = start.clone();
    boltzmann_walk(&body, &target, &mut point, 25, &mut rng).unwrap();
    assert!(body.is_in(&point).is_interior());
    let err = boltzmann_walk(&body, &target, &mut Point::new(3), 1, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "dimension-mismatch");
}

#[test]
fn boltzmann_samples_replay_from_the_start_point() {
    let body = HPolytope::cube(3, 1.0);
    let target = BoltzmannTarget::isotropic(Point::from_vec(vec![1.0, -0.5, 0.25]), 0.3);
    let start = Point::from_vec(vec![0.1, 0.2, -0.3]);
    let walk_len = 3;
    let mut rng = RngHandle::from_seed(77);
    let mut replay = rng.clone();
    let run = sample_boltzmann(&body, &target, &start, 5, walk_len, &mut rng).unwrap();

    for (index, sample) in run.points.iter().enumerate() {
        let mut point = start.clone();
        for _ in 0..walk_len {
            boltzmann_step(&mut point, &body, &target, &mut replay);
        }
        assert_eq!(&point, sample, "sample {index} did not restart at the start point");
    }
}

#[test]
fn walk_state_takes_parameters_from_config() {
    let body = HPolytope::cube(2, 1.0);
    let mut config = config_for(WalkKind::Billiard { diameter: 2.5 }, 1);
    config.billiard.safety_margin = 0.9;
    match WalkState::new(&config, Point::new(2), &body) {
        WalkState::Billiard { state, params } => {
            assert_eq!(params.diameter, 2.5);
            assert_eq!(params.safety_margin, 0.9);
            assert_eq!(params.reflection_factor, 3);
            assert_eq!(state.phase(), BilliardPhase::Bootstrap);
        }
        other => panic!("expected a billiard state, got {other:?}"),
    }

    let config = config_for(WalkKind::Ball { delta: 0.4 }, 1);
    match WalkState::new(&config, Point::new(2), &body) {
        WalkState::Ball { delta, point } => {
            assert_eq!(delta, 0.4);
            assert_eq!(point, Point::new(2));
        }
        other => panic!("expected a ball state, got {other:?}"),
    }
}

#[test]
fn billiard_tuning_reaches_the_walk() {
    let body = HPolytope::cube(2, 1.0);
    let mut config = config_for(WalkKind::Billiard { diameter: 20.0 }, 1);
    config.billiard.reflection_factor = 1;
    let run = sample_polytope(&body, &Point::new(2), 300, &config, &mut config.rng()).unwrap();
    // A long budget with one reflection per dimension is capped almost always.
    assert!(run.stats.reflections <= run.stats.steps * 2);
    assert!(run.stats.capped_trajectories > 0);
}

#[test]
fn sample_run_serializes_to_json() {
    let body = HPolytope::cube(2, 1.0);
    let config = SamplerConfig::default();
    let run = sample_polytope(&body, &Point::new(2), 5, &config, &mut config.rng()).unwrap();
    let json = serde_json::to_string(&run).unwrap();
    let back: SampleRun = serde_json::from_str(&json).unwrap();
    assert_eq!(back.stats, run.stats);
    assert_eq!(back.points.len(), run.points.len());
    for (a, b) in back.points.iter().zip(&run.points) {
        for (x, y) in a.coords().iter().zip(b.coords()) {
            assert!((x - y).abs() <= 1e-15 * y.abs().max(1.0));
        }
    }
}

#[test]
fn config_parses_yaml_with_defaults() {
    let config = SamplerConfig::from_yaml_str(
        "walk:\n  type: billiard\n  diameter: 3.0\nwalk_len: 4\nbilliard:\n  safety_margin: 0.99\n",
    )
    .unwrap();
    assert_eq!(config.walk, WalkKind::Billiard { diameter: 3.0 });
    assert_eq!(config.walk_len, 4);
    assert_eq!(config.billiard.safety_margin, 0.99);
    assert_eq!(config.billiard.reflection_factor, 3);

    let default = SamplerConfig::from_yaml_str("{}").unwrap();
    assert_eq!(default, SamplerConfig::default());

    let coord = SamplerConfig::from_yaml_str("walk:\n  type: coordinate-hit-and-run\n").unwrap();
    assert_eq!(coord.walk, WalkKind::CoordinateHitAndRun);
}

#[test]
fn config_rejects_invalid_values() {
    let err = SamplerConfig::from_yaml_str("billiard:\n  safety_margin: 1.5\n").unwrap_err();
    assert_eq!(err.info().code, "invalid-parameter");
    assert_eq!(
        err.info().context.get("field").map(String::as_str),
        Some("safety_margin")
    );
    let err = SamplerConfig::from_yaml_str("walk:\n  type: ball\n  delta: -1.0\n").unwrap_err();
    assert_eq!(err.info().code, "invalid-parameter");
    let err = SamplerConfig::from_yaml_str("walk: [").unwrap_err();
    assert_eq!(err.info().code, "config-parse");
}

#[test]
fn config_loads_from_disk() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("sampler.yaml");
    fs::write(&good, "walk:\n  type: ball\n  delta: 0.25\nseed_policy:\n  master_seed: 7\n")
        .unwrap();
    let config = SamplerConfig::load(&good).unwrap();
    assert_eq!(config.walk, WalkKind::Ball { delta: 0.25 });
    assert_eq!(config.seed_policy.master_seed, 7);
    assert_eq!(config.seed_policy.stream, 0);

    let bad = dir.path().join("broken.yaml");
    fs::write(&bad, "walk_len: [").unwrap();
    let err = SamplerConfig::load(&bad).unwrap_err();
    assert_eq!(err.info().code, "config-parse");
    assert!(err.info().context.contains_key("path"));

    let err = SamplerConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
    assert_eq!(err.info().code, "config-read");
}
