use flock_engine::{step, Agent, AgentId, Bounds, FlockConfig, FlockParams, FlockSimulation, RuleToggles, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f32 = 1e-4;

fn agent(id: u64, x: f32, y: f32, dx: f32, dy: f32) -> Agent {
    Agent::new(AgentId(id), Vec2::new(x, y), Vec2::new(dx, dy), [85, 140, 244])
}

/// Rules off, huge world, no margin: nothing but the speed limit touches velocity.
fn isolated_params() -> FlockParams {
    FlockParams {
        bounds: Bounds::new(100_000.0, 100_000.0),
        boundary_margin: 0.0,
        toggles: RuleToggles::none(),
        ..FlockParams::default()
    }
}

fn seeded_flock(count: usize, seed: u64) -> (Vec<Agent>, FlockParams) {
    let params = FlockParams {
        bounds: Bounds::new(800.0, 600.0),
        repulsion_point: Some(Vec2::new(400.0, 300.0)),
        trail_lifetime: 7,
        ..FlockParams::default()
    };
    let coloring = flock_engine::Coloring::Fixed([255, 255, 255]);
    let population = flock_engine::seed(count, params.bounds, &coloring, 0, &mut StdRng::seed_from_u64(seed)).unwrap();
    (population, params)
}

#[test]
fn speed_stays_bounded_every_tick() {
    let (mut population, params) = seeded_flock(150, 1);
    // Containment runs after the speed limit and may add up to turn_factor per axis.
    let ceiling = params.speed_limit + params.turn_factor * std::f32::consts::SQRT_2 + EPS;
    for _ in 0..200 {
        population = step(&population, &params);
        for a in &population {
            assert!(a.speed() <= ceiling, "{} moving at {}", a.id, a.speed());
        }
    }
}

#[test]
fn speed_limit_is_exact_away_from_edges() {
    let params = FlockParams { speed_limit: 4.0, ..isolated_params() };
    let population = vec![agent(0, 50_000.0, 50_000.0, 30.0, -40.0), agent(1, 10.0, 10.0, 1.0, 1.0)];
    let next = step(&population, &params);
    assert!((next[0].speed() - 4.0).abs() < EPS);
    // Direction preserved.
    assert!((next[0].velocity.x - 2.4).abs() < EPS && (next[0].velocity.y + 3.2).abs() < EPS);
    assert_eq!(next[1].velocity, Vec2::new(1.0, 1.0));
}

#[test]
fn population_size_is_preserved() {
    for count in [0usize, 1, 2, 57] {
        let (population, params) = seeded_flock(count, count as u64);
        assert_eq!(step(&population, &params).len(), count);
    }
}

#[test]
fn trails_never_exceed_lifetime() {
    let (mut population, params) = seeded_flock(40, 2);
    for tick in 1..=20usize {
        population = step(&population, &params);
        for a in &population {
            assert!(a.trail.len() <= params.trail_lifetime);
            assert_eq!(a.trail.len(), tick.min(params.trail_lifetime));
            assert_eq!(a.trail.back(), Some(&a.position));
        }
    }
}

#[test]
fn lone_agent_only_feels_limit_and_bounds() {
    let params = FlockParams {
        bounds: Bounds::new(1000.0, 1000.0),
        repulsion_point: None,
        ..FlockParams::default()
    };
    // All rules on, but nobody else around: cohesion/separation/alignment contribute nothing.
    let population = vec![agent(0, 500.0, 500.0, 3.0, -2.0)];
    let next = step(&population, &params);
    assert_eq!(next[0].velocity, Vec2::new(3.0, -2.0));
    assert_eq!(next[0].position, Vec2::new(503.0, 498.0));

    // Near the left edge only containment changes it.
    let population = vec![agent(0, 10.0, 500.0, 3.0, -2.0)];
    let next = step(&population, &params);
    assert_eq!(next[0].velocity, Vec2::new(4.0, -2.0));
}

#[test]
fn step_is_deterministic() {
    let (population, params) = seeded_flock(80, 3);
    let a = step(&population, &params);
    let b = step(&population, &params);
    assert_eq!(a, b);
}

#[test]
fn boundary_nudge_points_inward() {
    let params = FlockParams {
        bounds: Bounds::new(1000.0, 1000.0),
        boundary_margin: 200.0,
        turn_factor: 1.0,
        toggles: RuleToggles::none(),
        ..FlockParams::default()
    };
    let population = vec![agent(0, 0.0, 500.0, -2.0, 0.0)];
    let next = step(&population, &params);
    assert!(next[0].velocity.x > population[0].velocity.x);
    assert!((next[0].velocity.x - -1.0).abs() < EPS);
    // No clamp: the agent keeps drifting out this tick.
    assert!(next[0].position.x < 0.0);
}

#[test]
fn containment_applies_after_speed_limit() {
    let params = FlockParams {
        bounds: Bounds::new(1000.0, 1000.0),
        boundary_margin: 200.0,
        turn_factor: 1.0,
        speed_limit: 5.0,
        toggles: RuleToggles::none(),
        ..FlockParams::default()
    };
    let population = vec![agent(0, 10.0, 500.0, -20.0, 0.0)];
    let next = step(&population, &params);
    // Limited to (-5, 0) first, then nudged inward by one; the other order gives (-5, 0).
    assert_eq!(next[0].velocity, Vec2::new(-4.0, 0.0));
    assert_eq!(next[0].position, Vec2::new(6.0, 500.0));
}

#[test]
fn alignment_sees_velocity_after_separation() {
    let params = FlockParams {
        separation_factor: 0.1,
        matching_factor: 0.5,
        toggles: RuleToggles { avoid_others: true, match_velocity: true, ..RuleToggles::none() },
        ..isolated_params()
    };
    let population = vec![agent(0, 0.0, 0.0, 0.0, 0.0), agent(1, 10.0, 0.0, 0.0, 0.0)];
    let next = step(&population, &params);
    // Separation gives -1.0; alignment then pulls halfway back towards the neighbor's 0.0.
    assert!((next[0].velocity.x + 0.5).abs() < EPS);
    assert!((next[1].velocity.x - 0.5).abs() < EPS);
    assert_eq!(next[0].velocity.y, 0.0);
}

#[test]
fn two_close_agents_push_apart() {
    let params = FlockParams {
        separation_distance: 20.0,
        separation_factor: 0.05,
        toggles: RuleToggles { avoid_others: true, ..RuleToggles::none() },
        ..isolated_params()
    };
    let population = vec![agent(0, 0.0, 0.0, 0.0, 0.0), agent(1, 10.0, 0.0, 0.0, 0.0)];
    let next = step(&population, &params);
    assert!(next[0].velocity.x < 0.0);
    assert!(next[1].velocity.x > 0.0);
    assert!((next[0].velocity.x + 0.5).abs() < EPS);
    assert!((next[1].velocity.x - 0.5).abs() < EPS);
}

#[test]
fn far_apart_agents_feel_no_cohesion() {
    let params = FlockParams {
        visual_range: 75.0,
        toggles: RuleToggles { towards_center: true, ..RuleToggles::none() },
        ..isolated_params()
    };
    let population = vec![
        agent(0, 1000.0, 1000.0, 1.0, 0.0),
        agent(1, 1200.0, 1000.0, 0.0, 1.0),
        agent(2, 1000.0, 1300.0, -1.0, -1.0),
    ];
    let next = step(&population, &params);
    for (before, after) in population.iter().zip(&next) {
        assert_eq!(before.velocity, after.velocity);
    }
}

#[test]
fn cohesion_self_inclusion_halves_the_pull() {
    let params = FlockParams {
        centering_factor: 0.1,
        toggles: RuleToggles { towards_center: true, ..RuleToggles::none() },
        ..isolated_params()
    };
    let population = vec![agent(0, 0.0, 0.0, 0.0, 0.0), agent(1, 40.0, 0.0, 0.0, 0.0)];
    let next = step(&population, &params);
    // Centroid of {self, other} is 20 away, not 40: delta 2.0 rather than 4.0.
    assert!((next[0].velocity.x - 2.0).abs() < EPS);
    assert!((next[1].velocity.x + 2.0).abs() < EPS);
}

#[test]
fn repulsion_point_pushes_away_and_missing_point_disables() {
    let toggles = RuleToggles { mouse_effect: true, ..RuleToggles::none() };
    let with_point = FlockParams {
        repulsion_point: Some(Vec2::new(100.0, 100.0)),
        toggles,
        ..isolated_params()
    };
    let population = vec![agent(0, 150.0, 100.0, 0.0, 0.0)];
    let next = step(&population, &with_point);
    assert!((next[0].velocity.x - 2.5).abs() < EPS);

    let without_point = FlockParams { repulsion_point: None, ..with_point.clone() };
    assert_eq!(step(&population, &without_point)[0].velocity, Vec2::zero());

    let bad_point = FlockParams { repulsion_point: Some(Vec2::new(f32::NAN, 1.0)), ..with_point };
    assert_eq!(step(&population, &bad_point)[0].velocity, Vec2::zero());
}

#[test]
fn degenerate_config_degrades_quietly() {
    let (population, mut params) = seeded_flock(30, 4);
    params.visual_range = 0.0;
    params.speed_limit = 0.0;
    params.boundary_margin = 0.0;
    params.repulsion_point = None;
    let next = step(&population, &params);
    for (before, after) in population.iter().zip(&next) {
        assert_eq!(after.velocity, Vec2::zero());
        assert_eq!(after.position, before.position);
    }
}

#[test]
fn simulation_runs_from_toml() {
    let text = r#"
        [universe]
        width = 640.0
        height = 480.0

        [initial_conditions]
        count = 25
        seed = 99

        [appearance]
        theme = "neon"
        trail_lifetime = 4
    "#;
    let config = FlockConfig::from_toml_str(text).unwrap();
    let mut a = FlockSimulation::new(config.clone()).unwrap();
    let mut b = FlockSimulation::new(config).unwrap();
    for _ in 0..30 {
        a.step();
        b.step();
    }
    assert_eq!(a.population(), b.population());
    assert_eq!(a.current_agent_count(), 25);
    assert!(a.population().iter().all(|agent| agent.trail.len() == 4));

    let ids: std::collections::HashSet<_> = a.population().iter().map(|agent| agent.id).collect();
    assert_eq!(ids.len(), 25);
}
