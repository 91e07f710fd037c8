//! Concourse Headless Crowd Harness
//!
//! Runs scripted crowd scenarios and a full lounge soak in-process, with no
//! renderer attached.
//!
//! Usage:
//!   cargo run -p concourse-simtest
//!   cargo run -p concourse-simtest -- --verbose --seed 7 --ticks 6000
//!   cargo run -p concourse-simtest -- --config my_lounge.json

use concourse_core::prelude::*;
use concourse_logic::collision::penetration;
use concourse_logic::gait::{self, GaitParams};
use concourse_logic::geometry::wrap_angle;
use concourse_logic::layout;
use tracing_subscriber::EnvFilter;

// ── Default configuration (same file the tests load) ────────────────────
const LOUNGE_JSON: &str = include_str!("../../../data/lounge.json");

const DT: f32 = 1.0 / 60.0;
const DEFAULT_SOAK_TICKS: u64 = 3600;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: Option<u64>,
    ticks: u64,
    config_path: Option<String>,
}

fn parse_options() -> Result<Options, String> {
    let mut options = Options {
        verbose: false,
        seed: None,
        ticks: DEFAULT_SOAK_TICKS,
        config_path: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                options.seed = Some(value.parse().map_err(|e| format!("bad --seed: {}", e))?);
            }
            "--ticks" => {
                let value = args.next().ok_or("--ticks needs a value")?;
                options.ticks = value.parse().map_err(|e| format!("bad --ticks: {}", e))?;
            }
            "--config" => {
                options.config_path = Some(args.next().ok_or("--config needs a path")?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn main() {
    let options = match parse_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: concourse-simtest [--verbose] [--seed N] [--ticks N] [--config PATH]");
            std::process::exit(2);
        }
    };

    let default_level = if options.verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();

    println!("=== Concourse Crowd Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let (config_results, config) = validate_configuration(&options);
    results.extend(config_results);

    // 2. Lounge layout
    results.extend(validate_layout(options.verbose));

    // 3. Steering scenarios
    results.extend(validate_steering(options.verbose));

    // 4. Liveness / stuck recovery
    results.extend(validate_liveness(options.verbose));

    // 5. Gait curves and heading
    results.extend(validate_gait(options.verbose));

    // 6. Full lounge soak
    if let Some(config) = config {
        results.extend(soak_lounge(config, options.ticks, options.verbose));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(options: &Options) -> (Vec<TestResult>, Option<CrowdConfig>) {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let parsed = match &options.config_path {
        Some(path) => std::fs::File::open(path)
            .map_err(|e| format!("{}: {}", path, e))
            .and_then(|f| CrowdConfig::from_json_reader(f).map_err(|e| e.to_string())),
        None => CrowdConfig::from_json_str(LOUNGE_JSON).map_err(|e| e.to_string()),
    };

    let mut config = match parsed {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: e,
            });
            return (results, None);
        }
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }

    results.push(TestResult {
        name: "config_parse".into(),
        passed: true,
        detail: format!(
            "{} agents, seed {:#x}",
            config.agent_count, config.seed
        ),
    });

    let errors = config.validate();
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "no problems".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    if errors.is_empty() {
        (results, Some(config))
    } else {
        (results, None)
    }
}

// ── 2. Lounge Layout ────────────────────────────────────────────────────

fn validate_layout(verbose: bool) -> Vec<TestResult> {
    println!("--- Lounge Layout ---");
    let mut results = Vec::new();

    let furniture = layout::fixed_furniture();
    results.push(TestResult {
        name: "furniture_count".into(),
        passed: furniture.len() == 85,
        detail: format!("{} footprints (80 seats, 4 pillars, 1 desk)", furniture.len()),
    });

    let config = CrowdConfig::default();
    let sim = CrowdSimulation::new(config.clone());
    let (obstacle_errors, count) = match &sim {
        Ok(sim) => (config.validate_obstacles(sim.obstacles()), sim.obstacles().len()),
        Err(e) => {
            results.push(TestResult {
                name: "lounge_builds".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "lounge_in_world".into(),
        passed: obstacle_errors.is_empty(),
        detail: format!("{} obstacles, {} outside", count, obstacle_errors.len()),
    });

    if verbose {
        println!("  lounge: {} obstacles", count);
    }

    results
}

// ── 3. Steering ─────────────────────────────────────────────────────────

fn solo(config: CrowdConfig, obstacles: Vec<Obstacle>, agent: Agent) -> Result<CrowdSimulation, String> {
    CrowdSimulation::with_agents(config, obstacles, vec![agent]).map_err(|e| e.to_string())
}

fn validate_steering(verbose: bool) -> Vec<TestResult> {
    println!("--- Steering ---");
    let mut results = Vec::new();

    // Obstacle straight ahead; one unit per tick at dt = 1.
    let obstacle = Obstacle::square(5.0, 0.0, 2.0);
    let mut config = CrowdConfig::default();
    config.max_dt = 1.0;
    config.steering.cruise_speed = 1.0;
    // Gait thresholds at the default fractions of cruise speed.
    config.gait.motion_threshold = 0.125;
    config.gait.heading_min_speed = 0.625;
    config.liveness.stuck_duration = 1.0e9;

    match solo(
        config,
        vec![obstacle],
        Agent::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0, 1.0),
    ) {
        Ok(mut sim) => {
            let mut max_offset: f32 = 0.0;
            let mut cut_through = false;
            let mut arrived_at = None;
            for tick in 1..=300 {
                sim.tick(1.0);
                let Some(agent) = sim.agent(0) else { break };
                let p = agent.position;
                max_offset = max_offset.max(p.z.abs());
                cut_through |= (3.0..=7.0).contains(&p.x) && p.z.abs() < 2.6;
                if agent.is_waiting() {
                    arrived_at = Some(tick);
                    break;
                }
            }
            if verbose {
                println!("  detour: max |z| {:.2}, arrived {:?}", max_offset, arrived_at);
            }
            results.push(TestResult {
                name: "detour_arrives".into(),
                passed: arrived_at.is_some(),
                detail: format!("arrived at tick {:?}", arrived_at),
            });
            results.push(TestResult {
                name: "detour_goes_around".into(),
                passed: !cut_through && max_offset > 2.6,
                detail: format!("max |z| {:.2}, cut through: {}", max_offset, cut_through),
            });
        }
        Err(e) => results.push(TestResult {
            name: "detour_setup".into(),
            passed: false,
            detail: e,
        }),
    }

    // Open floor closure
    match solo(
        CrowdConfig::default(),
        vec![],
        Agent::new(Vec2::ZERO, Vec2::new(30.0, 40.0), 0.0, 1.0),
    ) {
        Ok(mut sim) => {
            let mut arrived_at = None;
            for tick in 1..=900 {
                sim.tick(DT);
                if sim.agent(0).is_some_and(|a| a.is_waiting()) {
                    arrived_at = Some(tick);
                    break;
                }
            }
            let wait = sim.agent(0).map_or(0.0, |a| a.wait_timer);
            results.push(TestResult {
                name: "open_floor_closure".into(),
                passed: arrived_at.is_some() && (2.0..6.0).contains(&wait),
                detail: format!("arrived at tick {:?}, waiting {:.2}s", arrived_at, wait),
            });
        }
        Err(e) => results.push(TestResult {
            name: "closure_setup".into(),
            passed: false,
            detail: e,
        }),
    }

    results
}

// ── 4. Liveness ─────────────────────────────────────────────────────────

fn validate_liveness(verbose: bool) -> Vec<TestResult> {
    println!("--- Liveness ---");
    let mut results = Vec::new();

    // Four walls whose repulsions cancel at the centre.
    let pen = vec![
        Obstacle::new(3.0, 0.0, 0.5, 4.0),
        Obstacle::new(-3.0, 0.0, 0.5, 4.0),
        Obstacle::new(0.0, 3.0, 4.0, 0.5),
        Obstacle::new(0.0, -3.0, 4.0, 0.5),
    ];
    let target = Vec2::new(20.0, 0.0);

    match solo(CrowdConfig::default(), pen, Agent::new(Vec2::ZERO, target, 0.0, 1.0)) {
        Ok(mut sim) => {
            let mut recovered_at = None;
            for tick in 1..=600 {
                sim.tick(DT);
                if recovered_at.is_none() && sim.stats().recoveries > 0 {
                    recovered_at = Some(tick);
                }
            }
            let stats = *sim.stats();
            if verbose {
                println!("  pen: first recovery at {:?}, {:?}", recovered_at, stats);
            }
            results.push(TestResult {
                name: "pen_recovers".into(),
                passed: recovered_at.is_some_and(|t| t > 30),
                detail: format!("first recovery at tick {:?}", recovered_at),
            });
            results.push(TestResult {
                name: "pen_never_arrives".into(),
                passed: stats.arrivals == 0 && sim.agent(0).is_some_and(|a| a.target == target),
                detail: format!("{} recoveries, {} arrivals", stats.recoveries, stats.arrivals),
            });
        }
        Err(e) => results.push(TestResult {
            name: "pen_setup".into(),
            passed: false,
            detail: e,
        }),
    }

    results
}

// ── 5. Gait ─────────────────────────────────────────────────────────────

fn validate_gait(_verbose: bool) -> Vec<TestResult> {
    println!("--- Gait ---");
    let mut results = Vec::new();
    let params = GaitParams::default();

    let samples = 1000;
    let min_bob = (0..samples)
        .map(|i| gait::bob(i as f32 / samples as f32 * std::f32::consts::TAU, params.bob_height))
        .fold(f32::INFINITY, f32::min);
    results.push(TestResult {
        name: "bob_non_negative".into(),
        passed: min_bob >= 0.0,
        detail: format!("min bob {:.5}", min_bob),
    });

    // Walk the heading from 3.0 toward −3.0; every step must go the short way.
    let mut heading = 3.0_f32;
    let mut worst_step: f32 = 0.0;
    for _ in 0..200 {
        let next = gait::blend_heading(heading, -3.0, params.heading_smoothing);
        worst_step = worst_step.max(wrap_angle(next - heading).abs());
        heading = next;
    }
    results.push(TestResult {
        name: "heading_short_way".into(),
        passed: worst_step < 0.05 && (heading + 3.0).abs() < 0.01,
        detail: format!("largest step {:.4}, settled at {:.4}", worst_step, heading),
    });

    results
}

// ── 6. Lounge Soak ──────────────────────────────────────────────────────

fn soak_lounge(config: CrowdConfig, ticks: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Lounge Soak ({} ticks) ---", ticks);
    let mut results = Vec::new();

    let mut sim = match CrowdSimulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            results.push(TestResult {
                name: "soak_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let world = sim.config().world_bounds();
    let radius = sim.config().collision.radius;
    log::info!(
        "soaking {} agents among {} obstacles",
        sim.agent_count(),
        sim.obstacles().len()
    );

    let mut escapes = 0u64;
    let mut penetrations = 0u64;
    let mut non_finite = 0u64;
    let mut deepest: f32 = 0.0;

    let started = std::time::Instant::now();
    for tick in 0..ticks {
        sim.tick(DT);
        for agent in sim.agents() {
            if !agent.position.is_finite() || !agent.velocity.is_finite() {
                non_finite += 1;
                continue;
            }
            if !world.contains(agent.position) {
                escapes += 1;
            }
            for obstacle in sim.obstacles() {
                if let Some(pen) = penetration(agent.position, obstacle, radius) {
                    let depth = pen.x.min(pen.z);
                    if depth > 1e-3 {
                        penetrations += 1;
                        deepest = deepest.max(depth);
                    }
                }
            }
        }
        if verbose && tick > 0 && tick % 600 == 0 {
            println!("  t={:>6.1}s {:?}", sim.sim_time(), sim.stats());
        }
    }
    let elapsed = started.elapsed();

    results.push(TestResult {
        name: "soak_in_world".into(),
        passed: escapes == 0,
        detail: format!("{} out-of-world samples", escapes),
    });
    results.push(TestResult {
        name: "soak_no_penetration".into(),
        passed: penetrations == 0,
        detail: format!("{} penetrations, deepest {:.4}", penetrations, deepest),
    });
    results.push(TestResult {
        name: "soak_finite".into(),
        passed: non_finite == 0,
        detail: format!("{} non-finite samples", non_finite),
    });

    let stats = *sim.stats();
    results.push(TestResult {
        name: "soak_crowd_moves".into(),
        passed: ticks < 600 || stats.arrivals > 0,
        detail: serde_json::to_string(&stats).unwrap_or_else(|e| e.to_string()),
    });

    if verbose {
        println!(
            "  {} agents × {} ticks in {:.2?} ({:.1} µs/tick)",
            sim.agent_count(),
            ticks,
            elapsed,
            elapsed.as_secs_f64() * 1e6 / ticks.max(1) as f64
        );
    }

    results
}
