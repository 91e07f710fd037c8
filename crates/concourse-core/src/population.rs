//! Spawning the crowd and picking destinations.

use rand::Rng;
use std::f32::consts::TAU;

use concourse_logic::geometry::{Bounds, Vec2};
use concourse_logic::obstacles::ObstacleField;

use crate::agent::Agent;
use crate::config::CrowdConfig;
use crate::engine::CrowdStats;

/// Free point in `bounds`, or the configured fallback once `attempts` run out.
fn free_point<R: Rng + ?Sized>(
    field: &ObstacleField,
    bounds: &Bounds,
    attempts: u32,
    config: &CrowdConfig,
    stats: &mut CrowdStats,
    rng: &mut R,
) -> Vec2 {
    match field.try_sample_free_point(bounds, config.placement_clearance, attempts, rng) {
        Some(point) => point,
        None => {
            stats.sampler_fallbacks += 1;
            log::warn!(
                "no free point after {} attempts, using fallback ({}, {})",
                attempts,
                config.fallback_point.x,
                config.fallback_point.z
            );
            config.fallback_point
        }
    }
}

/// A fresh destination inside the target bounds.
pub fn pick_target<R: Rng + ?Sized>(
    field: &ObstacleField,
    config: &CrowdConfig,
    stats: &mut CrowdStats,
    rng: &mut R,
) -> Vec2 {
    free_point(field, &config.target_bounds(), config.target_attempts, config, stats, rng)
}

/// Place `config.agent_count` walking agents, each with a first target.
pub fn spawn_agents<R: Rng + ?Sized>(
    field: &ObstacleField,
    config: &CrowdConfig,
    stats: &mut CrowdStats,
    rng: &mut R,
) -> Vec<Agent> {
    let spawn = config.spawn_bounds();
    (0..config.agent_count)
        .map(|_| {
            let position = free_point(field, &spawn, config.spawn_attempts, config, stats, rng);
            let target = pick_target(field, config, stats, rng);
            let phase = rng.gen::<f32>() * TAU;
            let scale = config.scale_min + rng.gen::<f32>() * config.scale_jitter;
            Agent::new(position, target, phase, scale)
        })
        .collect()
}
