//! Behavior system - walking/waiting state machine and stuck recovery

use rand::Rng;

use concourse_logic::liveness::Progress;
use concourse_logic::obstacles::ObstacleField;
use concourse_logic::steering::{steer, SteeringOutcome};

use crate::agent::{Agent, AgentState};
use crate::config::CrowdConfig;
use crate::engine::CrowdStats;
use crate::population::pick_target;

/// Uniform in `[min, max)`; a degenerate range yields `min`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

/// Steer a walking agent, or count down a waiting one.
pub fn behavior_step<R: Rng + ?Sized>(
    agent: &mut Agent,
    dt: f32,
    field: &ObstacleField,
    config: &CrowdConfig,
    stats: &mut CrowdStats,
    rng: &mut R,
) {
    match agent.state {
        AgentState::Walking => {
            match steer(agent.position, agent.velocity, agent.target, field, &config.steering) {
                SteeringOutcome::Arrived => {
                    let b = &config.behavior;
                    let wait = uniform(rng, b.arrival_wait_min, b.arrival_wait_max);
                    agent.begin_waiting(wait);
                    stats.arrivals += 1;
                    log::debug!(
                        "agent arrived at ({:.1}, {:.1}), waiting {:.2}s",
                        agent.position.x,
                        agent.position.z,
                        wait
                    );
                }
                SteeringOutcome::Steer { velocity, speed } => {
                    agent.velocity = velocity;
                    agent.speed = speed;
                }
            }
        }
        AgentState::Waiting => {
            agent.wait_timer -= dt;
            agent.velocity *= config.behavior.waiting_damping;
            agent.speed = agent.velocity.length();

            if agent.wait_timer <= 0.0 {
                let target = pick_target(field, config, stats, rng);
                agent.begin_walking(target);
                stats.departures += 1;
                log::debug!("agent departing for ({:.1}, {:.1})", target.x, target.z);
            }
        }
    }
}

/// Feed the agent's new position to its liveness monitor; a stuck walker is
/// paused briefly with its target kept.
pub fn liveness_step<R: Rng + ?Sized>(
    agent: &mut Agent,
    dt: f32,
    config: &CrowdConfig,
    stats: &mut CrowdStats,
    rng: &mut R,
) {
    match agent.state {
        AgentState::Walking => {
            if agent.liveness.observe_walking(agent.position, dt, &config.liveness) == Progress::Stuck {
                let b = &config.behavior;
                let wait = uniform(rng, b.recovery_wait_min, b.recovery_wait_max);
                agent.begin_waiting(wait);
                stats.recoveries += 1;
                log::debug!(
                    "agent stuck at ({:.1}, {:.1}), pausing {:.2}s",
                    agent.position.x,
                    agent.position.z,
                    wait
                );
            }
        }
        AgentState::Waiting => agent.liveness.observe_waiting(agent.position),
    }
}
