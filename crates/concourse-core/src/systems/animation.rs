//! Animation system - heading smoothing and walk-cycle advance

use concourse_logic::gait::{advance_walk_cycle, compute_pose, smooth_heading, GaitParams, Pose};

use crate::agent::Agent;

pub fn animation_step(agent: &mut Agent, dt: f32, params: &GaitParams) {
    agent.heading = smooth_heading(agent.heading, agent.velocity, agent.speed, params);
    agent.walk_cycle = advance_walk_cycle(agent.walk_cycle, agent.speed, dt, params);
}

/// Rig for one agent as of its current state.
pub fn agent_pose(agent: &Agent, params: &GaitParams) -> Pose {
    compute_pose(&agent.gait_input(), params)
}
