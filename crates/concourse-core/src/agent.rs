//! Per-agent state.

use serde::{Deserialize, Serialize};

use concourse_logic::gait::GaitInput;
use concourse_logic::geometry::Vec2;
use concourse_logic::liveness::LivenessMonitor;

/// Behavioral state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Heading for `target`.
    Walking,
    /// Standing still until `wait_timer` runs out.
    Waiting,
}

/// One member of the crowd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    /// World units per second.
    pub velocity: Vec2,
    /// `|velocity|` as of the last steering or damping step.
    pub speed: f32,
    /// Smoothed yaw in (−π, π]; 0 faces +Z.
    pub heading: f32,
    /// Constant gait offset in [0, 2π).
    pub phase: f32,
    /// Accumulated walk-cycle phase, starts at `phase`.
    pub walk_cycle: f32,
    /// Pose scale, fixed at spawn.
    pub scale: f32,
    pub state: AgentState,
    pub target: Vec2,
    /// Seconds left in `Waiting`.
    pub wait_timer: f32,
    pub liveness: LivenessMonitor,
}

impl Agent {
    /// A walking agent at rest, facing +Z.
    pub fn new(position: Vec2, target: Vec2, phase: f32, scale: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            speed: 0.0,
            heading: 0.0,
            phase,
            walk_cycle: phase,
            scale,
            state: AgentState::Walking,
            target,
            wait_timer: 0.0,
            liveness: LivenessMonitor::new(position),
        }
    }

    pub fn is_walking(&self) -> bool {
        self.state == AgentState::Walking
    }

    pub fn is_waiting(&self) -> bool {
        self.state == AgentState::Waiting
    }

    /// Stop in place and wait for `seconds`.
    pub fn begin_waiting(&mut self, seconds: f32) {
        self.state = AgentState::Waiting;
        self.wait_timer = seconds;
        self.velocity = Vec2::ZERO;
        self.speed = 0.0;
    }

    /// Set off toward a new target.
    pub fn begin_walking(&mut self, target: Vec2) {
        self.state = AgentState::Walking;
        self.target = target;
        self.wait_timer = 0.0;
    }

    pub fn gait_input(&self) -> GaitInput {
        GaitInput {
            position: self.position,
            walk_cycle: self.walk_cycle,
            heading: self.heading,
            scale: self.scale,
        }
    }
}
