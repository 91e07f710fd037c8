//! Concourse Core - Airport Lounge Crowd Simulation Engine
//!
//! A population of autonomous agents wanders an airport lounge: each agent
//! walks to a random free spot, waits there a few seconds, then picks another.
//! Agents steer around seats, pillars, the gate desk and luggage, are pushed
//! out of anything they clip, and are nudged into a short pause whenever they
//! stop making progress.
//!
//! # Architecture
//!
//! - **Agents**: plain structs in a `Vec`, owned by [`engine::CrowdSimulation`]
//! - **Obstacle field**: immutable footprints shared read-only by every stage
//! - **Systems**: per-agent stages run in order each tick (behavior, motion,
//!   liveness, animation)
//!
//! The per-agent math lives in `concourse-logic`; this crate owns state,
//! configuration, randomness and scheduling.
//!
//! # Example
//!
//! ```rust,no_run
//! use concourse_core::prelude::*;
//!
//! let mut sim = CrowdSimulation::new(CrowdConfig::default()).unwrap();
//!
//! loop {
//!     sim.tick(1.0 / 60.0); // 60 FPS
//!     let _torso = sim.pose(0).torso;
//! }
//! ```

pub mod agent;
pub mod config;
pub mod engine;
pub mod population;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::agent::{Agent, AgentState};
    pub use crate::config::{BehaviorParams, ConfigError, CrowdConfig, LayoutConfig};
    pub use crate::engine::{CrowdSimulation, CrowdStats};
    pub use concourse_logic::gait::{Pose, Transform};
    pub use concourse_logic::geometry::{Bounds, Vec2, Vec3};
    pub use concourse_logic::obstacles::{Obstacle, ObstacleField};
}
