//! Systems - per-agent stages of the crowd tick
//!
//! Each tick runs, for every agent in index order:
//! behavior (steer or wait) → motion (integrate, wrap, collide) →
//! liveness (stuck recovery) → animation (heading, walk cycle).

mod animation;
mod behavior;
mod motion;

pub use animation::*;
pub use behavior::*;
pub use motion::*;
