//! Pure crowd simulation logic for Concourse.
//!
//! This crate contains the per-agent math of the airport lounge crowd,
//! independent of any engine, renderer, or scheduler. Functions take plain
//! data and return results, making them unit-testable and reusable from the
//! engine crate, the headless harness, and the C bindings.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collision`] | Minimum-penetration push-out against inflated footprints |
//! | [`constants`] | Default tuning values (speeds, radii, timers, rig offsets) |
//! | [`gait`] | Walk-cycle phase, heading smoothing, procedural limb pose |
//! | [`geometry`] | Ground-plane vectors, world bounds, angle wrapping |
//! | [`layout`] | Airport lounge obstacle layout (seats, pillars, desk, luggage) |
//! | [`liveness`] | Stuck detection for agents that stop making progress |
//! | [`obstacles`] | Axis-aligned obstacle footprints and free-point sampling |
//! | [`steering`] | Target seeking blended with obstacle avoidance |

pub mod collision;
pub mod constants;
pub mod gait;
pub mod geometry;
pub mod layout;
pub mod liveness;
pub mod obstacles;
pub mod steering;
