//! Crowd configuration, fixed when a simulation is created.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "seed": 7, "agent_count": 250, "steering": { "cruise_speed": 6.0 } }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use concourse_logic::collision::CollisionParams;
use concourse_logic::constants::{behavior, crowd};
use concourse_logic::gait::GaitParams;
use concourse_logic::geometry::{Bounds, Vec2};
use concourse_logic::layout::LUGGAGE_COUNT;
use concourse_logic::liveness::LivenessParams;
use concourse_logic::obstacles::Obstacle;
use concourse_logic::steering::SteeringParams;

/// Wait durations and idle damping for the behavior state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorParams {
    /// Seconds to wait after reaching a target, drawn from `[min, max)`.
    pub arrival_wait_min: f32,
    pub arrival_wait_max: f32,
    /// Seconds to pause after being reported stuck, drawn from `[min, max)`.
    pub recovery_wait_min: f32,
    pub recovery_wait_max: f32,
    /// Per-tick velocity multiplier while waiting.
    pub waiting_damping: f32,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            arrival_wait_min: behavior::ARRIVAL_WAIT_MIN,
            arrival_wait_max: behavior::ARRIVAL_WAIT_MAX,
            recovery_wait_min: behavior::RECOVERY_WAIT_MIN,
            recovery_wait_max: behavior::RECOVERY_WAIT_MAX,
            waiting_damping: behavior::WAITING_DAMPING,
        }
    }
}

/// Where the obstacle field comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// The airport lounge, with luggage scattered from the simulation seed.
    Lounge {
        #[serde(default = "default_luggage_count")]
        luggage_count: usize,
    },
    /// An explicit list of footprints.
    Custom { obstacles: Vec<Obstacle> },
}

fn default_luggage_count() -> usize {
    LUGGAGE_COUNT
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::Lounge {
            luggage_count: LUGGAGE_COUNT,
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    /// Seeds layout luggage, spawns, targets and wait times.
    pub seed: u64,
    pub agent_count: usize,
    /// Agents wrap around at ±this on both axes.
    pub world_half_extent: f32,
    /// Initial positions are drawn from ±this.
    pub spawn_half_extent: f32,
    /// Targets are drawn from ±this.
    pub target_half_extent: f32,
    pub spawn_attempts: u32,
    pub target_attempts: u32,
    /// Clearance kept from footprints when placing agents and targets.
    pub placement_clearance: f32,
    /// Used when sampling finds no free point.
    pub fallback_point: Vec2,
    /// Longest step a single tick integrates.
    pub max_dt: f32,
    /// Agent scale is drawn from `[scale_min, scale_min + scale_jitter)`.
    pub scale_min: f32,
    pub scale_jitter: f32,
    pub layout: LayoutConfig,
    pub steering: SteeringParams,
    pub behavior: BehaviorParams,
    pub collision: CollisionParams,
    pub liveness: LivenessParams,
    pub gait: GaitParams,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            seed: crowd::SEED,
            agent_count: crowd::AGENT_COUNT,
            world_half_extent: crowd::WORLD_HALF_EXTENT,
            spawn_half_extent: crowd::SPAWN_HALF_EXTENT,
            target_half_extent: crowd::TARGET_HALF_EXTENT,
            spawn_attempts: crowd::SPAWN_ATTEMPTS,
            target_attempts: crowd::TARGET_ATTEMPTS,
            placement_clearance: crowd::PLACEMENT_CLEARANCE,
            fallback_point: Vec2::ZERO,
            max_dt: crowd::MAX_DT,
            scale_min: crowd::SCALE_MIN,
            scale_jitter: crowd::SCALE_JITTER,
            layout: LayoutConfig::default(),
            steering: SteeringParams::default(),
            behavior: BehaviorParams::default(),
            collision: CollisionParams::default(),
            liveness: LivenessParams::default(),
            gait: GaitParams::default(),
        }
    }
}

impl CrowdConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// Parsing does not validate; see [`CrowdConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Like [`CrowdConfig::from_json_str`], reading from any reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn world_bounds(&self) -> Bounds {
        Bounds::centered(self.world_half_extent)
    }

    pub fn spawn_bounds(&self) -> Bounds {
        Bounds::centered(self.spawn_half_extent)
    }

    pub fn target_bounds(&self) -> Bounds {
        Bounds::centered(self.target_half_extent)
    }

    /// Check every parameter, returning all problems found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        positive(&mut errors, "world_half_extent", self.world_half_extent);
        positive(&mut errors, "spawn_half_extent", self.spawn_half_extent);
        positive(&mut errors, "target_half_extent", self.target_half_extent);
        positive(&mut errors, "max_dt", self.max_dt);
        positive(&mut errors, "scale_min", self.scale_min);
        non_negative(&mut errors, "scale_jitter", self.scale_jitter);
        non_negative(&mut errors, "placement_clearance", self.placement_clearance);

        if self.world_half_extent.is_finite() {
            within_world(&mut errors, "spawn_half_extent", self.spawn_half_extent, self.world_half_extent);
            within_world(&mut errors, "target_half_extent", self.target_half_extent, self.world_half_extent);
            if !self.fallback_point.is_finite() || !self.world_bounds().contains(self.fallback_point) {
                errors.push(ConfigError::FallbackOutsideWorld {
                    x: self.fallback_point.x,
                    z: self.fallback_point.z,
                });
            }
        }

        let s = &self.steering;
        positive(&mut errors, "steering.cruise_speed", s.cruise_speed);
        if !(s.overspeed_factor >= 1.0 && s.overspeed_factor.is_finite()) {
            errors.push(ConfigError::OutOfRange {
                field: "steering.overspeed_factor",
                value: s.overspeed_factor,
            });
        }
        non_negative(&mut errors, "steering.arrival_threshold", s.arrival_threshold);
        non_negative(&mut errors, "steering.lookahead_radius", s.lookahead_radius);
        non_negative(&mut errors, "steering.avoidance_weight", s.avoidance_weight);
        non_negative(&mut errors, "steering.sidestep_bias", s.sidestep_bias);
        if !(s.velocity_smoothing > 0.0 && s.velocity_smoothing <= 1.0) {
            errors.push(ConfigError::OutOfRange {
                field: "steering.velocity_smoothing",
                value: s.velocity_smoothing,
            });
        }

        let b = &self.behavior;
        wait_range(&mut errors, "behavior.arrival_wait", b.arrival_wait_min, b.arrival_wait_max);
        wait_range(&mut errors, "behavior.recovery_wait", b.recovery_wait_min, b.recovery_wait_max);
        unit_factor(&mut errors, "behavior.waiting_damping", b.waiting_damping);

        non_negative(&mut errors, "collision.radius", self.collision.radius);
        unit_factor(&mut errors, "collision.damping", self.collision.damping);

        positive(&mut errors, "liveness.progress_threshold", self.liveness.progress_threshold);
        positive(&mut errors, "liveness.stuck_duration", self.liveness.stuck_duration);

        let g = &self.gait;
        non_negative(&mut errors, "gait.cadence", g.cadence);
        non_negative(&mut errors, "gait.motion_threshold", g.motion_threshold);
        non_negative(&mut errors, "gait.heading_min_speed", g.heading_min_speed);
        unit_factor(&mut errors, "gait.heading_smoothing", g.heading_smoothing);

        // Thresholds a walker at cruise speed never crosses freeze the gait
        // and heading, or stall every walker into recovery.
        if s.cruise_speed > 0.0 && s.cruise_speed.is_finite() {
            reachable(&mut errors, "gait.motion_threshold", g.motion_threshold, s.cruise_speed);
            reachable(&mut errors, "gait.heading_min_speed", g.heading_min_speed, s.cruise_speed);
            let l = &self.liveness;
            if l.stuck_duration > 0.0 && l.stuck_duration.is_finite() {
                reachable(
                    &mut errors,
                    "liveness.progress_threshold",
                    l.progress_threshold,
                    s.cruise_speed * l.stuck_duration,
                );
            }
        }

        if let LayoutConfig::Custom { obstacles } = &self.layout {
            errors.extend(self.validate_obstacles(obstacles));
        }

        errors
    }

    /// Check that every footprint is well formed and, grown by the collision
    /// radius, lies inside the world.
    pub fn validate_obstacles(&self, obstacles: &[Obstacle]) -> Vec<ConfigError> {
        let world = self.world_bounds();
        let radius = self.collision.radius.max(0.0);
        let mut errors = Vec::new();

        for (index, obstacle) in obstacles.iter().enumerate() {
            let well_formed = obstacle.center().is_finite()
                && obstacle.half_width.is_finite()
                && obstacle.half_depth.is_finite()
                && obstacle.half_width >= 0.0
                && obstacle.half_depth >= 0.0;
            if !well_formed {
                errors.push(ConfigError::InvalidObstacle { index });
                continue;
            }

            let grown = obstacle.inflated_bounds(radius);
            let inside = world.contains(Vec2::new(grown.min_x, grown.min_z))
                && world.contains(Vec2::new(grown.max_x, grown.max_z));
            if !inside {
                errors.push(ConfigError::ObstacleOutsideWorld { index });
            }
        }

        errors
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &'static str, value: f32) {
    if !(value > 0.0 && value.is_finite()) {
        errors.push(ConfigError::NotPositive { field, value });
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: &'static str, value: f32) {
    if !(value >= 0.0 && value.is_finite()) {
        errors.push(ConfigError::Negative { field, value });
    }
}

fn unit_factor(errors: &mut Vec<ConfigError>, field: &'static str, value: f32) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::OutOfRange { field, value });
    }
}

fn wait_range(errors: &mut Vec<ConfigError>, field: &'static str, min: f32, max: f32) {
    if !(min >= 0.0 && max.is_finite()) {
        errors.push(ConfigError::Negative { field, value: min });
    } else if min > max {
        errors.push(ConfigError::InvertedRange { field, min, max });
    }
}

fn reachable(errors: &mut Vec<ConfigError>, field: &'static str, value: f32, limit: f32) {
    if value >= limit {
        errors.push(ConfigError::Unreachable { field, value, limit });
    }
}

fn within_world(errors: &mut Vec<ConfigError>, field: &'static str, extent: f32, world: f32) {
    if extent > world {
        errors.push(ConfigError::ExtentExceedsWorld {
            field,
            extent,
            world,
        });
    }
}

/// Configuration problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Must be finite and greater than zero.
    NotPositive { field: &'static str, value: f32 },
    /// Must be finite and not negative.
    Negative { field: &'static str, value: f32 },
    /// Outside the allowed interval for this parameter.
    OutOfRange { field: &'static str, value: f32 },
    /// Lower bound of a range above its upper bound.
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    /// Threshold a walker at cruise speed never gets past.
    Unreachable {
        field: &'static str,
        value: f32,
        limit: f32,
    },
    /// Sampling extent larger than the world.
    ExtentExceedsWorld {
        field: &'static str,
        extent: f32,
        world: f32,
    },
    /// Fallback placement point outside the world.
    FallbackOutsideWorld { x: f32, z: f32 },
    /// Obstacle with a non-finite centre or a negative half-extent.
    InvalidObstacle { index: usize },
    /// Obstacle, grown by the collision radius, crossing the world edge.
    ObstacleOutsideWorld { index: usize },
    /// Malformed configuration file.
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must not be negative, got {}", field, value)
            }
            ConfigError::OutOfRange { field, value } => {
                write!(f, "{} out of range: {}", field, value)
            }
            ConfigError::InvertedRange { field, min, max } => {
                write!(f, "{} range inverted: min {} > max {}", field, min, max)
            }
            ConfigError::Unreachable { field, value, limit } => write!(
                f,
                "{} ({}) is unreachable at cruise speed, must be below {}",
                field, value, limit
            ),
            ConfigError::ExtentExceedsWorld {
                field,
                extent,
                world,
            } => write!(
                f,
                "{} ({}) exceeds world half extent ({})",
                field, extent, world
            ),
            ConfigError::FallbackOutsideWorld { x, z } => {
                write!(f, "fallback point ({}, {}) is outside the world", x, z)
            }
            ConfigError::InvalidObstacle { index } => {
                write!(f, "obstacle {} is malformed", index)
            }
            ConfigError::ObstacleOutsideWorld { index } => {
                write!(f, "obstacle {} crosses the world edge", index)
            }
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CrowdConfig::default().validate().is_empty());
    }

    #[test]
    fn inverted_wait_range() {
        let mut config = CrowdConfig::default();
        config.behavior.arrival_wait_min = 8.0;
        let errors = config.validate();
        assert!(errors.contains(&ConfigError::InvertedRange {
            field: "behavior.arrival_wait",
            min: 8.0,
            max: 6.0,
        }));
    }

    #[test]
    fn non_finite_speed_rejected() {
        let mut config = CrowdConfig::default();
        config.steering.cruise_speed = f32::NAN;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ConfigError::NotPositive {
                field: "steering.cruise_speed",
                ..
            }
        ));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = CrowdConfig::default();
        config.max_dt = 0.0;
        config.spawn_half_extent = 500.0;
        config.collision.damping = 1.5;
        config.liveness.stuck_duration = -1.0;
        assert_eq!(config.validate().len(), 4);
    }

    #[test]
    fn slow_crowd_needs_lower_thresholds() {
        let mut config = CrowdConfig::default();
        config.steering.cruise_speed = 2.0;
        assert_eq!(
            config.validate(),
            vec![ConfigError::Unreachable {
                field: "gait.heading_min_speed",
                value: 3.0,
                limit: 2.0,
            }]
        );

        config.gait.heading_min_speed = 1.25;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn crawling_crowd_would_always_look_stuck() {
        let mut config = CrowdConfig::default();
        config.steering.cruise_speed = 0.5;
        config.gait.motion_threshold = 0.1;
        config.gait.heading_min_speed = 0.3;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ConfigError::Unreachable {
                field: "liveness.progress_threshold",
                ..
            }
        ));

        config.liveness.progress_threshold = 0.2;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn obstacle_crossing_world_edge() {
        let mut config = CrowdConfig::default();
        config.layout = LayoutConfig::Custom {
            obstacles: vec![
                Obstacle::square(0.0, 0.0, 5.0),
                Obstacle::square(179.0, 0.0, 2.0),
                Obstacle::new(0.0, 0.0, -1.0, 1.0),
            ],
        };
        assert_eq!(
            config.validate(),
            vec![
                ConfigError::ObstacleOutsideWorld { index: 1 },
                ConfigError::InvalidObstacle { index: 2 },
            ]
        );
    }

    #[test]
    fn fallback_must_be_in_world() {
        let mut config = CrowdConfig::default();
        config.fallback_point = Vec2::new(0.0, 400.0);
        assert_eq!(
            config.validate(),
            vec![ConfigError::FallbackOutsideWorld { x: 0.0, z: 400.0 }]
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CrowdConfig::from_json_str(
            r#"{ "seed": 7, "agent_count": 3, "steering": { "cruise_speed": 6.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.agent_count, 3);
        assert_eq!(config.steering.cruise_speed, 6.0);
        assert_eq!(config.steering.lookahead_radius, SteeringParams::default().lookahead_radius);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn custom_layout_from_json() {
        let config = CrowdConfig::from_json_str(
            r#"{ "layout": { "kind": "custom", "obstacles": [
                { "center_x": 5.0, "center_z": 0.0, "half_width": 2.0, "half_depth": 2.0 }
            ] } }"#,
        )
        .unwrap();
        assert_eq!(
            config.layout,
            LayoutConfig::Custom {
                obstacles: vec![Obstacle::square(5.0, 0.0, 2.0)]
            }
        );
    }

    #[test]
    fn lounge_without_luggage_count() {
        let config = CrowdConfig::from_json_str(r#"{ "layout": { "kind": "lounge" } }"#).unwrap();
        assert_eq!(
            config.layout,
            LayoutConfig::Lounge {
                luggage_count: LUGGAGE_COUNT
            }
        );
    }

    #[test]
    fn malformed_json() {
        let err = CrowdConfig::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("Config parse error"));
    }

    #[test]
    fn reader_matches_str() {
        let json = r#"{ "agent_count": 12 }"#;
        let a = CrowdConfig::from_json_reader(json.as_bytes()).unwrap();
        let b = CrowdConfig::from_json_str(json).unwrap();
        assert_eq!(a, b);
    }
}
