//! Simulation engine - main entry point for running the crowd

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use concourse_logic::gait::Pose;
use concourse_logic::layout;
use concourse_logic::obstacles::{Obstacle, ObstacleField};

use crate::agent::Agent;
use crate::config::{ConfigError, CrowdConfig, LayoutConfig};
use crate::population::spawn_agents;
use crate::systems::*;

/// Running totals since the simulation was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdStats {
    /// Walking → Waiting on reaching a target.
    pub arrivals: u64,
    /// Walking → Waiting forced by the liveness monitor.
    pub recoveries: u64,
    /// Waiting → Walking with a fresh target.
    pub departures: u64,
    /// Obstacle push-outs.
    pub collisions: u64,
    /// Placements that gave up and used the fallback point.
    pub sampler_fallbacks: u64,
}

/// The crowd: obstacle field, agents, seeded RNG and clock.
pub struct CrowdSimulation {
    config: CrowdConfig,
    obstacles: ObstacleField,
    agents: Vec<Agent>,
    rng: StdRng,
    /// Simulated seconds since start
    sim_time: f64,
    tick_count: u64,
    stats: CrowdStats,
}

impl CrowdSimulation {
    /// Build the configured layout and spawn the crowd.
    pub fn new(config: CrowdConfig) -> Result<Self, ConfigError> {
        first_error(config.validate())?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let obstacles = match &config.layout {
            LayoutConfig::Lounge { luggage_count } => layout::lounge(*luggage_count, &mut rng),
            LayoutConfig::Custom { obstacles } => obstacles.clone(),
        };
        Ok(Self::populate(config, obstacles, rng))
    }

    /// Spawn the crowd around `obstacles`, ignoring `config.layout`.
    pub fn with_obstacles(config: CrowdConfig, obstacles: Vec<Obstacle>) -> Result<Self, ConfigError> {
        first_error(config.validate())?;
        first_error(config.validate_obstacles(&obstacles))?;

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::populate(config, obstacles, rng))
    }

    /// Use a caller-built crowd instead of spawning one.
    pub fn with_agents(
        config: CrowdConfig,
        obstacles: Vec<Obstacle>,
        agents: Vec<Agent>,
    ) -> Result<Self, ConfigError> {
        first_error(config.validate())?;
        first_error(config.validate_obstacles(&obstacles))?;

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, ObstacleField::new(obstacles), agents, rng, CrowdStats::default()))
    }

    fn populate(config: CrowdConfig, obstacles: Vec<Obstacle>, mut rng: StdRng) -> Self {
        let obstacles = ObstacleField::new(obstacles);
        let mut stats = CrowdStats::default();
        let agents = spawn_agents(&obstacles, &config, &mut stats, &mut rng);
        Self::assemble(config, obstacles, agents, rng, stats)
    }

    fn assemble(
        config: CrowdConfig,
        obstacles: ObstacleField,
        agents: Vec<Agent>,
        rng: StdRng,
        stats: CrowdStats,
    ) -> Self {
        log::info!(
            "crowd ready: {} agents, {} obstacles, seed {:#x}",
            agents.len(),
            obstacles.len(),
            config.seed
        );
        Self {
            config,
            obstacles,
            agents,
            rng,
            sim_time: 0.0,
            tick_count: 0,
            stats,
        }
    }

    /// Advance every agent by `delta_seconds`.
    ///
    /// Non-finite or non-positive steps are ignored; long steps are clamped
    /// to `max_dt`.
    pub fn tick(&mut self, delta_seconds: f32) {
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }
        let dt = delta_seconds.min(self.config.max_dt);

        for agent in &mut self.agents {
            behavior_step(agent, dt, &self.obstacles, &self.config, &mut self.stats, &mut self.rng);
            let pushes = motion_step(agent, dt, &self.obstacles, &self.config);
            self.stats.collisions += u64::from(pushes);
            liveness_step(agent, dt, &self.config, &mut self.stats, &mut self.rng);
            animation_step(agent, dt, &self.config.gait);
        }

        self.sim_time += f64::from(dt);
        self.tick_count += 1;
    }

    /// Pose of agent `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn pose(&self, index: usize) -> Pose {
        match self.try_pose(index) {
            Some(pose) => pose,
            None => panic!(
                "agent index {} out of range ({} agents)",
                index,
                self.agents.len()
            ),
        }
    }

    pub fn try_pose(&self, index: usize) -> Option<Pose> {
        self.agents
            .get(index)
            .map(|agent| agent_pose(agent, &self.config.gait))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.obstacles.obstacles()
    }

    pub fn obstacle_field(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Simulated seconds since start.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn stats(&self) -> &CrowdStats {
        &self.stats
    }

    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }
}

fn first_error(errors: Vec<ConfigError>) -> Result<(), ConfigError> {
    match errors.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concourse_logic::geometry::Vec2;

    fn small() -> CrowdConfig {
        CrowdConfig {
            agent_count: 10,
            ..CrowdConfig::default()
        }
    }

    #[test]
    fn builds_the_lounge() {
        let sim = CrowdSimulation::new(small()).unwrap();
        assert_eq!(sim.agent_count(), 10);
        assert_eq!(sim.obstacles().len(), 85 + layout::LUGGAGE_COUNT);
        assert_eq!(sim.sim_time(), 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small();
        config.max_dt = -1.0;
        config.collision.damping = 2.0;
        let err = CrowdSimulation::new(config).err().unwrap();
        assert!(matches!(err, ConfigError::NotPositive { field: "max_dt", .. }));
    }

    #[test]
    fn bad_obstacles_rejected() {
        let result = CrowdSimulation::with_obstacles(small(), vec![Obstacle::square(500.0, 0.0, 1.0)]);
        assert_eq!(result.err(), Some(ConfigError::ObstacleOutsideWorld { index: 0 }));
    }

    #[test]
    fn ignores_bad_steps() {
        let mut sim = CrowdSimulation::new(small()).unwrap();
        let before = sim.agents().to_vec();
        sim.tick(0.0);
        sim.tick(-1.0);
        sim.tick(f32::NAN);
        sim.tick(f32::INFINITY);
        assert_eq!(sim.agents(), before.as_slice());
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn clamps_long_steps() {
        let mut sim = CrowdSimulation::new(small()).unwrap();
        sim.tick(5.0);
        assert!((sim.sim_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn pose_for_every_agent() {
        let mut sim = CrowdSimulation::new(small()).unwrap();
        sim.tick(1.0 / 60.0);
        for i in 0..sim.agent_count() {
            let pose = sim.pose(i);
            let agent = sim.agent(i).unwrap();
            assert_eq!(pose.torso.translation.x, agent.position.x);
            assert_eq!(pose.torso.scale, agent.scale);
        }
        assert!(sim.try_pose(sim.agent_count()).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn pose_out_of_range_panics() {
        let sim = CrowdSimulation::new(small()).unwrap();
        sim.pose(10);
    }

    #[test]
    fn explicit_agents_are_kept() {
        let agent = Agent::new(Vec2::new(1.0, 2.0), Vec2::new(30.0, 2.0), 0.0, 1.0);
        let sim = CrowdSimulation::with_agents(small(), vec![], vec![agent.clone()]).unwrap();
        assert_eq!(sim.agents(), &[agent]);
        assert!(sim.obstacles().is_empty());
    }
}
