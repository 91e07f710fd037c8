//! Motion system - integration, boundary wrap and obstacle push-out

use concourse_logic::collision::resolve_collisions;
use concourse_logic::obstacles::ObstacleField;

use crate::agent::Agent;
use crate::config::CrowdConfig;

/// Move the agent by `velocity × dt`, wrap it around the world edge, then
/// push it out of any obstacle. Returns the number of push-outs.
pub fn motion_step(agent: &mut Agent, dt: f32, field: &ObstacleField, config: &CrowdConfig) -> u32 {
    agent.position += agent.velocity * dt;
    agent.position = config.world_bounds().wrap(agent.position);
    resolve_collisions(&mut agent.position, &mut agent.velocity, field, &config.collision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concourse_logic::geometry::Vec2;
    use concourse_logic::obstacles::Obstacle;

    #[test]
    fn integrates_in_units_per_second() {
        let config = CrowdConfig::default();
        let mut agent = Agent::new(Vec2::ZERO, Vec2::new(50.0, 0.0), 0.0, 1.0);
        agent.velocity = Vec2::new(6.0, -3.0);
        let pushes = motion_step(&mut agent, 0.5, &ObstacleField::default(), &config);
        assert_eq!(pushes, 0);
        assert_eq!(agent.position, Vec2::new(3.0, -1.5));
    }

    #[test]
    fn wraps_at_world_edge() {
        let config = CrowdConfig::default();
        let mut agent = Agent::new(Vec2::new(179.9, -179.9), Vec2::ZERO, 0.0, 1.0);
        agent.velocity = Vec2::new(1.0, -1.0);
        motion_step(&mut agent, 0.2, &ObstacleField::default(), &config);
        assert_eq!(agent.position, Vec2::new(-180.0, 180.0));
    }

    #[test]
    fn collides_after_moving() {
        let config = CrowdConfig::default();
        let field = ObstacleField::new(vec![Obstacle::square(3.0, 0.0, 1.0)]);
        let mut agent = Agent::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.0, 1.0);
        agent.velocity = Vec2::new(5.0, 0.0);
        let pushes = motion_step(&mut agent, 0.1, &field, &config);
        assert!(pushes >= 1);
        assert!((agent.position.x - 1.4).abs() < 1e-5);
        assert_eq!(agent.velocity, Vec2::ZERO);
    }
}
