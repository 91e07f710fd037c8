//! Airport lounge obstacle layout.
//!
//! Two seating blocks, four structural pillars, the gate desk, and a scatter
//! of luggage near the seats. Luggage positions come from the caller's RNG so
//! a seeded simulation always builds the same lounge.

use rand::Rng;

use crate::obstacles::Obstacle;

/// Default number of luggage piles.
pub const LUGGAGE_COUNT: usize = 50;

const SEAT_ROWS: usize = 5;
const SEATS_PER_ROW: usize = 8;
const SEAT_PITCH_X: f32 = 3.0;
const SEAT_PITCH_Z: f32 = 8.0;
const SEAT_HALF_EXTENT: f32 = 2.5;

/// Front-left seat of each block.
const SEAT_BLOCKS: [(f32, f32); 2] = [(-60.0, -30.0), (20.0, -30.0)];

const PILLARS: [(f32, f32); 4] = [(-40.0, -40.0), (40.0, -40.0), (-40.0, 40.0), (40.0, 40.0)];
const PILLAR_HALF_EXTENT: f32 = 5.0;

const DESK_CENTER: (f32, f32) = (0.0, 60.0);
const DESK_HALF_WIDTH: f32 = 16.0;
const DESK_HALF_DEPTH: f32 = 5.0;

/// Luggage patches sit left or right of the aisle, level with the seats.
const LUGGAGE_ZONE_X: f32 = 40.0;
const LUGGAGE_ZONE_Z: f32 = -30.0;
const LUGGAGE_SPREAD_X: f32 = 30.0;
const LUGGAGE_SPREAD_Z: f32 = 20.0;
const LUGGAGE_HALF_EXTENT: f32 = 1.0;

/// Fixed lounge furniture (everything except luggage).
pub fn fixed_furniture() -> Vec<Obstacle> {
    let mut obstacles = Vec::with_capacity(SEAT_BLOCKS.len() * SEAT_ROWS * SEATS_PER_ROW + 5);

    for &(start_x, start_z) in &SEAT_BLOCKS {
        for row in 0..SEAT_ROWS {
            for seat in 0..SEATS_PER_ROW {
                obstacles.push(Obstacle::square(
                    start_x + seat as f32 * SEAT_PITCH_X,
                    start_z + row as f32 * SEAT_PITCH_Z,
                    SEAT_HALF_EXTENT,
                ));
            }
        }
    }

    for &(x, z) in &PILLARS {
        obstacles.push(Obstacle::square(x, z, PILLAR_HALF_EXTENT));
    }

    obstacles.push(Obstacle::new(
        DESK_CENTER.0,
        DESK_CENTER.1,
        DESK_HALF_WIDTH,
        DESK_HALF_DEPTH,
    ));

    obstacles
}

/// Scatter `count` luggage footprints around the seating blocks.
pub fn luggage<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Obstacle> {
    (0..count)
        .map(|_| {
            let zone = if rng.gen::<f32>() > 0.5 {
                -LUGGAGE_ZONE_X
            } else {
                LUGGAGE_ZONE_X
            };
            let x = zone + (rng.gen::<f32>() - 0.5) * LUGGAGE_SPREAD_X;
            let z = LUGGAGE_ZONE_Z + (rng.gen::<f32>() - 0.5) * LUGGAGE_SPREAD_Z;
            Obstacle::square(x, z, LUGGAGE_HALF_EXTENT)
        })
        .collect()
}

/// Full lounge: furniture followed by `luggage_count` luggage piles.
pub fn lounge<R: Rng + ?Sized>(luggage_count: usize, rng: &mut R) -> Vec<Obstacle> {
    let mut obstacles = fixed_furniture();
    obstacles.extend(luggage(luggage_count, rng));
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bounds, Vec2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn furniture_counts() {
        let furniture = fixed_furniture();
        // 2 blocks × 40 seats + 4 pillars + 1 desk
        assert_eq!(furniture.len(), 85);
        assert_eq!(
            furniture.iter().filter(|o| o.half_width == PILLAR_HALF_EXTENT).count(),
            4
        );
    }

    #[test]
    fn luggage_stays_in_its_patches() {
        let mut rng = StdRng::seed_from_u64(11);
        for bag in luggage(500, &mut rng) {
            assert!(bag.center_x.abs() >= LUGGAGE_ZONE_X - LUGGAGE_SPREAD_X / 2.0);
            assert!(bag.center_x.abs() <= LUGGAGE_ZONE_X + LUGGAGE_SPREAD_X / 2.0);
            assert!((bag.center_z - LUGGAGE_ZONE_Z).abs() <= LUGGAGE_SPREAD_Z / 2.0);
        }
    }

    #[test]
    fn seeded_lounge_is_reproducible() {
        let a = lounge(LUGGAGE_COUNT, &mut StdRng::seed_from_u64(5));
        let b = lounge(LUGGAGE_COUNT, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert_eq!(a.len(), 85 + LUGGAGE_COUNT);
    }

    #[test]
    fn origin_is_walkable() {
        let field = crate::obstacles::ObstacleField::new(lounge(LUGGAGE_COUNT, &mut StdRng::seed_from_u64(9)));
        assert!(!field.is_inside(Vec2::ZERO, 0.8));
    }

    #[test]
    fn lounge_fits_default_world() {
        let world = Bounds::centered(crate::constants::crowd::WORLD_HALF_EXTENT);
        for o in fixed_furniture() {
            let b = o.inflated_bounds(crate::constants::collision::RADIUS);
            assert!(world.contains(Vec2::new(b.min_x, b.min_z)));
            assert!(world.contains(Vec2::new(b.max_x, b.max_z)));
        }
    }
}
