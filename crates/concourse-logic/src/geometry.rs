//! Ground-plane geometry shared by every stage of the crowd tick.
//!
//! The crowd lives on the X/Z plane (Y is up). Agents, targets and obstacle
//! centres are [`Vec2`]s; only the gait rig lifts values into [`Vec3`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Vectors shorter than this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// 2D vector on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.z * self.z
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.z * other.z
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn try_normalize(&self) -> Option<Self> {
        let len = self.length();
        if len > NORMALIZE_EPSILON && len.is_finite() {
            Some(Self::new(self.x / len, self.z / len))
        } else {
            None
        }
    }

    /// Unit vector in the same direction; a zero vector stays zero.
    pub fn normalize_or_zero(&self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// Quarter turn counter-clockwise in the (x, z) plane.
    pub fn perp(&self) -> Self {
        Self::new(-self.z, self.x)
    }

    /// Rescale to `max` if longer than `max`.
    pub fn clamp_length(&self, max: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max * max {
            *self * (max / len_sq.sqrt())
        } else {
            *self
        }
    }

    /// Yaw of this direction: 0 faces +Z, positive turns toward +X.
    pub fn yaw(&self) -> f32 {
        self.x.atan2(self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.z + other.z)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.z += other.z;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.z - other.z)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.z * scalar)
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.z *= scalar;
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.z)
    }
}

/// 3D point used for posed limbs (Y is up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Bounds {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Square centred on the origin.
    pub fn centered(half_extent: f32) -> Self {
        Self::new(-half_extent, half_extent, -half_extent, half_extent)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.z >= self.min_z
            && point.z <= self.max_z
    }

    /// Uniformly random point inside the bounds.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.min_x + rng.gen::<f32>() * self.width(),
            self.min_z + rng.gen::<f32>() * self.depth(),
        )
    }

    /// Re-enter on the opposite edge when a coordinate leaves the bounds.
    ///
    /// Each axis wraps at most once, so a point that overshoots an edge lands
    /// exactly on the opposite one.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        let x = if point.x > self.max_x {
            self.min_x
        } else if point.x < self.min_x {
            self.max_x
        } else {
            point.x
        };
        let z = if point.z > self.max_z {
            self.min_z
        } else if point.z < self.min_z {
            self.max_z
        } else {
            point.z
        };
        Vec2::new(x, z)
    }
}

/// Normalize an angle into (−π, π].
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle % TAU;
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        assert_eq!(a + b, Vec2::new(5.0, 8.0));
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert_eq!(a.dot(b), 16.0);
    }

    #[test]
    fn normalize_guards_zero() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
        assert!(Vec2::new(1e-9, 0.0).try_normalize().is_none());

        let n = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(n.is_finite());
    }

    #[test]
    fn clamp_length_only_shrinks() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.clamp_length(10.0), v);
        assert!((v.clamp_length(1.0).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn perp_is_orthogonal() {
        let v = Vec2::new(1.0, 0.0);
        assert_eq!(v.perp(), Vec2::new(0.0, 1.0));
        assert_eq!(v.dot(v.perp()), 0.0);
    }

    #[test]
    fn yaw_convention() {
        assert!((Vec2::new(0.0, 1.0).yaw()).abs() < 1e-6);
        assert!((Vec2::new(1.0, 0.0).yaw() - PI / 2.0).abs() < 1e-6);
        assert!((Vec2::new(0.0, -1.0).yaw().abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(PI / 2.0 + TAU) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0 - TAU) + PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        for i in -100..100 {
            let a = wrap_angle(i as f32 * 0.37);
            assert!(a > -PI && a <= PI, "{a}");
        }
    }

    #[test]
    fn bounds_wrap_re_enters_opposite_edge() {
        let b = Bounds::centered(10.0);
        assert_eq!(b.wrap(Vec2::new(10.5, 0.0)), Vec2::new(-10.0, 0.0));
        assert_eq!(b.wrap(Vec2::new(-10.5, 3.0)), Vec2::new(10.0, 3.0));
        assert_eq!(b.wrap(Vec2::new(2.0, 11.0)), Vec2::new(2.0, -10.0));
        assert_eq!(b.wrap(Vec2::new(2.0, -2.0)), Vec2::new(2.0, -2.0));
        assert!(b.contains(b.wrap(Vec2::new(55.0, -55.0))));
    }

    #[test]
    fn bounds_sample_stays_inside() {
        let b = Bounds::new(-5.0, 15.0, 2.0, 3.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert!(b.contains(b.sample(&mut rng)));
        }
    }
}
