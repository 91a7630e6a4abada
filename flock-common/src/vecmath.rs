use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A 2D vector used for agent positions, velocities and steering deltas.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a normalized version of the vector (unit vector).
    /// Returns a zero vector if the original vector's length is zero.
    pub fn normalize_or_zero(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-12 {
            let inv_len = 1.0 / len_sq.sqrt();
            Vec2 { x: self.x * inv_len, y: self.y * inv_len }
        } else {
            Vec2::zero()
        }
    }

    /// Calculates the squared distance to another vector (point).
    pub fn distance_squared(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point. Plain `sqrt`, no approximations.
    pub fn distance(&self, other: Vec2) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f32) -> Self {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_tuple(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        // Callers guard against zero divisors (neighbor counts are >= 1 when dividing).
        Self { x: self.x / scalar, y: self.y / scalar }
    }
}

/// Converts a vector to an angle (in radians).
/// Uses atan2 for quadrant correctness.
pub fn vec_to_angle(vec: Vec2) -> f32 {
    vec.y.atan2(vec.x)
}
