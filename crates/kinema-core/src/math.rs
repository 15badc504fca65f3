//! Kinematic value types
//!
//! Small `Copy` vectors and rotations. Entities own their values outright;
//! nothing here is ever shared by reference between entities.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Overwrite this vector with another one's components
    #[inline]
    pub fn copy_from(&mut self, other: &Vec3) {
        *self = *other;
    }

    /// Linear interpolation.
    ///
    /// Weighted form, so `t == 1.0` lands exactly on `other`.
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        let s = 1.0 - t;
        Vec3 {
            x: self.x * s + other.x * t,
            y: self.y * s + other.y * t,
            z: self.z * s + other.z * t,
        }
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Distance to another position
    pub fn distance(&self, other: &Vec3) -> f32 {
        (*self - *other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Rotation (unit quaternion)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Rotation of `angle` radians about `axis`. A zero axis yields identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let len = axis.length();
        if len < 1e-6 {
            return Self::IDENTITY;
        }
        let (s, c) = (angle * 0.5).sin_cos();
        let k = s / len;
        Quat {
            x: axis.x * k,
            y: axis.y * k,
            z: axis.z * k,
            w: c,
        }
    }

    /// Rotation vector form: direction is the axis, length the angle
    pub fn from_scaled_axis(v: Vec3) -> Self {
        Self::from_axis_angle(v, v.length())
    }

    /// Overwrite this rotation with another one's components
    #[inline]
    pub fn copy_from(&mut self, other: &Quat) {
        *self = *other;
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Hamilton product `self * other`
    pub fn mul(&self, other: &Quat) -> Quat {
        Quat {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    pub fn normalize(&self) -> Quat {
        let len = self.dot(self).sqrt();
        if len < 0.0001 {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    /// Angle in radians of the shortest rotation taking `self` to `other`
    pub fn angle_to(&self, other: &Quat) -> f32 {
        let dot = self.dot(other).abs().min(1.0);
        2.0 * dot.acos()
    }

    /// Spherical linear interpolation along the shortest arc.
    ///
    /// `t <= 0` returns `self` and `t >= 1` returns `other` unchanged.
    pub fn slerp(&self, other: &Quat, t: f32) -> Quat {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }

        let mut dot = self.dot(other);
        let other = if dot < 0.0 {
            dot = -dot;
            Quat::new(-other.x, -other.y, -other.z, -other.w)
        } else {
            *other
        };

        if dot > 0.9995 {
            // Nearly parallel, nlerp is accurate enough
            let s = 1.0 - t;
            return Quat {
                x: self.x * s + other.x * t,
                y: self.y * s + other.y * t,
                z: self.z * s + other.z * t,
                w: self.w * s + other.w * t,
            }
            .normalize();
        }

        let theta_0 = dot.acos();
        let sin_theta_0 = theta_0.sin();
        let s0 = ((1.0 - t) * theta_0).sin() / sin_theta_0;
        let s1 = (t * theta_0).sin() / sin_theta_0;

        Quat {
            x: self.x * s0 + other.x * s1,
            y: self.y * s0 + other.y * s1,
            z: self.z * s0 + other.z * s1,
            w: self.w * s0 + other.w * s1,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}, {:.3}]",
            self.x, self.y, self.z, self.w
        )
    }
}
