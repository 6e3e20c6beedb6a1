use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

use approx::AbsDiffEq;

use super::EPSILON;
use crate::error::{GeometryError, Result};

/// An angle in radians, always kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Radians(f64);

impl Radians {
    /// Creates an angle, wrapping `value` into `[0, 2π)`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        let wrapped = value.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if wrapped >= TAU {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Creates an angle from degrees.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    /// Returns the normalized value in `[0, 2π)`.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the angle in degrees, in `[0, 360)`.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Divides the angle by `divider`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if `|divider| < EPSILON`.
    pub fn checked_div(self, divider: f64) -> Result<Self> {
        if divider.abs() < EPSILON {
            return Err(GeometryError::DivisionByZero {
                operation: "Radians::checked_div",
                divisor: divider,
            }
            .into());
        }
        Ok(Self::new(self.0 / divider))
    }

    /// Minimal angular distance to `other`, in `[0, π]`.
    #[must_use]
    pub fn difference(self, other: Self) -> f64 {
        let diff = (self.0 - other.0).abs();
        if diff > PI {
            TAU - diff
        } else {
            diff
        }
    }
}

impl From<f64> for Radians {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Radians> for f64 {
    fn from(angle: Radians) -> Self {
        angle.0
    }
}

impl Add for Radians {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Radians {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Mul<f64> for Radians {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.0 * rhs)
    }
}

impl PartialEq for Radians {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl AbsDiffEq for Radians {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.difference(*other) < epsilon
    }
}
