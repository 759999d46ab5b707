/// 2D point / displacement value type.
///
/// Every operation returns a fresh `Vector`; nothing mutates in place.

use std::fmt;
use std::ops::{Add, Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a vector, rejecting NaN and infinite components.
    pub fn checked(x: f64, y: f64, what: &'static str) -> Result<Self> {
        Self::new(x, y).validate(what)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `self` if usable as a coordinate, `TypeInvalid` otherwise.
    pub fn validate(self, what: &'static str) -> Result<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(GameError::TypeInvalid { what })
        }
    }

    /// Component-wise sum.
    pub fn plus(&self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise scale.  Zero and negative factors are fine.
    pub fn times(&self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::new(x, y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        self.plus(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.times(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.times(-1.0)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
