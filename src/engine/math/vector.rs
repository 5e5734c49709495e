use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::MathError;

/// Behaviour shared by every fixed-size float vector, colours included.
///
/// Implementors only describe how to combine and inspect their components;
/// the arithmetic is written once here.
pub trait Vector:
    Copy
    + PartialEq
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn splat(value: f32) -> Self;

    /// Combines two vectors component by component.
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self;

    fn sum(self) -> f32;

    fn any(self, predicate: impl Fn(f32) -> bool) -> bool;

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        self.zip_with(self, |a, _| f(a))
    }

    fn dot(self, rhs: Self) -> f32 {
        self.zip_with(rhs, |a, b| a * b).sum()
    }

    fn length2(self) -> f32 {
        self.dot(self)
    }

    fn length(self) -> f32 {
        self.length2().sqrt()
    }

    /// Zero and unit-length vectors come back unchanged.
    fn normalise(self) -> Self {
        let length2 = self.length2();
        if length2 == 0.0 || length2 == 1.0 {
            return self;
        }
        let length = length2.sqrt();
        self.map(|c| c / length)
    }

    fn negate(self) -> Self {
        -self
    }

    fn reciprocal(self) -> Result<Self, MathError> {
        if self.any(|c| c == 0.0) {
            return Err(MathError::DivisionByZero(format!("1 / {self}")));
        }
        Ok(self.map(|c| 1.0 / c))
    }

    fn divide(self, divisor: Self) -> Result<Self, MathError> {
        if divisor.any(|c| c == 0.0) {
            return Err(MathError::DivisionByZero(format!("{self} / {divisor}")));
        }
        Ok(self.zip_with(divisor, |a, b| a / b))
    }

    fn divide_scalar(self, divisor: f32) -> Result<Self, MathError> {
        self.divide(Self::splat(divisor))
    }
}

/// Operator impls for a type that implements [`Vector`].
macro_rules! vector_ops {
    ($t:ident) => {
        impl std::ops::Add for $t {
            type Output = $t;
            #[inline]
            fn add(self, rhs: $t) -> $t {
                $crate::engine::math::Vector::zip_with(self, rhs, |a, b| a + b)
            }
        }

        impl std::ops::Sub for $t {
            type Output = $t;
            #[inline]
            fn sub(self, rhs: $t) -> $t {
                $crate::engine::math::Vector::zip_with(self, rhs, |a, b| a - b)
            }
        }

        impl std::ops::Mul<f32> for $t {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: f32) -> $t {
                $crate::engine::math::Vector::map(self, |c| c * rhs)
            }
        }

        impl std::ops::Mul for $t {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: $t) -> $t {
                $crate::engine::math::Vector::zip_with(self, rhs, |a, b| a * b)
            }
        }

        impl std::ops::Neg for $t {
            type Output = $t;
            #[inline]
            fn neg(self) -> $t {
                $crate::engine::math::Vector::map(self, |c| -c)
            }
        }

        impl std::ops::AddAssign for $t {
            #[inline]
            fn add_assign(&mut self, rhs: $t) {
                *self = *self + rhs;
            }
        }
    };
}

pub(crate) use vector_ops;
