//! Numeric backends the expression tree can be evaluated over.
//!
//! The tree only needs to add, subtract, multiply and divide values, and to
//! apply a fixed set of transcendental functions to them. Scalar backends
//! forward to `libm`; [`Batch`](struct.Batch.html) applies the same functions
//! elementwise.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Value type of an expression tree
pub trait Numeric:
    Clone
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Resolve the text of a number token, `None` if it is not a valid
    /// literal for this type.
    fn from_literal(text: &str) -> Option<Self>;

    /// Sine, in radians
    fn sin(self) -> Self;
    /// Cosine, in radians
    fn cos(self) -> Self;
    /// Tangent, in radians
    fn tan(self) -> Self;
    /// Hyperbolic sine
    fn sinh(self) -> Self;
    /// Hyperbolic cosine
    fn cosh(self) -> Self;
    /// Hyperbolic tangent
    fn tanh(self) -> Self;
    /// Arcsine
    fn asin(self) -> Self;
    /// Arccosine
    fn acos(self) -> Self;
    /// Arctangent
    fn atan(self) -> Self;
    /// Inverse hyperbolic sine
    fn asinh(self) -> Self;
    /// Inverse hyperbolic cosine
    fn acosh(self) -> Self;
    /// Inverse hyperbolic tangent
    fn atanh(self) -> Self;
    /// `e` raised to the power of `self`
    fn exp(self) -> Self;
    /// Natural logarithm
    fn log(self) -> Self;
    /// Base 10 logarithm
    fn log10(self) -> Self;
    /// Four quadrant arctangent of `self / other`
    fn atan2(self, other: Self) -> Self;
    /// `self` raised to the power of `exponent`
    fn pow(self, exponent: Self) -> Self;
}

macro_rules! scalar_numeric {
    ($float:ty, $sin:path, $cos:path, $tan:path, $sinh:path, $cosh:path, $tanh:path,
     $asin:path, $acos:path, $atan:path, $asinh:path, $acosh:path, $atanh:path,
     $exp:path, $log:path, $log10:path, $atan2:path, $pow:path) => {
        impl Numeric for $float {
            fn from_literal(text: &str) -> Option<Self> {
                text.parse().ok()
            }

            fn sin(self) -> Self { $sin(self) }
            fn cos(self) -> Self { $cos(self) }
            fn tan(self) -> Self { $tan(self) }
            fn sinh(self) -> Self { $sinh(self) }
            fn cosh(self) -> Self { $cosh(self) }
            fn tanh(self) -> Self { $tanh(self) }
            fn asin(self) -> Self { $asin(self) }
            fn acos(self) -> Self { $acos(self) }
            fn atan(self) -> Self { $atan(self) }
            fn asinh(self) -> Self { $asinh(self) }
            fn acosh(self) -> Self { $acosh(self) }
            fn atanh(self) -> Self { $atanh(self) }
            fn exp(self) -> Self { $exp(self) }
            fn log(self) -> Self { $log(self) }
            fn log10(self) -> Self { $log10(self) }
            fn atan2(self, other: Self) -> Self { $atan2(self, other) }
            fn pow(self, exponent: Self) -> Self { $pow(self, exponent) }
        }
    };
}

scalar_numeric!(
    f64,
    libm::sin, libm::cos, libm::tan, libm::sinh, libm::cosh, libm::tanh,
    libm::asin, libm::acos, libm::atan, libm::asinh, libm::acosh, libm::atanh,
    libm::exp, libm::log, libm::log10, libm::atan2, libm::pow
);

scalar_numeric!(
    f32,
    libm::sinf, libm::cosf, libm::tanf, libm::sinhf, libm::coshf, libm::tanhf,
    libm::asinf, libm::acosf, libm::atanf, libm::asinhf, libm::acoshf, libm::atanhf,
    libm::expf, libm::logf, libm::log10f, libm::atan2f, libm::powf
);

/// A batch of `f64` values, operated on elementwise.
///
/// Binary operations broadcast a batch of length one against the other
/// operand, so that number literals combine with batches of any length. When
/// both lengths differ and neither is one, the shorter batch is padded with
/// `NaN`.
///
/// ```
/// use yardstick::{Batch, Numeric};
///
/// let x = Batch::from(vec![1.0, 2.0, 3.0]);
/// let two = Batch::from_literal("2").unwrap();
/// assert_eq!((x * two).values(), &[2.0, 4.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    values: Vec<f64>,
}

impl Batch {
    /// A batch holding `values`
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// A batch holding a single value
    pub fn scalar(value: f64) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// The values of this batch
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the batch, returning its values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Number of values in this batch
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this batch holds no value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn map(mut self, function: fn(f64) -> f64) -> Self {
        for value in &mut self.values {
            *value = function(*value);
        }
        self
    }

    fn zip(self, other: Self, function: fn(f64, f64) -> f64) -> Self {
        let values = match (self.values.len(), other.values.len()) {
            (1, _) => {
                let left = self.values[0];
                other.values.into_iter().map(|right| function(left, right)).collect()
            }
            (_, 1) => {
                let right = other.values[0];
                self.values.into_iter().map(|left| function(left, right)).collect()
            }
            (left_len, right_len) => {
                let len = left_len.max(right_len);
                (0..len)
                    .map(|i| {
                        let left = self.values.get(i).copied().unwrap_or(f64::NAN);
                        let right = other.values.get(i).copied().unwrap_or(f64::NAN);
                        function(left, right)
                    })
                    .collect()
            }
        };
        Self { values }
    }
}

impl From<Vec<f64>> for Batch {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<f64> for Batch {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl Add for Batch {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for Batch {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Batch {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Div for Batch {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl Neg for Batch {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

impl Numeric for Batch {
    fn from_literal(text: &str) -> Option<Self> {
        f64::from_literal(text).map(Self::scalar)
    }

    fn sin(self) -> Self {
        self.map(libm::sin)
    }

    fn cos(self) -> Self {
        self.map(libm::cos)
    }

    fn tan(self) -> Self {
        self.map(libm::tan)
    }

    fn sinh(self) -> Self {
        self.map(libm::sinh)
    }

    fn cosh(self) -> Self {
        self.map(libm::cosh)
    }

    fn tanh(self) -> Self {
        self.map(libm::tanh)
    }

    fn asin(self) -> Self {
        self.map(libm::asin)
    }

    fn acos(self) -> Self {
        self.map(libm::acos)
    }

    fn atan(self) -> Self {
        self.map(libm::atan)
    }

    fn asinh(self) -> Self {
        self.map(libm::asinh)
    }

    fn acosh(self) -> Self {
        self.map(libm::acosh)
    }

    fn atanh(self) -> Self {
        self.map(libm::atanh)
    }

    fn exp(self) -> Self {
        self.map(libm::exp)
    }

    fn log(self) -> Self {
        self.map(libm::log)
    }

    fn log10(self) -> Self {
        self.map(libm::log10)
    }

    fn atan2(self, other: Self) -> Self {
        self.zip(other, libm::atan2)
    }

    fn pow(self, exponent: Self) -> Self {
        self.zip(exponent, libm::pow)
    }
}
