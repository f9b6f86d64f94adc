//! Pure arithmetic over two operands.
//!
//! Only `division` can fail: a zero divisor is reported as
//! [`Error::DivisionByZero`] rather than producing an infinite or NaN result.

use log::*;

pub mod error;

pub use error::Error;

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divides `a` by `b`, rejecting a zero divisor.
pub fn division(a: f64, b: f64) -> Result<f64, Error> {
    if b == 0.0 {
        warn!("Refusing to divide {a} by zero");
        return Err(Error::DivisionByZero);
    }
    Ok(a / b)
}

pub fn subtraction(a: f64, b: f64) -> f64 {
    a - b
}

pub fn adding(a: f64, b: f64) -> f64 {
    a + b
}
