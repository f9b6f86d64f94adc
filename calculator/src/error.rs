//! Error types for the `calculator` crate.
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The divisor of a `division` was zero.
    DivisionByZero,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DivisionByZero => write!(f, "Calculator error: division by zero"),
        }
    }
}

impl StdError for Error {}
