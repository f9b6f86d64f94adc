//! Error types for the `pet_friends` crate.
//!
//! A status code returned by the service is never an error here; callers get
//! it back in an `ApiResponse` and decide. An `Error` means the request could
//! not be built or delivered, or its input could not be prepared.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Top-level error type for the PetFriends client.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in the client.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Http(HttpErrorKind),
    Photo(PhotoErrorKind),
    Input(InputErrorKind),
}

/// Errors from sending a request or reading its response.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
}

/// Errors from preparing a photo for upload.
#[derive(Debug, PartialEq)]
pub enum PhotoErrorKind {
    NotFound,
    Unreadable,
}

/// Errors from checking pet field values before they are sent.
#[derive(Debug, PartialEq)]
pub enum InputErrorKind {
    InvalidAge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
            ErrorKind::Photo(kind) => write!(f, "Photo error: {:?}", kind),
            ErrorKind::Input(kind) => write!(f, "Input error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let error_kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::Photo(PhotoErrorKind::NotFound),
            _ => ErrorKind::Photo(PhotoErrorKind::Unreadable),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create input errors.
pub fn input_error(kind: InputErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Input(kind),
    }
}
