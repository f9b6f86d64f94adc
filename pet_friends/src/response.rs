//! What every client call returns: the HTTP status plus the body, decoded as
//! JSON when possible and kept as text otherwise.

use crate::error::Error;
use log::*;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Status and body of one call to the service.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: Body<T>,
}

/// A response body: the expected JSON type when it decodes, otherwise the
/// raw text (the service answers most failures with an HTML page).
#[derive(Debug, PartialEq)]
pub enum Body<T> {
    Json(T),
    Text(String),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Option<&T> {
        match &self.body {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<T> {
        match self.body {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Json(_) => None,
            Body::Text(text) => Some(text),
        }
    }

    /// True when the body is text containing `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.text().is_some_and(|text| text.contains(needle))
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub(crate) async fn decode(response: reqwest::Response) -> Result<Self, Error> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("PetFriends answered {status}: {} bytes", text.len());
        }

        let body = match serde_json::from_str::<T>(&text) {
            Ok(value) => Body::Json(value),
            Err(err) => {
                debug!("Keeping response body as text: {err}");
                Body::Text(text)
            }
        };

        Ok(Self { status, body })
    }
}
