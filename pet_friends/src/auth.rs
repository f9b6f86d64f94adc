//! Account credentials and the API key exchanged for them.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;

/// Email and password of a PetFriends account. Neither value is validated;
/// the service decides whether they are acceptable.
pub struct Credentials {
    pub email: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token the service issues for valid credentials. Every call other than
/// `get_api_key` requires one, and the only way to obtain one is to decode a
/// successful `get_api_key` response.
#[derive(Deserialize)]
#[serde(transparent)]
pub struct AuthKey(SecretString);

impl AuthKey {
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey([REDACTED])")
    }
}

/// Body of a successful `GET api/key` response.
#[derive(Debug, Deserialize)]
pub struct ApiKey {
    pub key: AuthKey,
}
