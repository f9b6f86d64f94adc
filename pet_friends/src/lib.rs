//! # pet_friends
//!
//! Client for the PetFriends REST service:
//! - `auth`: credentials and the API key they are exchanged for
//! - `client`: the `PetFriends` wrapper, one method per endpoint
//! - `pet`: pet records, pet lists and the list filter
//! - `response`: status plus JSON-or-text body returned by every call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pet_friends::{Credentials, PetFilter, PetFriends};
//!
//! let client = PetFriends::new("https://petfriends.skillfactory.ru")?;
//! let key = client
//!     .get_api_key(&Credentials::new(email, password))
//!     .await?
//!     .into_json()
//!     .expect("valid credentials")
//!     .key;
//! let my_pets = client.get_list_of_pets(&key, PetFilter::MyPets).await?;
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod pet;
pub mod response;

// Re-export commonly used types
pub use auth::{ApiKey, AuthKey, Credentials};
pub use client::PetFriends;
pub use error::{Error, ErrorKind};
pub use pet::{parse_age, Pet, PetFilter, PetList};
pub use response::{ApiResponse, Body};
