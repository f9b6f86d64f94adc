//! Pet records as the service returns them.

use crate::error::{input_error, Error, InputErrorKind};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A pet owned by some user. Every field is assigned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pet {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub animal_type: String,
    /// Sent as a form field, echoed back as either a string or a number.
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    /// Data URL of the photo, empty when the pet has none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pet_photo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
}

/// Body of `GET api/pets`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn first(&self) -> Option<&Pet> {
        self.pets.first()
    }

    pub fn find(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == pet_id)
    }

    pub fn contains(&self, pet_id: &str) -> bool {
        self.find(pet_id).is_some()
    }
}

/// Which pets `get_list_of_pets` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetFilter {
    /// Every user's pets.
    #[default]
    All,
    /// Only the pets of the account that owns the key.
    MyPets,
}

impl PetFilter {
    /// The value sent in the `filter` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
        }
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that `age` is a positive whole number before it is sent.
///
/// The service accepts any text in the `age` field, so this is the only place
/// values such as `"five"` or `"-1"` get caught.
pub fn parse_age(age: &str) -> Result<u32, Error> {
    match age.trim().parse::<u32>() {
        Ok(0) => Err(input_error(
            InputErrorKind::InvalidAge,
            "age must be greater than zero",
        )),
        Ok(years) => Ok(years),
        Err(_) => Err(input_error(
            InputErrorKind::InvalidAge,
            &format!("age must be a positive whole number, got {age:?}"),
        )),
    }
}

/// Users can clear a pet's fields, and the service then stores `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
