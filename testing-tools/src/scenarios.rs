use anyhow::{bail, ensure, Context, Result};
use pet_friends::error::InputErrorKind;
use pet_friends::{
    parse_age, ApiResponse, AuthKey, Credentials, ErrorKind, Pet, PetFilter, PetFriends, PetList,
};
use reqwest::StatusCode;
use service::config::Config;
use std::time::Instant;

use crate::fixtures::{
    Fixtures, PetData, BLANK, LEBOWSKI, PERSIK, PERSIK_WITH_PHOTO, PUSIK, UNKNOWN_USER_MESSAGE,
};
use crate::output::{print_failure, print_ok, print_scenario_header, print_step, TestResult};

/// Every scenario the suite knows, in the order `Scenario::ALL` runs them.
/// Later scenarios rely on pets created by earlier ones.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Valid credentials yield an API key
    ApiKeyValidUser,
    /// Unknown credentials are refused with 403
    ApiKeyInvalidUser,
    /// A pet without photo can be created
    CreatePetSimple,
    /// A non-numeric age is rejected before sending
    CreatePetSimpleNonNumericAge,
    /// A negative age is rejected before sending
    CreatePetSimpleNegativeAge,
    /// The full pet list is not empty
    ListAllPets,
    /// The list of our own pets is not empty
    ListMyPets,
    /// A pet with a photo can be created
    AddNewPet,
    /// A text file is refused as a pet photo
    AddNewPetWrongFile,
    /// A deleted pet disappears from our list
    DeleteOwnPet,
    /// Our own pet can be renamed
    UpdateOwnPet,
    /// Someone else's pet cannot be updated
    UpdateForeignPet,
    /// Our own pet accepts empty field values
    UpdateOwnPetEmptyFields,
    /// A photo can be added to a pet
    SetPhoto,
    /// A pet's existing photo can be replaced
    ReplacePhoto,
}

impl Scenario {
    pub const ALL: [Scenario; 15] = [
        Scenario::ApiKeyValidUser,
        Scenario::ApiKeyInvalidUser,
        Scenario::CreatePetSimple,
        Scenario::CreatePetSimpleNonNumericAge,
        Scenario::CreatePetSimpleNegativeAge,
        Scenario::ListAllPets,
        Scenario::ListMyPets,
        Scenario::AddNewPet,
        Scenario::AddNewPetWrongFile,
        Scenario::DeleteOwnPet,
        Scenario::UpdateOwnPet,
        Scenario::UpdateForeignPet,
        Scenario::UpdateOwnPetEmptyFields,
        Scenario::SetPhoto,
        Scenario::ReplacePhoto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ApiKeyValidUser => "api-key-valid-user",
            Scenario::ApiKeyInvalidUser => "api-key-invalid-user",
            Scenario::CreatePetSimple => "create-pet-simple",
            Scenario::CreatePetSimpleNonNumericAge => "create-pet-simple-non-numeric-age",
            Scenario::CreatePetSimpleNegativeAge => "create-pet-simple-negative-age",
            Scenario::ListAllPets => "list-all-pets",
            Scenario::ListMyPets => "list-my-pets",
            Scenario::AddNewPet => "add-new-pet",
            Scenario::AddNewPetWrongFile => "add-new-pet-wrong-file",
            Scenario::DeleteOwnPet => "delete-own-pet",
            Scenario::UpdateOwnPet => "update-own-pet",
            Scenario::UpdateForeignPet => "update-foreign-pet",
            Scenario::UpdateOwnPetEmptyFields => "update-own-pet-empty-fields",
            Scenario::SetPhoto => "set-photo",
            Scenario::ReplacePhoto => "replace-photo",
        }
    }
}

/// Everything a scenario needs: a client, two sets of credentials and the
/// photo fixtures.
pub struct Suite {
    client: PetFriends,
    credentials: Credentials,
    invalid_credentials: Credentials,
    fixtures: Fixtures,
}

impl Suite {
    pub fn new(
        client: PetFriends,
        credentials: Credentials,
        invalid_credentials: Credentials,
        fixtures: Fixtures,
    ) -> Self {
        Self {
            client,
            credentials,
            invalid_credentials,
            fixtures,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let email = config
            .valid_email()
            .context("VALID_EMAIL is not set (use --valid-email or .env)")?;
        let password = config
            .valid_password()
            .context("VALID_PASSWORD is not set (use --valid-password or .env)")?;
        let client =
            PetFriends::new(config.base_url()).context("Failed to build the HTTP client")?;

        Ok(Self::new(
            client,
            Credentials::new(email, password),
            Credentials::new(config.invalid_email(), config.invalid_password()),
            Fixtures::new(config.images_dir()),
        ))
    }

    /// Runs the scenarios one after another.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run(*scenario).await);
        }
        results
    }

    /// Runs one scenario. Failures of any kind end up in the returned result.
    pub async fn run(&self, scenario: Scenario) -> TestResult {
        let start = Instant::now();
        print_scenario_header(scenario.name());

        let outcome = match scenario {
            Scenario::ApiKeyValidUser => self.api_key_valid_user().await,
            Scenario::ApiKeyInvalidUser => self.api_key_invalid_user().await,
            Scenario::CreatePetSimple => self.create_pet_simple().await,
            Scenario::CreatePetSimpleNonNumericAge => self.create_pet_simple_rejects_age("five").await,
            Scenario::CreatePetSimpleNegativeAge => self.create_pet_simple_rejects_age("-1").await,
            Scenario::ListAllPets => self.list_pets(PetFilter::All).await,
            Scenario::ListMyPets => self.list_pets(PetFilter::MyPets).await,
            Scenario::AddNewPet => self.add_new_pet().await,
            Scenario::AddNewPetWrongFile => self.add_new_pet_wrong_file().await,
            Scenario::DeleteOwnPet => self.delete_own_pet().await,
            Scenario::UpdateOwnPet => self.update_own_pet().await,
            Scenario::UpdateForeignPet => self.update_foreign_pet().await,
            Scenario::UpdateOwnPetEmptyFields => self.update_own_pet_empty_fields().await,
            Scenario::SetPhoto => self.set_photo().await,
            Scenario::ReplacePhoto => self.replace_photo().await,
        };

        match outcome {
            Ok(()) => {
                print_ok("Scenario passed");
                TestResult::pass(scenario.name(), start.elapsed())
            }
            Err(err) => {
                let message = format!("{err:#}");
                print_failure(&message);
                TestResult::fail(scenario.name(), message, start.elapsed())
            }
        }
    }

    async fn api_key_valid_user(&self) -> Result<()> {
        print_step("Requesting API key with valid credentials...");
        let response = self.client.get_api_key(&self.credentials).await?;

        expect_status(&response, StatusCode::OK)?;
        ensure!(response.json().is_some(), "Response has no key field");
        Ok(())
    }

    async fn api_key_invalid_user(&self) -> Result<()> {
        print_step("Requesting API key with unknown credentials...");
        let response = self.client.get_api_key(&self.invalid_credentials).await?;

        expect_status(&response, StatusCode::FORBIDDEN)?;
        ensure!(
            response.contains_text(UNKNOWN_USER_MESSAGE),
            "Response does not contain {UNKNOWN_USER_MESSAGE:?}"
        );
        Ok(())
    }

    async fn create_pet_simple(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;

        print_step(&format!("Creating pet {:?} without photo...", PERSIK.name));
        let response = self
            .client
            .create_pet_simple(&auth_key, PERSIK.name, PERSIK.animal_type, PERSIK.age)
            .await?;

        expect_status(&response, StatusCode::OK)?;
        expect_name(&response, PERSIK.name)?;
        Ok(())
    }

    async fn create_pet_simple_rejects_age(&self, age: &str) -> Result<()> {
        let auth_key = self.auth_key().await?;

        print_step(&format!("Creating pet with age {age:?}..."));
        match self.create_pet_with_checked_age(&auth_key, PERSIK, age).await {
            Err(err) if err.error_kind == ErrorKind::Input(InputErrorKind::InvalidAge) => {
                print_ok(&format!("Age {age:?} rejected before sending: {err}"));
                Ok(())
            }
            Err(err) => Err(err.into()),
            Ok(response) => bail!(
                "Age {age:?} was not rejected, service answered {}",
                response.status
            ),
        }
    }

    async fn list_pets(&self, filter: PetFilter) -> Result<()> {
        let auth_key = self.auth_key().await?;

        print_step(&format!("Listing pets with filter {:?}...", filter.as_str()));
        let response = self.client.get_list_of_pets(&auth_key, filter).await?;

        expect_status(&response, StatusCode::OK)?;
        let pets = response.json().context("Response is not a pet list")?;
        ensure!(!pets.is_empty(), "Pet list is empty");
        print_ok(&format!("{} pets listed", pets.len()));
        Ok(())
    }

    async fn add_new_pet(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let pet = PERSIK_WITH_PHOTO;

        print_step(&format!("Adding pet {:?} with photo...", pet.name));
        let response = self
            .client
            .add_new_pet(&auth_key, pet.name, pet.animal_type, pet.age, &self.fixtures.photo())
            .await?;

        expect_status(&response, StatusCode::OK)?;
        expect_name(&response, pet.name)?;
        Ok(())
    }

    async fn add_new_pet_wrong_file(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let pet = PERSIK_WITH_PHOTO;

        print_step("Adding pet with a text file as its photo...");
        let response = self
            .client
            .add_new_pet(
                &auth_key,
                pet.name,
                pet.animal_type,
                pet.age,
                &self.fixtures.not_a_photo(),
            )
            .await?;

        ensure!(
            !response.is_success(),
            "Text file was accepted as a photo ({})",
            response.status
        );
        print_ok(&format!("Upload refused with {}", response.status));
        Ok(())
    }

    async fn delete_own_pet(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let my_pets = self.ensure_my_pet(&auth_key, true).await?;
        let pet_id = first_pet(&my_pets)?.id.clone();

        print_step(&format!("Deleting pet {pet_id}..."));
        let response = self.client.delete_pet(&auth_key, &pet_id).await?;
        expect_status(&response, StatusCode::OK)?;

        let my_pets = self.my_pets(&auth_key).await?;
        ensure!(
            !my_pets.contains(&pet_id),
            "Pet {pet_id} is still listed after deletion"
        );
        Ok(())
    }

    async fn update_own_pet(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let my_pets = self.my_pets(&auth_key).await?;
        let pet = first_pet(&my_pets)?;

        print_step(&format!("Renaming pet {} to {:?}...", pet.id, PUSIK.name));
        let response = self
            .client
            .update_pet_info(&auth_key, &pet.id, PUSIK.name, PUSIK.animal_type, PUSIK.age)
            .await?;

        expect_status(&response, StatusCode::OK)?;
        expect_name(&response, PUSIK.name)?;
        Ok(())
    }

    async fn update_foreign_pet(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let my_pets = self.my_pets(&auth_key).await?;
        let all_pets = self.pets(&auth_key, PetFilter::All).await?;
        let foreign = all_pets
            .pets
            .iter()
            .find(|pet| !my_pets.contains(&pet.id))
            .context("There are no pets of other users to update")?;

        print_step(&format!("Renaming someone else's pet {}...", foreign.id));
        let response = self
            .client
            .update_pet_info(
                &auth_key,
                &foreign.id,
                PUSIK.name,
                PUSIK.animal_type,
                PUSIK.age,
            )
            .await?;

        expect_status(&response, StatusCode::FORBIDDEN)?;
        Ok(())
    }

    async fn update_own_pet_empty_fields(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let my_pets = self.ensure_my_pet(&auth_key, false).await?;
        let pet = first_pet(&my_pets)?;

        print_step(&format!("Clearing the fields of pet {}...", pet.id));
        let response = self
            .client
            .update_pet_info(&auth_key, &pet.id, BLANK.name, BLANK.animal_type, BLANK.age)
            .await?;

        expect_status(&response, StatusCode::OK)?;
        expect_name(&response, BLANK.name)?;
        Ok(())
    }

    async fn set_photo(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;
        let my_pets = self.ensure_my_pet(&auth_key, false).await?;
        let pet = first_pet(&my_pets)?;

        print_step(&format!("Setting a photo on pet {}...", pet.id));
        let response = self
            .client
            .set_photo(&auth_key, &pet.id, &self.fixtures.photo())
            .await?;

        expect_status(&response, StatusCode::OK)?;
        Ok(())
    }

    async fn replace_photo(&self) -> Result<()> {
        let auth_key = self.auth_key().await?;

        print_step("Adding a pet that already has a photo...");
        let created = self
            .client
            .add_new_pet(
                &auth_key,
                LEBOWSKI.name,
                LEBOWSKI.animal_type,
                LEBOWSKI.age,
                &self.fixtures.photo(),
            )
            .await?;
        expect_status(&created, StatusCode::OK)?;
        let pet_id = created.json().context("Response is not a pet")?.id.clone();

        print_step(&format!("Replacing the photo of pet {pet_id}..."));
        let response = self
            .client
            .set_photo(&auth_key, &pet_id, &self.fixtures.alternate_photo())
            .await?;

        expect_status(&response, StatusCode::OK)?;
        Ok(())
    }

    async fn auth_key(&self) -> Result<AuthKey> {
        let response = self.client.get_api_key(&self.credentials).await?;
        expect_status(&response, StatusCode::OK).context("Failed to get API key")?;

        response
            .into_json()
            .map(|api_key| api_key.key)
            .context("No key in API key response")
    }

    async fn pets(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<PetList> {
        let response = self.client.get_list_of_pets(auth_key, filter).await?;
        expect_status(&response, StatusCode::OK).context("Failed to list pets")?;

        response.into_json().context("Response is not a pet list")
    }

    async fn my_pets(&self, auth_key: &AuthKey) -> Result<PetList> {
        self.pets(auth_key, PetFilter::MyPets).await
    }

    /// Returns our own pets, creating one first if there are none.
    async fn ensure_my_pet(&self, auth_key: &AuthKey, with_photo: bool) -> Result<PetList> {
        let my_pets = self.my_pets(auth_key).await?;
        if !my_pets.is_empty() {
            return Ok(my_pets);
        }

        print_step(&format!("No pets of my own yet, creating {:?}...", LEBOWSKI.name));
        let response = if with_photo {
            self.client
                .add_new_pet(
                    auth_key,
                    LEBOWSKI.name,
                    LEBOWSKI.animal_type,
                    LEBOWSKI.age,
                    &self.fixtures.photo(),
                )
                .await?
        } else {
            self.client
                .create_pet_simple(auth_key, LEBOWSKI.name, LEBOWSKI.animal_type, LEBOWSKI.age)
                .await?
        };
        expect_status(&response, StatusCode::OK).context("Failed to create a pet")?;

        self.my_pets(auth_key).await
    }

    /// Creates `pet` with `age` in place of its own, refusing ages that are
    /// not positive whole numbers.
    async fn create_pet_with_checked_age(
        &self,
        auth_key: &AuthKey,
        pet: PetData,
        age: &str,
    ) -> Result<ApiResponse<Pet>, pet_friends::Error> {
        let age = parse_age(age)?;
        self.client
            .create_pet_simple(auth_key, pet.name, pet.animal_type, age)
            .await
    }
}

fn expect_status<T>(response: &ApiResponse<T>, expected: StatusCode) -> Result<()> {
    ensure!(
        response.status == expected,
        "Expected status {expected}, got {}",
        response.status
    );
    print_ok(&format!("Status {}", response.status));
    Ok(())
}

fn expect_name(response: &ApiResponse<Pet>, expected: &str) -> Result<()> {
    let pet = response.json().context("Response is not a pet")?;
    ensure!(
        pet.name == expected,
        "Expected name {expected:?}, got {:?}",
        pet.name
    );
    Ok(())
}

fn first_pet(pets: &PetList) -> Result<&Pet> {
    pets.first().context("There are no pets of my own")
}
