//! HTTP client for the PetFriends REST API.
//!
//! Each method sends exactly one request and hands back the status and body
//! whatever the status is. Only transport failures and unreadable photo files
//! are reported as `Err`.

use crate::auth::{ApiKey, AuthKey, Credentials};
use crate::error::Error;
use crate::pet::{Pet, PetFilter, PetList};
use crate::response::ApiResponse;
use log::*;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::fmt::Display;
use std::path::Path;

const AUTH_KEY_HEADER: &str = "auth_key";
const PHOTO_FIELD: &str = "pet_photo";

pub struct PetFriends {
    client: Client,
    base_url: String,
}

impl PetFriends {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder().use_rustls_tls().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client that sends its requests through an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Exchange an account's credentials for an API key.
    pub async fn get_api_key(&self, credentials: &Credentials) -> Result<ApiResponse<ApiKey>, Error> {
        let url = self.url("api/key");
        debug!("Requesting API key for {}", credentials.email);

        let response = self
            .client
            .get(&url)
            .header("email", &credentials.email)
            .header("password", credentials.password())
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// List all pets, or only the key owner's pets with `PetFilter::MyPets`.
    pub async fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: PetFilter,
    ) -> Result<ApiResponse<PetList>, Error> {
        let url = self.url("api/pets");
        debug!("Listing pets with filter {:?}", filter.as_str());

        let response = self
            .client
            .get(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .query(&[("filter", filter.as_str())])
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// Add a pet together with its photo.
    pub async fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: impl Display,
        photo_path: &Path,
    ) -> Result<ApiResponse<Pet>, Error> {
        let url = self.url("api/pets");
        let photo = photo_part(photo_path).await?;
        debug!("Adding pet {name:?} with photo {}", photo_path.display());

        let form = Form::new()
            .text("name", name.to_string())
            .text("animal_type", animal_type.to_string())
            .text("age", age.to_string())
            .part(PHOTO_FIELD, photo);

        let response = self
            .client
            .post(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .multipart(form)
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// Add a pet without a photo.
    pub async fn create_pet_simple(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: impl Display,
    ) -> Result<ApiResponse<Pet>, Error> {
        let url = self.url("api/create_pet_simple");
        let age = age.to_string();
        debug!("Creating pet {name:?} without photo");

        let response = self
            .client
            .post(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age.as_str())])
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// Replace the name, type and age of an existing pet.
    pub async fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: impl Display,
    ) -> Result<ApiResponse<Pet>, Error> {
        let url = self.url(&format!("api/pets/{pet_id}"));
        let age = age.to_string();
        debug!("Updating pet {pet_id}");

        let response = self
            .client
            .put(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age.as_str())])
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// Upload a new photo for an existing pet.
    pub async fn set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: &Path,
    ) -> Result<ApiResponse<Pet>, Error> {
        let url = self.url(&format!("api/pets/set_photo/{pet_id}"));
        let photo = photo_part(photo_path).await?;
        debug!("Setting photo {} on pet {pet_id}", photo_path.display());

        let response = self
            .client
            .post(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .multipart(Form::new().part(PHOTO_FIELD, photo))
            .send()
            .await?;

        ApiResponse::decode(response).await
    }

    /// Delete a pet. The service usually answers with an empty body, which
    /// comes back as empty text.
    pub async fn delete_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
    ) -> Result<ApiResponse<Value>, Error> {
        let url = self.url(&format!("api/pets/{pet_id}"));
        debug!("Deleting pet {pet_id}");

        let response = self
            .client
            .delete(&url)
            .header(AUTH_KEY_HEADER, auth_key.expose())
            .send()
            .await?;

        ApiResponse::decode(response).await
    }
}

/// Read a photo into a multipart file part named after the file.
async fn photo_part(path: &Path) -> Result<Part, Error> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        warn!("Failed to read photo {}: {err}", path.display());
        Error::from(err)
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(PHOTO_FIELD)
        .to_string();

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(photo_mime(path).as_ref())?)
}

fn photo_mime(path: &Path) -> mime::Mime {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("txt") => mime::TEXT_PLAIN,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PhotoErrorKind};
    use crate::response::Body;
    use mockito::{Matcher, Server, ServerGuard};
    use reqwest::StatusCode;
    use std::path::PathBuf;

    const KEY: &str = "ea738148a1f19838e1c5d1413877f3691a3731380e733e877b0ae729";
    const PET_JSON: &str = r#"{"id": "pet-1", "name": "Persik", "animal_type": "cat", "age": "5", "pet_photo": "", "user_id": "user-1"}"#;

    async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    async fn fetch_key(server: &mut ServerGuard, client: &PetFriends) -> AuthKey {
        let _mock = server
            .mock("GET", "/api/key")
            .with_status(200)
            .with_body(format!(r#"{{"key": "{KEY}"}}"#))
            .create_async()
            .await;

        let credentials = Credentials::new("owner@example.com", "secret");
        client
            .get_api_key(&credentials)
            .await
            .unwrap()
            .into_json()
            .unwrap()
            .key
    }

    fn write_fixture(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pet_friends_client_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PetFriends::with_client(Client::new(), "https://petfriends.skillfactory.ru/");
        assert_eq!(client.base_url(), "https://petfriends.skillfactory.ru");
        assert_eq!(client.url("api/pets"), "https://petfriends.skillfactory.ru/api/pets");
    }

    #[test]
    fn test_photo_mime_follows_extension() {
        assert_eq!(photo_mime(Path::new("images/original.jpg")), mime::IMAGE_JPEG);
        assert_eq!(photo_mime(Path::new("CAT.JPEG")), mime::IMAGE_JPEG);
        assert_eq!(photo_mime(Path::new("cat.png")), mime::IMAGE_PNG);
        assert_eq!(photo_mime(Path::new("images/test.txt")), mime::TEXT_PLAIN);
        assert_eq!(photo_mime(Path::new("photo")), mime::APPLICATION_OCTET_STREAM);
    }

    #[tokio::test]
    async fn test_get_api_key_sends_credentials_as_headers() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();

        let mock = server
            .mock("GET", "/api/key")
            .match_header("email", "owner@example.com")
            .match_header("password", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"key": "{KEY}"}}"#))
            .create_async()
            .await;

        let credentials = Credentials::new("owner@example.com", "secret");
        let response = client.get_api_key(&credentials).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json().map(|k| k.key.expose()), Some(KEY));
    }

    #[tokio::test]
    async fn test_get_api_key_keeps_forbidden_page_as_text() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();

        let _mock = server
            .mock("GET", "/api/key")
            .with_status(403)
            .with_header("content-type", "text/html")
            .with_body("<h1>Forbidden</h1><p>This user wasn&#x27;t found in database</p>")
            .create_async()
            .await;

        let credentials = Credentials::new("nobody@example.com", "wrong");
        let response = client.get_api_key(&credentials).await.unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert!(response.json().is_none());
        assert!(response.contains_text("This user wasn&#x27;t found in database"));
    }

    #[tokio::test]
    async fn test_get_list_of_pets_sends_key_and_filter() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("GET", "/api/pets")
            .match_header("auth_key", KEY)
            .match_query(Matcher::UrlEncoded("filter".into(), "my_pets".into()))
            .with_status(200)
            .with_body(format!(r#"{{"pets": [{PET_JSON}]}}"#))
            .create_async()
            .await;

        let response = client
            .get_list_of_pets(&key, PetFilter::MyPets)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        let pets = response.into_json().unwrap();
        assert_eq!(pets.len(), 1);
        assert!(pets.contains("pet-1"));
    }

    #[tokio::test]
    async fn test_get_list_of_pets_sends_empty_filter_for_all() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("GET", "/api/pets")
            .match_query(Matcher::UrlEncoded("filter".into(), "".into()))
            .with_status(200)
            .with_body(r#"{"pets": []}"#)
            .create_async()
            .await;

        let response = client.get_list_of_pets(&key, PetFilter::All).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.json(), Some(&PetList::default()));
    }

    #[tokio::test]
    async fn test_create_pet_simple_posts_form_fields() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("POST", "/api/create_pet_simple")
            .match_header("auth_key", KEY)
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Persik".into()),
                Matcher::UrlEncoded("animal_type".into(), "cat".into()),
                Matcher::UrlEncoded("age".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(PET_JSON)
            .create_async()
            .await;

        let response = client
            .create_pet_simple(&key, "Persik", "cat", 5)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.json().map(|p| p.name.as_str()), Some("Persik"));
    }

    #[tokio::test]
    async fn test_add_new_pet_uploads_multipart_photo() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;
        let photo = write_fixture("add_new_pet.jpg", b"fake-jpeg-bytes");

        let mock = server
            .mock("POST", "/api/pets")
            .match_header("auth_key", KEY)
            .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="name"\r\n\r\nPersik"#.into()),
                Matcher::Regex(r#"name="age"\r\n\r\n5"#.into()),
                Matcher::Regex(r#"name="pet_photo"; filename="add_new_pet.jpg""#.into()),
                Matcher::Regex("(?i)content-type: image/jpeg".into()),
            ]))
            .with_status(200)
            .with_body(PET_JSON)
            .create_async()
            .await;

        let response = client
            .add_new_pet(&key, "Persik", "cat", "5", &photo)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json().map(|p| p.id.as_str()), Some("pet-1"));
    }

    #[tokio::test]
    async fn test_add_new_pet_with_missing_photo_sends_nothing() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("POST", "/api/pets")
            .expect(0)
            .create_async()
            .await;

        let err = client
            .add_new_pet(&key, "Persik", "cat", 5, Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.error_kind, ErrorKind::Photo(PhotoErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_update_pet_info_puts_form_to_pet_path() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("PUT", "/api/pets/pet-1")
            .match_header("auth_key", KEY)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Пусик".into()),
                Matcher::UrlEncoded("animal_type".into(), "киса".into()),
                Matcher::UrlEncoded("age".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": "pet-1", "name": "Пусик", "animal_type": "киса", "age": "2"}"#)
            .create_async()
            .await;

        let response = client
            .update_pet_info(&key, "pet-1", "Пусик", "киса", 2)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.json().map(|p| p.name.as_str()), Some("Пусик"));
    }

    #[tokio::test]
    async fn test_update_pet_info_returns_forbidden_status() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let _mock = server
            .mock("PUT", "/api/pets/someone-elses")
            .with_status(403)
            .with_body("<p>Forbidden</p>")
            .create_async()
            .await;

        let response = client
            .update_pet_info(&key, "someone-elses", "Пусик", "киса", 2)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body, Body::Text("<p>Forbidden</p>".to_string()));
    }

    #[tokio::test]
    async fn test_set_photo_posts_single_file_part() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;
        let photo = write_fixture("set_photo.png", b"fake-png-bytes");

        let mock = server
            .mock("POST", "/api/pets/set_photo/pet-1")
            .match_header("auth_key", KEY)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="pet_photo"; filename="set_photo.png""#.into()),
                Matcher::Regex("(?i)content-type: image/png".into()),
            ]))
            .with_status(200)
            .with_body(PET_JSON)
            .create_async()
            .await;

        let response = client.set_photo(&key, "pet-1", &photo).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_delete_pet_returns_empty_text_body() {
        let mut server = setup_test_server().await;
        let client = PetFriends::new(server.url()).unwrap();
        let key = fetch_key(&mut server, &client).await;

        let mock = server
            .mock("DELETE", "/api/pets/pet-1")
            .match_header("auth_key", KEY)
            .with_status(200)
            .create_async()
            .await;

        let response = client.delete_pet(&key, "pet-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text(), Some(""));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_http_error() {
        // Nothing listens on the discard port
        let client = PetFriends::new("http://127.0.0.1:9").unwrap();
        let credentials = Credentials::new("owner@example.com", "secret");

        let err = client.get_api_key(&credentials).await.unwrap_err();

        assert!(matches!(err.error_kind, ErrorKind::Http(_)));
    }
}
