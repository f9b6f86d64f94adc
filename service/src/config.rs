use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Default PetFriends service URL used when `BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

const DEFAULT_INVALID_EMAIL: &str = "nobody@petfriends.invalid";
const DEFAULT_INVALID_PASSWORD: &str = "not-a-real-password";
const DEFAULT_IMAGES_DIR: &str = "testing-tools/images";

#[derive(Clone, Debug, Parser)]
pub struct Config {
    /// The base URL of the PetFriends service under test.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Email of an existing PetFriends account.
    #[arg(long, env)]
    valid_email: Option<String>,

    /// Password of the account named by `valid_email`.
    #[arg(long, env, hide_env_values = true)]
    valid_password: Option<String>,

    /// Email that the service must not recognise.
    #[arg(long, env, default_value = DEFAULT_INVALID_EMAIL)]
    invalid_email: String,

    /// Password paired with `invalid_email`.
    #[arg(long, env, default_value = DEFAULT_INVALID_PASSWORD, hide_env_values = true)]
    invalid_password: String,

    /// Directory holding the photo fixtures uploaded by the scenarios.
    #[arg(long, env, default_value = DEFAULT_IMAGES_DIR)]
    images_dir: PathBuf,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    /// Builds a config from environment variables and defaults only, ignoring
    /// the process arguments.
    fn default() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }
}

/// Loads a `.env` file from the working directory (or its parents) into the
/// process environment. A missing file is not an error.
pub fn load_dotenv() {
    dotenv().ok();
}

impl Config {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn valid_email(&self) -> Option<&str> {
        self.valid_email.as_deref()
    }

    pub fn valid_password(&self) -> Option<&str> {
        self.valid_password.as_deref()
    }

    pub fn set_valid_credentials(mut self, email: String, password: String) -> Self {
        self.valid_email = Some(email);
        self.valid_password = Some(password);
        self
    }

    pub fn invalid_email(&self) -> &str {
        &self.invalid_email
    }

    pub fn invalid_password(&self) -> &str {
        &self.invalid_password
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn set_images_dir(mut self, images_dir: PathBuf) -> Self {
        self.images_dir = images_dir;
        self
    }
}
