//! Consumer configuration (layered: code > env > config file).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Credential;
use crate::error::{CredentialError, Result};

/// Environment variable holding the consumer key.
pub const CONSUMER_KEY_ENV: &str = "OAUTH_CONSUMER_KEY";
/// Environment variable holding the consumer secret.
pub const CONSUMER_SECRET_ENV: &str = "OAUTH_CONSUMER_SECRET";

const CONFIG_DIR_NAME: &str = ".oauth-credential";
const CONFIG_FILE_NAME: &str = "consumer.toml";

/// Consumer key/secret as issued to the OAuth client application.
///
/// Resolution order:
/// 1. Explicit values (`ConsumerConfig::new`)
/// 2. `OAUTH_CONSUMER_KEY` / `OAUTH_CONSUMER_SECRET` (a `.env` file is honored)
/// 3. `~/.oauth-credential/consumer.toml`
///
/// # Example
/// ```no_run
/// use oauth_credential::config::ConsumerConfig;
///
/// let credential = ConsumerConfig::resolve()?.into_credential()?;
/// assert!(!credential.is_expired());
/// # Ok::<(), oauth_credential::error::CredentialError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl fmt::Debug for ConsumerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

impl ConsumerConfig {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Read the consumer pair from the environment.
    ///
    /// Returns `Ok(None)` when neither variable is set and an error when only
    /// one of them is.
    pub fn from_env() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let key = non_empty_env(CONSUMER_KEY_ENV);
        let secret = non_empty_env(CONSUMER_SECRET_ENV);
        match (key, secret) {
            (Some(key), Some(secret)) => {
                debug!(source = "env", "consumer config loaded");
                Ok(Some(Self::new(key, secret)))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(CredentialError::Configuration(format!(
                "{CONSUMER_KEY_ENV} is set but {CONSUMER_SECRET_ENV} is missing"
            ))),
            (None, Some(_)) => Err(CredentialError::Configuration(format!(
                "{CONSUMER_SECRET_ENV} is set but {CONSUMER_KEY_ENV} is missing"
            ))),
        }
    }

    /// Parse a TOML document with `consumer_key` and `consumer_secret`.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a TOML file. Returns `Ok(None)` if the file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CredentialError::Io(err)),
        };
        let config = Self::from_toml_str(&raw)?;
        debug!(source = "file", path = %path.display(), "consumer config loaded");
        Ok(Some(config))
    }

    /// Default config file path (`~/.oauth-credential/consumer.toml`).
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
            .join(CONFIG_FILE_NAME)
    }

    /// Resolve from the environment, falling back to the default config file.
    pub fn resolve() -> Result<Self> {
        Self::resolve_with_path(Self::default_path())
    }

    /// Resolve from the environment, falling back to the config file at `path`.
    pub fn resolve_with_path(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(config) = Self::from_env()? {
            return Ok(config);
        }
        let path = path.as_ref();
        Self::load_from_path(path)?.ok_or_else(|| {
            CredentialError::Configuration(format!(
                "no consumer credentials: set {CONSUMER_KEY_ENV}/{CONSUMER_SECRET_ENV} or create {}",
                path.display()
            ))
        })
    }

    /// Build a fresh [`Credential`] for this consumer.
    pub fn into_credential(self) -> Result<Credential> {
        Credential::try_new(self.consumer_key, self.consumer_secret)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
