//! Client configuration: which host to ingest into, as whom, with which key.
//!
//! Settings come from (highest first) explicit overrides, the
//! `ENTITYSET_HOST` / `ENTITYSET_USER` / `ENTITYSET_API_KEY` environment
//! variables, and the JSON file at `$HOME/.entityset/config.json`.
//! API keys are stored per user and per environment, where the environment
//! is derived from the host name.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Host used when nothing else is configured.
pub const DEFAULT_HOST: &str = "dev-app.conduce.com";

pub const HOST_ENV: &str = "ENTITYSET_HOST";
pub const USER_ENV: &str = "ENTITYSET_USER";
pub const API_KEY_ENV: &str = "ENTITYSET_API_KEY";

const CONFIG_DIR: &str = ".entityset";
const CONFIG_FILE: &str = "config.json";

/// Map a host name to the environment its API keys are filed under.
///
/// `stg`, `dev` and `prd` are shorthands for the matching `-app` hosts;
/// anything else is keyed by its first DNS label.
pub fn environment_for_host(host: &str) -> String {
    match host {
        "stg" => "stg-app".to_string(),
        "dev" => "dev-app".to_string(),
        "prd" => "prd-app".to_string(),
        other => other.split('.').next().unwrap_or(other).to_string(),
    }
}

/// Per-user section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Environment → API key.
    #[serde(default)]
    pub api_keys: IndexMap<String, String>,
}

/// The persisted configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,
    #[serde(default)]
    pub users: IndexMap<String, UserConfig>,
}

impl ConfigFile {
    /// `$HOME/.entityset/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| IngestError::Config("HOME is not set".to_string()))?;
        Ok(PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the file at `path`. A missing file is an empty configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(IngestError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            IngestError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the configuration as pretty JSON, creating the directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e| IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(path).map_err(io_err)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn set_default_host(&mut self, host: impl Into<String>) {
        self.default_host = Some(host.into());
    }

    pub fn set_default_user(&mut self, user: impl Into<String>) {
        self.default_user = Some(user.into());
    }

    /// Store an API key for `host`'s environment.
    ///
    /// Without an explicit user the default user is used; having neither is
    /// a configuration error.
    pub fn set_api_key(&mut self, host: &str, user: Option<&str>, key: impl Into<String>) -> Result<()> {
        let user = user
            .map(str::to_string)
            .or_else(|| self.default_user.clone())
            .ok_or_else(|| {
                IngestError::Config("No user given and no default user configured".to_string())
            })?;

        self.users
            .entry(user)
            .or_default()
            .api_keys
            .insert(environment_for_host(host), key.into());
        Ok(())
    }

    /// The key stored for `user` in `host`'s environment.
    pub fn api_key_for(&self, host: &str, user: &str) -> Option<&str> {
        self.users
            .get(user)?
            .api_keys
            .get(&environment_for_host(host))
            .map(String::as_str)
    }
}

/// Values supplied explicitly, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub api_key: Option<String>,
}

/// Effective settings for one ingest session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub user: Option<String>,
    pub api_key: Option<String>,
}

impl ClientConfig {
    /// Resolve from overrides, the process environment, then `file`.
    pub fn resolve(overrides: &ConfigOverrides, file: &ConfigFile) -> Self {
        Self::resolve_with(overrides, |name| std::env::var(name).ok(), file)
    }

    /// Resolve with a custom environment lookup.
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        file: &ConfigFile,
    ) -> Self {
        let host = overrides
            .host
            .clone()
            .or_else(|| env(HOST_ENV))
            .or_else(|| file.default_host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let user = overrides
            .user
            .clone()
            .or_else(|| env(USER_ENV))
            .or_else(|| file.default_user.clone());

        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| env(API_KEY_ENV))
            .or_else(|| {
                user.as_deref()
                    .and_then(|u| file.api_key_for(&host, u))
                    .map(str::to_string)
            });

        Self { host, user, api_key }
    }

    /// The API key, or a configuration error naming where to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            IngestError::Config(format!(
                "No API key for host '{}'; pass --api-key, set {}, or run `entityset config set-api-key`",
                self.host, API_KEY_ENV
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_environment_for_host() {
        assert_eq!(environment_for_host("stg"), "stg-app");
        assert_eq!(environment_for_host("dev"), "dev-app");
        assert_eq!(environment_for_host("prd"), "prd-app");
        assert_eq!(environment_for_host("dev-app.conduce.com"), "dev-app");
        assert_eq!(environment_for_host("localhost"), "localhost");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ConfigFile::default();
        config.set_default_host("prd-app.conduce.com");
        config.set_default_user("ana@example.com");
        config.set_api_key("prd-app.conduce.com", None, "secret").unwrap();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.api_key_for("prd", "ana@example.com"),
            Some("secret")
        );
        assert_eq!(loaded.api_key_for("stg", "ana@example.com"), None);
    }

    #[test]
    fn test_set_api_key_needs_user() {
        let mut config = ConfigFile::default();
        assert!(matches!(
            config.set_api_key("dev", None, "k"),
            Err(IngestError::Config(_))
        ));

        config.set_api_key("dev", Some("bob"), "k").unwrap();
        assert_eq!(config.api_key_for("dev-app.conduce.com", "bob"), Some("k"));
    }

    #[test]
    fn test_resolution_order() {
        let mut file = ConfigFile::default();
        file.set_default_host("stg-app.conduce.com");
        file.set_default_user("ana");
        file.set_api_key("stg-app.conduce.com", None, "from-file").unwrap();

        let resolved = ClientConfig::resolve_with(&ConfigOverrides::default(), no_env, &file);
        assert_eq!(resolved.host, "stg-app.conduce.com");
        assert_eq!(resolved.api_key.as_deref(), Some("from-file"));

        let env = |name: &str| (name == API_KEY_ENV).then(|| "from-env".to_string());
        let resolved = ClientConfig::resolve_with(&ConfigOverrides::default(), env, &file);
        assert_eq!(resolved.api_key.as_deref(), Some("from-env"));

        let overrides = ConfigOverrides {
            host: Some("prd-app.conduce.com".to_string()),
            api_key: Some("from-flag".to_string()),
            ..Default::default()
        };
        let resolved = ClientConfig::resolve_with(&overrides, env, &file);
        assert_eq!(resolved.host, "prd-app.conduce.com");
        assert_eq!(resolved.api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_defaults_when_unconfigured() {
        let resolved =
            ClientConfig::resolve_with(&ConfigOverrides::default(), no_env, &ConfigFile::default());

        assert_eq!(resolved.host, DEFAULT_HOST);
        assert_eq!(resolved.user, None);
        assert!(resolved.require_api_key().is_err());
    }
}
