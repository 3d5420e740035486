//! `.texam/config`: credentials, commit policy and the push remote.
//!
//! ```toml
//! [user]
//! username = "20231234"
//! password = "secret"
//!
//! [core]
//! require_test_id = true
//! compression = 6
//!
//! [remote]
//! url = "https://exams.example/submit"
//! timeout_secs = 60
//! test_id = "midterm"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use texam_utils::lockfile::LockFile;

use crate::RepoError;

/// Default push timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: UserConfig,
    pub core: CoreConfig,
    pub remote: RemoteConfig,
}

/// Credentials passed through to the remote as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Refuse commits that carry no test id.
    pub require_test_id: bool,
    /// zlib level for new objects (0-9).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timeout_secs: u64,
    /// Test id used when a commit or push does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            test_id: None,
        }
    }
}

impl Config {
    /// A config holding only credentials.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: UserConfig {
                username: username.into(),
                password: password.into(),
            },
            ..Self::default()
        }
    }

    /// Read a config file. A missing file is the default config.
    pub fn load(path: &Path) -> Result<Self, RepoError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text).map_err(|reason| RepoError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.message().to_string())
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| e.to_string())
    }

    /// Replace the config file atomically.
    pub fn save(&self, path: &Path) -> Result<(), RepoError> {
        let text = self.to_toml().map_err(|reason| RepoError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        LockFile::replace(path, text.as_bytes())?;
        Ok(())
    }

    /// Set a value by dotted key, e.g. `remote.url`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let bool_value = || {
            value
                .parse::<bool>()
                .map_err(|_| format!("{key} expects true or false, got {value:?}"))
        };
        let int_value = || {
            value
                .parse::<u64>()
                .map_err(|_| format!("{key} expects a number, got {value:?}"))
        };
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match key {
            "user.username" => self.user.username = value.to_string(),
            "user.password" => self.user.password = value.to_string(),
            "core.require_test_id" => self.core.require_test_id = bool_value()?,
            "core.compression" => {
                let level = int_value()?;
                if level > 9 {
                    return Err(format!("core.compression must be 0-9, got {level}"));
                }
                self.core.compression = Some(level as u32);
            }
            "remote.url" => self.remote.url = optional(),
            "remote.timeout_secs" => self.remote.timeout_secs = int_value()?,
            "remote.test_id" => self.remote.test_id = optional(),
            _ => return Err(format!("unknown config key: {key}")),
        }
        Ok(())
    }

    /// Read a value by dotted key. `user.password` is never shown.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "user.username" => Some(self.user.username.clone()),
            "core.require_test_id" => Some(self.core.require_test_id.to_string()),
            "core.compression" => self.core.compression.map(|c| c.to_string()),
            "remote.url" => self.remote.url.clone(),
            "remote.timeout_secs" => Some(self.remote.timeout_secs.to_string()),
            "remote.test_id" => self.remote.test_id.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.remote.timeout_secs, 60);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = Config::parse("[user]\nusername = \"42\"\n[remote]\nurl = \"http://x\"\n").unwrap();
        assert_eq!(config.user.username, "42");
        assert_eq!(config.user.password, "");
        assert_eq!(config.remote.url.as_deref(), Some("http://x"));
        assert_eq!(config.remote.timeout_secs, 60);
        assert!(!config.core.require_test_id);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let mut config = Config::with_credentials("20231234", "pw");
        config.core.require_test_id = true;
        config.remote.test_id = Some("final".into());
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
        assert!(!dir.path().join("config.lock").exists());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[core]\nrequire_test_id = \"maybe\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(RepoError::Config { .. })));
    }

    #[test]
    fn set_by_key() {
        let mut config = Config::default();
        config.set("remote.url", "file:///srv/inbox").unwrap();
        config.set("core.require_test_id", "true").unwrap();
        config.set("core.compression", "9").unwrap();
        assert_eq!(config.get("remote.url").as_deref(), Some("file:///srv/inbox"));
        assert!(config.core.require_test_id);
        assert!(config.set("core.compression", "10").is_err());
        assert!(config.set("core.require_test_id", "yes").is_err());
        assert!(config.set("no.such", "x").is_err());
        assert_eq!(config.get("user.password"), None);
    }
}
