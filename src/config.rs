// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration.
//!
//! Everything that used to be ambient process state (home directory, host
//! platform, temp location) is carried by [`ProvisionConfig`] and handed to
//! the installer explicitly. Values are layered: built-in defaults, then an
//! optional `config.toml` in the cache root, then `PROVISION_*` environment
//! variables with `__` separating nested keys
//! (`PROVISION_DOWNLOAD__MAX_REDIRECTS=5`).

use crate::error::{ProvisionError, Result};
use crate::paths;
use crate::platform::HostPlatform;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "PROVISION";
pub const DEFAULT_CACHE_DIR_NAME: &str = paths::home::DEFAULT_CACHE_DIR_NAME;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;
pub const DEFAULT_RELEASE_INDEX_URL: &str = "https://api.github.com";
pub const DEFAULT_RELEASE_INDEX_ATTEMPTS: usize = 3;
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_GIT_VERSION: &str = "2.43.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    pub user_root: PathBuf,

    #[serde(default = "default_cache_dir_name")]
    pub cache_dir_name: String,

    /// Where downloaded archives are written; defaults to `<cache-root>/tmp`.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// Install for this platform instead of the running one.
    #[serde(default)]
    pub platform: Option<HostPlatform>,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub release_index: ReleaseIndexConfig,

    #[serde(default)]
    pub locking: LockingConfig,

    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseIndexConfig {
    #[serde(default = "default_release_index_url")]
    pub base_url: String,
    #[serde(default = "default_release_index_attempts")]
    pub attempts: usize,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockingConfig {
    #[serde(default = "default_lock_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_git_version")]
    pub version: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Default for ReleaseIndexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RELEASE_INDEX_URL.to_string(),
            attempts: DEFAULT_RELEASE_INDEX_ATTEMPTS,
            token: None,
        }
    }
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_GIT_VERSION.to_string(),
        }
    }
}

fn default_cache_dir_name() -> String {
    DEFAULT_CACHE_DIR_NAME.to_string()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

fn default_release_index_url() -> String {
    DEFAULT_RELEASE_INDEX_URL.to_string()
}

fn default_release_index_attempts() -> usize {
    DEFAULT_RELEASE_INDEX_ATTEMPTS
}

fn default_lock_timeout_secs() -> u64 {
    DEFAULT_LOCK_TIMEOUT_SECS
}

fn default_git_version() -> String {
    DEFAULT_GIT_VERSION.to_string()
}

impl ProvisionConfig {
    /// Defaults rooted at `user_root`, without reading files or environment.
    pub fn new(user_root: impl Into<PathBuf>) -> Self {
        Self {
            user_root: user_root.into(),
            cache_dir_name: default_cache_dir_name(),
            temp_root: None,
            platform: None,
            download: DownloadConfig::default(),
            release_index: ReleaseIndexConfig::default(),
            locking: LockingConfig::default(),
            git: GitConfig::default(),
        }
    }

    /// Load layered configuration for the given user root.
    pub fn load(user_root: &Path) -> Result<Self> {
        let cache_dir_name = env::var(format!("{ENV_PREFIX}_CACHE_DIR_NAME"))
            .unwrap_or_else(|_| default_cache_dir_name());
        let config_path = paths::config_file(&paths::cache_root(user_root, &cache_dir_name));

        if config_path.exists() {
            log::debug!("Loading config from {}", config_path.display());
        } else {
            log::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
        }

        let settings = Config::builder()
            .set_default("user_root", user_root.to_string_lossy().to_string())
            .map_err(config_error)?
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        let config: ProvisionConfig = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_dir_name.is_empty()
            || self.cache_dir_name.contains(['/', '\\'])
            || self.cache_dir_name == ".."
        {
            return Err(ProvisionError::ConfigError(format!(
                "cache_dir_name '{}' must be a single directory name",
                self.cache_dir_name
            )));
        }
        if self.release_index.attempts == 0 {
            return Err(ProvisionError::ConfigError(
                "release_index.attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_root(&self) -> PathBuf {
        paths::cache_root(&self.user_root, &self.cache_dir_name)
    }

    pub fn temp_root(&self) -> PathBuf {
        self.temp_root
            .clone()
            .unwrap_or_else(|| paths::temp_root(&self.cache_root()))
    }

    /// Platform to install for: the override when set, else the running host.
    pub fn platform(&self) -> Option<HostPlatform> {
        self.platform.or_else(HostPlatform::detect)
    }

    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_release_index_url(mut self, base_url: impl Into<String>) -> Self {
        self.release_index.base_url = base_url.into();
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.locking.timeout_secs)
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl ReleaseIndexConfig {
    /// Explicit token, else `GITHUB_TOKEN`, else `GH_TOKEN`.
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .or_else(|| env::var("GH_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }
}

fn config_error(error: config::ConfigError) -> ProvisionError {
    ProvisionError::ConfigError(error.to_string())
}

/// Load configuration for the current user.
///
/// `PROVISION_USER_ROOT` relocates the whole tree; otherwise the home
/// directory is used.
pub fn new_provision_config() -> Result<ProvisionConfig> {
    let user_root = match env::var(format!("{ENV_PREFIX}_USER_ROOT")) {
        Ok(root) if !root.trim().is_empty() => PathBuf::from(root),
        _ => dirs::home_dir().ok_or_else(|| {
            ProvisionError::ConfigError("Unable to determine the home directory".to_string())
        })?,
    };

    ProvisionConfig::load(&user_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HostArch, HostOs};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars.push((key.to_string(), env::var(key).ok()));
            unsafe {
                env::set_var(key, value);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.vars.iter().rev() {
                match value {
                    Some(v) => unsafe { env::set_var(key, v) },
                    None => unsafe { env::remove_var(key) },
                }
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = ProvisionConfig::new("/home/dev");
        assert_eq!(config.cache_root(), PathBuf::from("/home/dev/.pico-sdk"));
        assert_eq!(config.temp_root(), PathBuf::from("/home/dev/.pico-sdk/tmp"));
        assert_eq!(config.download.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(config.release_index.base_url, DEFAULT_RELEASE_INDEX_URL);
        assert_eq!(config.git.version, DEFAULT_GIT_VERSION);
        assert_eq!(config.lock_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_platform_override() {
        let platform = HostPlatform::new(HostOs::Windows, HostArch::X64);
        let config = ProvisionConfig::new("/home/dev").with_platform(platform);
        assert_eq!(config.platform(), Some(platform));
    }

    #[test]
    #[serial]
    fn test_load_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ProvisionConfig::load(temp_dir.path()).unwrap();

        assert_eq!(config.user_root, temp_dir.path());
        assert_eq!(config.download.timeout_secs, DEFAULT_DOWNLOAD_TIMEOUT_SECS);
        assert!(config.platform.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache_root = temp_dir.path().join(DEFAULT_CACHE_DIR_NAME);
        fs::create_dir_all(&cache_root).unwrap();
        fs::write(
            cache_root.join("config.toml"),
            r#"
[download]
max_redirects = 4

[release_index]
base_url = "http://localhost:9999"

[platform]
os = "windows"
arch = "x64"
"#,
        )
        .unwrap();

        let config = ProvisionConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.download.max_redirects, 4);
        assert_eq!(
            config.download.connect_timeout_secs,
            DEFAULT_CONNECT_TIMEOUT_SECS
        );
        assert_eq!(config.release_index.base_url, "http://localhost:9999");
        assert_eq!(
            config.platform,
            Some(HostPlatform::new(HostOs::Windows, HostArch::X64))
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides_nested_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("PROVISION_DOWNLOAD__MAX_REDIRECTS", "5");
        guard.set("PROVISION_LOCKING__TIMEOUT_SECS", "30");

        let config = ProvisionConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.download.max_redirects, 5);
        assert_eq!(config.locking.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_user_root_env_relocates_tree() {
        let temp_dir = TempDir::new().unwrap();
        let mut guard = EnvGuard::new();
        guard.set("PROVISION_USER_ROOT", &temp_dir.path().to_string_lossy());

        let config = new_provision_config().unwrap();
        assert_eq!(config.cache_root(), temp_dir.path().join(".pico-sdk"));
    }

    #[test]
    fn test_validate_rejects_nested_cache_dir() {
        let mut config = ProvisionConfig::new("/home/dev");
        config.cache_dir_name = "a/b".to_string();
        assert!(matches!(
            config.validate(),
            Err(ProvisionError::ConfigError(_))
        ));
    }
}
