//! Configuration loading for the survey service
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Storage credentials are environment-only and are never read from the
//! config file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP bind address for the survey service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// Default audio catalog root, relative to the working directory
pub const DEFAULT_AUDIO_ROOT: &str = "audio";

const DEFAULT_STORAGE_ENDPOINT: &str = "https://s3.amazonaws.com";
const DEFAULT_STORAGE_REGION: &str = "us-east-1";
const DEFAULT_STORAGE_BUCKET: &str = "listening-test-results";
const DEFAULT_STORAGE_KEY_PREFIX: &str = "dev";

/// Environment variable names
const ENV_BIND_ADDR: &str = "DPE_BIND";
const ENV_AUDIO_ROOT: &str = "DPE_AUDIO_ROOT";
const ENV_STORAGE_ENDPOINT: &str = "DPE_STORAGE_ENDPOINT";
const ENV_STORAGE_REGION: &str = "AWS_REGION";
const ENV_STORAGE_BUCKET: &str = "BUCKET";
const ENV_STORAGE_KEY_PREFIX: &str = "DPE_KEY_PREFIX";
const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
const ENV_SECRET_KEY: &str = "AWS_SECRET_KEY";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Root of the audio catalog directory tree
    pub audio_root: PathBuf,
    /// Object storage target for submission records
    pub storage: StorageConfig,
}

/// Object storage target and credentials
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base endpoint URL of the S3-compatible service
    pub endpoint: String,
    /// Signing region
    pub region: String,
    /// Target bucket name
    pub bucket: String,
    /// Key prefix for submission records (e.g. "dev")
    pub key_prefix: String,
    /// Access key id (environment-only)
    pub access_key: String,
    /// Secret key (environment-only)
    pub secret_key: String,
}

/// Optional values a config.toml file may provide
///
/// Every field is optional; missing entries fall through to the next
/// resolution tier.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub audio_root: Option<PathBuf>,
    #[serde(default)]
    pub storage: TomlStorageConfig,
}

/// Storage section of config.toml (credentials intentionally absent)
#[derive(Debug, Default, Deserialize)]
pub struct TomlStorageConfig {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub key_prefix: Option<String>,
}

/// Load and resolve the full service configuration
///
/// `cli_bind` / `cli_audio_root` are the command-line overrides; `cli_config`
/// points at an explicit config file, otherwise the platform config
/// directory is consulted.
pub fn load(
    cli_bind: Option<&str>,
    cli_audio_root: Option<&Path>,
    cli_config: Option<&Path>,
) -> Result<SurveyConfig> {
    let toml_config = match config_file_path(cli_config) {
        Some(path) if path.exists() => {
            tracing::info!("Loading config file: {}", path.display());
            read_config_file(&path)?
        }
        Some(_) | None => TomlConfig::default(),
    };

    let bind_addr = cli_bind
        .map(str::to_string)
        .or_else(|| env_var(ENV_BIND_ADDR))
        .or(toml_config.bind_addr)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

    let audio_root = cli_audio_root
        .map(Path::to_path_buf)
        .or_else(|| env_var(ENV_AUDIO_ROOT).map(PathBuf::from))
        .or(toml_config.audio_root)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIO_ROOT));

    let storage = resolve_storage(toml_config.storage)?;

    Ok(SurveyConfig {
        bind_addr,
        audio_root,
        storage,
    })
}

/// Resolve the storage section: env > TOML > default, credentials env-only
fn resolve_storage(toml: TomlStorageConfig) -> Result<StorageConfig> {
    let access_key = env_var(ENV_ACCESS_KEY)
        .ok_or_else(|| Error::Config(format!("{} not set", ENV_ACCESS_KEY)))?;
    let secret_key = env_var(ENV_SECRET_KEY)
        .ok_or_else(|| Error::Config(format!("{} not set", ENV_SECRET_KEY)))?;

    Ok(StorageConfig {
        endpoint: env_var(ENV_STORAGE_ENDPOINT)
            .or(toml.endpoint)
            .unwrap_or_else(|| DEFAULT_STORAGE_ENDPOINT.to_string()),
        region: env_var(ENV_STORAGE_REGION)
            .or(toml.region)
            .unwrap_or_else(|| DEFAULT_STORAGE_REGION.to_string()),
        bucket: env_var(ENV_STORAGE_BUCKET)
            .or(toml.bucket)
            .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
        key_prefix: env_var(ENV_STORAGE_KEY_PREFIX)
            .or(toml.key_prefix)
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY_PREFIX.to_string()),
        access_key,
        secret_key,
    })
}

/// Parse a TOML config file
pub fn read_config_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Determine the config file location: explicit CLI path, else the
/// platform config directory (`~/.config/dpe/config.toml` on Linux)
fn config_file_path(cli_config: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path.to_path_buf());
    }
    dirs::config_dir().map(|d| d.join("dpe").join("config.toml"))
}

/// Read an environment variable, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_config_file_full() {
        let file = write_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            audio_root = "/srv/audio"

            [storage]
            endpoint = "https://storage.example.com"
            region = "eu-central-1"
            bucket = "survey-results"
            key_prefix = "prod"
            "#,
        );

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.bind_addr.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(config.audio_root, Some(PathBuf::from("/srv/audio")));
        assert_eq!(config.storage.region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.storage.bucket.as_deref(), Some("survey-results"));
    }

    #[test]
    fn test_read_config_file_partial() {
        let file = write_toml(r#"bind_addr = "127.0.0.1:9000""#);

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.bind_addr.as_deref(), Some("127.0.0.1:9000"));
        assert!(config.audio_root.is_none());
        assert!(config.storage.bucket.is_none());
    }

    #[test]
    fn test_read_config_file_invalid() {
        let file = write_toml("bind_addr = [not toml");

        let result = read_config_file(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_file_path_cli_override() {
        let explicit = PathBuf::from("/etc/dpe/custom.toml");
        let resolved = config_file_path(Some(&explicit)).unwrap();
        assert_eq!(resolved, explicit);
    }
}
