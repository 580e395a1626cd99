use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mctl_client::ClientSettings;
use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR: &str = "mctl";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "no API endpoint configured (hint: pass --endpoint, set MCTL_ENDPOINT, or add \"endpoint\" to {location})"
    )]
    MissingEndpoint { location: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    token: Option<String>,
}

/// Connection values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub config: Option<PathBuf>,
}

/// Resolve API connection settings: flags and environment first, then the
/// config file.
///
/// An explicit config path must be readable; the default location is only
/// consulted when it exists.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed, or no
/// endpoint is configured anywhere.
pub fn resolve_client_settings(overrides: Overrides) -> Result<ClientSettings, ConfigError> {
    let (path, explicit) = match overrides.config {
        Some(path) => (Some(path), true),
        None => (default_config_path(), false),
    };
    let file = match &path {
        Some(path) => load_file_settings(path, explicit)?,
        None => FileSettings::default(),
    };

    let endpoint = non_blank(overrides.endpoint)
        .or_else(|| non_blank(file.endpoint))
        .ok_or_else(|| ConfigError::MissingEndpoint {
            location: path.as_deref().map_or_else(
                || format!("{CONFIG_DIR}/{CONFIG_FILE}"),
                |path| path.display().to_string(),
            ),
        })?;

    Ok(ClientSettings {
        endpoint,
        token: non_blank(overrides.token).or_else(|| non_blank(file.token)),
    })
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn load_file_settings(path: &Path, explicit: bool) -> Result<FileSettings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) if !explicit && source.kind() == io::ErrorKind::NotFound => {
            return Ok(FileSettings::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(FileSettings::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::{ConfigError, Overrides, resolve_client_settings};

    fn config_file(temp: &TempDir, content: &str) -> PathBuf {
        let path = temp.path().join("config.yaml");
        fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn reads_endpoint_and_token_from_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = config_file(
            &temp,
            "endpoint: https://api.example.com/v1\ntoken: from-file\n",
        );

        let settings = resolve_client_settings(Overrides {
            config: Some(path),
            ..Overrides::default()
        })
        .expect("resolve settings");

        assert_eq!(settings.endpoint, "https://api.example.com/v1");
        assert_eq!(settings.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn overrides_win_over_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = config_file(&temp, "endpoint: https://file.example.com\ntoken: file\n");

        let settings = resolve_client_settings(Overrides {
            endpoint: Some("https://flag.example.com".to_string()),
            token: Some("flag".to_string()),
            config: Some(path),
        })
        .expect("resolve settings");

        assert_eq!(settings.endpoint, "https://flag.example.com");
        assert_eq!(settings.token.as_deref(), Some("flag"));
    }

    #[test]
    fn blank_override_falls_back_to_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = config_file(&temp, "endpoint: https://file.example.com\n");

        let settings = resolve_client_settings(Overrides {
            endpoint: Some("  ".to_string()),
            token: None,
            config: Some(path),
        })
        .expect("resolve settings");

        assert_eq!(settings.endpoint, "https://file.example.com");
        assert_eq!(settings.token, None);
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let temp = TempDir::new().expect("tempdir");
        let path = config_file(&temp, "");

        let error = resolve_client_settings(Overrides {
            config: Some(path),
            ..Overrides::default()
        })
        .expect_err("no endpoint anywhere");

        assert!(matches!(error, ConfigError::MissingEndpoint { .. }));
        assert!(error.to_string().contains("--endpoint"));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let temp = TempDir::new().expect("tempdir");

        let error = resolve_client_settings(Overrides {
            endpoint: Some("https://api.example.com".to_string()),
            token: None,
            config: Some(temp.path().join("absent.yaml")),
        })
        .expect_err("explicit config must be readable");

        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_unknown_config_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = config_file(&temp, "endpoint: https://api.example.com\nretries: 3\n");

        let error = resolve_client_settings(Overrides {
            config: Some(path),
            ..Overrides::default()
        })
        .expect_err("unknown keys are rejected");

        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
