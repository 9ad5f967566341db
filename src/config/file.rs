//! Settings files
//!
//! `.json` and `.bindsmith` files hold camelCase JSON, `.yaml`/`.yml` hold
//! YAML and `.toml` holds TOML. Relative paths inside a settings file are
//! resolved against the directory containing it.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::GeneratorSettings;

/// File extension of settings files discovered by batch runs
pub const SETTINGS_EXTENSION: &str = "bindsmith";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON settings in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML settings in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported settings file format: {0}")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    Json,
    Yaml,
    Toml,
}

impl SettingsFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" | SETTINGS_EXTENSION => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Read and deserialize a settings file
pub async fn load_settings_file(path: &Path) -> Result<GeneratorSettings, ConfigError> {
    let format = SettingsFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut settings = parse_settings(path, format, &content)?;
    if let Some(base) = path.parent() {
        resolve_relative_paths(&mut settings, base);
    }

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn parse_settings(
    path: &Path,
    format: SettingsFormat,
    content: &str,
) -> Result<GeneratorSettings, ConfigError> {
    match format {
        SettingsFormat::Json => serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        SettingsFormat::Yaml => serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        SettingsFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn resolve_relative_paths(settings: &mut GeneratorSettings, base: &Path) {
    if let Some(openapi_path) = &settings.openapi_path {
        let is_url = openapi_path.starts_with("http://") || openapi_path.starts_with("https://");
        if !is_url && Path::new(openapi_path).is_relative() {
            settings.openapi_path = Some(base.join(openapi_path).to_string_lossy().into_owned());
        }
    }

    if settings.output_folder.is_relative() {
        settings.output_folder = base.join(&settings.output_folder);
    }
    if let Some(folder) = settings.contracts_output_folder.as_mut() {
        if folder.is_relative() {
            *folder = base.join(&*folder);
        }
    }
}
