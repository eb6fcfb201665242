use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::models::AppError;

pub const ENV_INSTANCE: &str = "DEE_MASTODON_INSTANCE";
pub const ENV_TOKEN: &str = "DEE_MASTODON_TOKEN";

/// Stored in ~/.config/dee-mastodon/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub instance: String,
    pub access_token: String,
}

impl AppConfig {
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        match key {
            "instance" => {
                self.instance = Some(normalize_instance(value)?);
            }
            "access_token" => {
                let token = value.trim();
                if token.is_empty() {
                    return Err(AppError::InvalidArgument(
                        "access_token cannot be empty".to_string(),
                    ));
                }
                self.access_token = Some(token.to_string());
            }
            other => {
                return Err(AppError::InvalidArgument(format!(
                    "unknown config key `{other}` (expected instance or access_token)"
                )));
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(AppError::ConfigDirUnavailable)?;
    Ok(dir.join("dee-mastodon").join("config.toml"))
}

pub fn load_config_or_default() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &AppConfig) -> Result<()> {
    let path = config_path()?;
    ensure_parent_dir(&path)?;
    let raw = toml::to_string(cfg)?;
    fs::write(&path, raw)
        .with_context(|| format!("failed writing config file {}", path.display()))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = path.parent().ok_or(AppError::ConfigDirUnavailable)?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed creating config directory {}", parent.display()))?;
    Ok(())
}

/// The config file with any environment overrides applied.
pub fn effective_config() -> Result<AppConfig> {
    let cfg = load_config_or_default()?;
    Ok(AppConfig {
        instance: env_value(ENV_INSTANCE).or(cfg.instance),
        access_token: env_value(ENV_TOKEN).or(cfg.access_token),
    })
}

/// Environment variables win over the config file.
pub fn require_credentials() -> Result<Credentials> {
    let env_instance = env_value(ENV_INSTANCE);
    let env_token = env_value(ENV_TOKEN);

    let cfg = if env_instance.is_some() && env_token.is_some() {
        AppConfig::default()
    } else {
        load_config_or_default()?
    };

    let instance = env_instance
        .or(cfg.instance)
        .ok_or(AppError::ConfigMissing)?;
    let instance = normalize_instance(&instance)?;

    let access_token = env_token
        .or(cfg.access_token)
        .filter(|token| !token.trim().is_empty())
        .ok_or(AppError::AuthMissing)?;

    Ok(Credentials {
        instance,
        access_token,
    })
}

/// Accepts `mastodon.social` or a full URL; returns the base URL without a trailing slash.
pub fn normalize_instance(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(
            "instance cannot be empty".to_string(),
        ));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|_| AppError::InvalidArgument(format!("invalid instance url `{raw}`")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::InvalidArgument(format!(
            "instance url must be http(s): `{raw}`"
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
