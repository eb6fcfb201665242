use serde::Serialize;
use thiserror::Error;

use crate::entities::MappingError;

#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config directory is unavailable")]
    ConfigDirUnavailable,
    #[error("Instance is not configured. Run `dee-mastodon config set instance <url>`")]
    ConfigMissing,
    #[error("Access token is missing. Run `dee-mastodon config set access_token <token>`")]
    AuthMissing,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Network request failed: {0}")]
    RequestFailed(String),
    #[error("Access token was rejected: {0}")]
    Unauthorized(String),
    #[error("Mastodon API error: {0}")]
    ApiError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to parse API response")]
    ParseFailed,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigDirUnavailable | Self::ConfigMissing => "CONFIG_MISSING",
            Self::AuthMissing => "AUTH_MISSING",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::RequestFailed(_) => "REQUEST_FAILED",
            Self::Unauthorized(_) => "AUTH_FAILED",
            Self::ApiError(_) => "API_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ParseFailed => "PARSE_FAILED",
        }
    }
}

pub fn classify_error_code(err: &anyhow::Error) -> &'static str {
    if let Some(app) = err.downcast_ref::<AppError>() {
        return app.code();
    }
    if err.downcast_ref::<MappingError>().is_some() {
        return "MAPPING_FAILED";
    }
    "INTERNAL_ERROR"
}

#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub ok: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessItem<T: Serialize> {
    pub ok: bool,
    pub item: T,
}

#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub ok: bool,
    pub message: String,
}
