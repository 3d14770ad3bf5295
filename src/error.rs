use crate::payments::error::ValidationError;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub type GopayResult<T> = Result<T, GopayError>;

/// One entry of the gateway's `errors` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayErrorDetail {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    pub error_code: u32,
    #[serde(default)]
    pub error_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl fmt::Display for GatewayErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: {}",
            self.error_code,
            self.error_name.as_deref().unwrap_or("UNKNOWN"),
            self.message.as_deref().unwrap_or("no message")
        )?;
        if let Some(field) = &self.field {
            write!(f, " [{}]", field)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum GopayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Gateway rejected the request (HTTP {status}): {}", format_details(.errors))]
    Gateway {
        status: u16,
        errors: Vec<GatewayErrorDetail>,
    },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Invalid token. Please do authorization.")]
    MissingToken,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl GopayError {
    pub fn gateway(status: u16, errors: Vec<GatewayErrorDetail>) -> Self {
        Self::Gateway { status, errors }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// First gateway error code, if the gateway reported any
    pub fn error_code(&self) -> Option<u32> {
        match self {
            GopayError::Gateway { errors, .. } => errors.first().map(|e| e.error_code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GopayError {
    fn from(err: serde_json::Error) -> Self {
        GopayError::serialization(format!("JSON error: {}", err))
    }
}

fn format_details(errors: &[GatewayErrorDetail]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
