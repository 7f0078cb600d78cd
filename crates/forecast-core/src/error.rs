//! Error types for forecast-core
//!
//! Configuration problems and arithmetic invariant violations are both hard
//! errors. Projects outside the planning window and missing holiday data are
//! not errors at all and never show up here.

use crate::models::MonthKey;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for forecast operations
#[derive(Error, Debug)]
pub enum ForecastError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse YAML in {path}: {message}")]
    YamlParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===================
    // Validation Errors
    // ===================
    #[error("Weights for {month} exceed 100%: {total}")]
    WeightsExceeded { month: MonthKey, total: f64 },
}

/// Coarse classification used by the CLI and web layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the config file failed
    Io,
    /// Malformed or out-of-domain input
    Configuration,
    /// Arithmetic invariant violated while computing
    Validation,
}

impl ForecastError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::FileRead { .. } | ForecastError::FileNotFound { .. } => ErrorKind::Io,
            ForecastError::YamlParse { .. } | ForecastError::InvalidConfig { .. } => {
                ErrorKind::Configuration
            }
            ForecastError::WeightsExceeded { .. } => ErrorKind::Validation,
        }
    }

    /// Actionable hint for the user, if one applies
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ForecastError::FileNotFound { path } => {
                Some(format!("Check if file exists: ls {}", path.display()))
            }
            ForecastError::FileRead { path, .. } => {
                Some(format!("Check permissions: chmod +r {}", path.display()))
            }
            ForecastError::WeightsExceeded { month, .. } => Some(format!(
                "Lower weights_by_month[\"{}\"] so the projects active that month sum to at most 100",
                month
            )),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let month = MonthKey::new(2025, 3).unwrap();
        assert_eq!(
            ForecastError::WeightsExceeded {
                month,
                total: 120.0
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ForecastError::invalid_config("round_hours must be > 0").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ForecastError::FileNotFound {
                path: PathBuf::from("config.yml")
            }
            .kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn test_weights_message_names_month() {
        let err = ForecastError::WeightsExceeded {
            month: MonthKey::new(2024, 9).unwrap(),
            total: 110.0,
        };
        assert_eq!(err.to_string(), "Weights for 2024-09 exceed 100%: 110");
        assert!(err.suggestion().unwrap().contains("2024-09"));
    }
}
