//! Parser for forecast YAML config files

use crate::error::{ForecastError, Result};
use crate::models::{DateInterval, ForecastConfig};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Label used for in-memory sources in error messages
const INLINE_SOURCE: &str = "<inline>";

/// Parser for forecast config files
pub struct ConfigParser;

impl ConfigParser {
    /// Read, parse and validate a config file
    pub fn parse_file(path: &Path) -> Result<ForecastConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ForecastError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ForecastError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let config = Self::parse_with_source(&content, path)?;
        debug!(?path, projects = config.projects.len(), "Loaded config");
        Ok(config)
    }

    /// Parse and validate YAML held in memory
    pub fn parse_str(content: &str) -> Result<ForecastConfig> {
        Self::parse_with_source(content, Path::new(INLINE_SOURCE))
    }

    fn parse_with_source(content: &str, source: &Path) -> Result<ForecastConfig> {
        let config: ForecastConfig =
            serde_yaml::from_str(content).map_err(|e| ForecastError::YamlParse {
                path: source.to_path_buf(),
                message: e.to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }
}

/// Command-line overrides applied on top of a loaded config
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub planning_start: Option<NaiveDate>,
    pub planning_end: Option<NaiveDate>,
    pub round_hours: Option<f64>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.planning_start.is_none() && self.planning_end.is_none() && self.round_hours.is_none()
    }

    /// Apply the overrides and re-validate the result
    pub fn apply(&self, mut config: ForecastConfig) -> Result<ForecastConfig> {
        if self.is_empty() {
            return Ok(config);
        }

        let period = config.settings.planning_period;
        config.settings.planning_period = DateInterval {
            start: self.planning_start.unwrap_or(period.start),
            end: self.planning_end.unwrap_or(period.end),
        };
        if let Some(round_hours) = self.round_hours {
            config.settings.round_hours = round_hours;
        }

        config.validate()?;
        Ok(config)
    }
}
