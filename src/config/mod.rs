use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::{
    validate_aws_region, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment-driven configuration. The CLI takes no flags; everything
/// comes from the environment, matching the deployed form handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    pub region: String,
    pub dynamodb_endpoint: Option<String>,
    pub sqlite_path: String,
    pub batch_timeout_secs: Option<u64>,
    pub verbose: bool,
}

impl MigrateConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: env::var("REGION").unwrap_or_else(|_| "us-west-2".to_string()),
            dynamodb_endpoint: env::var("DYNAMODB_ENDPOINT").ok(),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "./contacts.db".to_string()),
            batch_timeout_secs: match env::var("BATCH_TIMEOUT_SECS") {
                Ok(raw) => Some(raw.parse().map_err(|_| MigrateError::InvalidConfigValue {
                    field: "BATCH_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: "must be a whole number of seconds".to_string(),
                })?),
                Err(_) => None,
            },
            verbose: env::var("VERBOSE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

impl Validate for MigrateConfig {
    fn validate(&self) -> Result<()> {
        validate_path("sqlite_path", &self.sqlite_path)?;
        validate_aws_region("region", &self.region)?;

        if let Some(endpoint) = &self.dynamodb_endpoint {
            validate_non_empty_string("dynamodb_endpoint", endpoint)?;
        }

        if let Some(secs) = self.batch_timeout_secs {
            validate_positive_number("batch_timeout_secs", secs, 1)?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
