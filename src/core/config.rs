use std::env;

use crate::errors::SheetsError;

pub const DEFAULT_CREDENTIALS_PATH: &str = "config/credentials.json";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    pub credentials_path: String,
    pub telegram_secret_token: Option<String>,
    pub sheets_api_base: String,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`SheetsError::ConfigError`] when `SPREADSHEET_ID` is unset or blank.
    pub fn from_env() -> Result<Self, SheetsError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Builds the config from an arbitrary variable source, so tests can
    /// inject values without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SheetsError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let spreadsheet_id = lookup("SPREADSHEET_ID")
            .map_err(|e| SheetsError::ConfigError(format!("SPREADSHEET_ID: {}", e)))?;
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::ConfigError(
                "SPREADSHEET_ID: value is empty".to_string(),
            ));
        }

        Ok(Self {
            spreadsheet_id,
            credentials_path: lookup("CREDENTIALS_PATH")
                .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string()),
            telegram_secret_token: lookup("TELEGRAM_SECRET_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            sheets_api_base: lookup("SHEETS_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_SHEETS_API_BASE.to_string()),
        })
    }
}
