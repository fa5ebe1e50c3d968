use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Failed to parse webhook payload: {0}")]
    ParseError(String),

    #[error("Failed to load service account credentials: {0}")]
    CredentialError(String),

    #[error("Failed to obtain access token: {0}")]
    AuthError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to access Google Sheets API: {0}")]
    ApiError(String),

    #[error("Failed to append row: {0}")]
    AppendError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for SheetsError {
    fn from(error: reqwest::Error) -> Self {
        SheetsError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for SheetsError {
    fn from(error: serde_json::Error) -> Self {
        SheetsError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for SheetsError {
    fn from(error: anyhow::Error) -> Self {
        SheetsError::ApiError(error.to_string())
    }
}
