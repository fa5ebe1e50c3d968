//! Row appender: authenticate, resolve the destination sheet, append one row.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::client::{SheetsClient, SpreadsheetApi, build_http_client};
use super::credentials::{auth_headers, load_key, service_account_credentials};
use crate::core::config::AppConfig;
use crate::errors::SheetsError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_SHEET_TITLE: &str = "Sheet1";
pub const APPEND_COLUMNS: &str = "A:D";

/// Destination for webhook rows.
#[async_trait]
pub trait RowAppender: Send + Sync {
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        row: Vec<String>,
    ) -> Result<Value, SheetsError>;
}

/// Builds `'<title>'!A:D`, doubling any single quote inside the title.
#[must_use]
pub fn build_range(title: &str) -> String {
    format!("'{}'!{APPEND_COLUMNS}", title.replace('\'', "''"))
}

/// Best-effort lookup of the first sheet's title. Never fails: any error,
/// an empty sheet list or a missing title yields `Sheet1`.
pub async fn resolve_sheet_title<A>(api: &A, spreadsheet_id: &str) -> String
where
    A: SpreadsheetApi + ?Sized,
{
    match api.get_metadata(spreadsheet_id).await {
        Ok(meta) => meta
            .first_sheet_title()
            .map_or_else(|| DEFAULT_SHEET_TITLE.to_string(), ToString::to_string),
        Err(e) => {
            warn!(error = %e, "Failed to fetch spreadsheet metadata, using {}", DEFAULT_SHEET_TITLE);
            DEFAULT_SHEET_TITLE.to_string()
        }
    }
}

/// Appends `row` to the first sheet of `spreadsheet_id` through `api`.
///
/// # Errors
///
/// Returns the append failure unchanged; metadata failures are absorbed by
/// [`resolve_sheet_title`].
pub async fn append_row_with<A>(
    api: &A,
    spreadsheet_id: &str,
    row: Vec<String>,
) -> Result<Value, SheetsError>
where
    A: SpreadsheetApi + ?Sized,
{
    let title = resolve_sheet_title(api, spreadsheet_id).await;
    let range = build_range(&title);

    match api
        .append_values(spreadsheet_id, &range, vec![row.clone()])
        .await
    {
        Ok(result) => {
            info!(range = %range, row = ?row, "Appended row to {}", range);
            Ok(result)
        }
        Err(e) => {
            error!(range = %range, spreadsheet_id = %spreadsheet_id, "Failed to append row to Google Sheets: {}", e);
            Err(e)
        }
    }
}

/// Appender backed by the live Sheets API. Credentials, headers and HTTP
/// client are rebuilt on every call.
#[derive(Debug, Clone)]
pub struct GoogleSheetsAppender {
    credentials_path: PathBuf,
    api_base: String,
}

impl GoogleSheetsAppender {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            credentials_path: PathBuf::from(&config.credentials_path),
            api_base: config.sheets_api_base.clone(),
        }
    }
}

#[async_trait]
impl RowAppender for GoogleSheetsAppender {
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        row: Vec<String>,
    ) -> Result<Value, SheetsError> {
        let key = load_key(&self.credentials_path)?;
        let credentials = service_account_credentials(key, SHEETS_SCOPE)?;
        let headers = auth_headers(&credentials).await?;
        let client = SheetsClient::new(build_http_client()?, headers, &self.api_base);

        append_row_with(&client, spreadsheet_id, row).await
    }
}
