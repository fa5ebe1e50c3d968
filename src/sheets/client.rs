//! Google Sheets v4 REST client
//!
//! Covers the two calls the appender needs: spreadsheet metadata and
//! `values.append`.

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::errors::SheetsError;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Characters left unescaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Default, Deserialize)]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetEntry {
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetProperties {
    #[serde(default)]
    pub title: Option<String>,
}

impl SpreadsheetMetadata {
    /// Title of the first sheet, if the spreadsheet reports one.
    #[must_use]
    pub fn first_sheet_title(&self) -> Option<&str> {
        self.sheets
            .first()
            .and_then(|s| s.properties.as_ref())
            .and_then(|p| p.title.as_deref())
    }
}

/// The spreadsheet operations the appender depends on.
#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    async fn get_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, SheetsError>;

    /// Appends `values` below the table found in `range`, stored verbatim
    /// (`valueInputOption=RAW`). Returns the raw API response.
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<Value, SheetsError>;
}

/// # Errors
///
/// Returns `HttpError` if the TLS backend cannot be initialised.
pub fn build_http_client() -> Result<Client, SheetsError> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| SheetsError::HttpError(format!("Failed to build HTTP client: {e}")))
}

/// Sheets API client bound to one set of authorization headers.
pub struct SheetsClient {
    http: Client,
    api_base: String,
    auth_headers: HeaderMap,
}

impl SheetsClient {
    #[must_use]
    pub fn new(http: Client, auth_headers: HeaderMap, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth_headers,
        }
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.api_base,
            utf8_percent_encode(spreadsheet_id, PATH_SEGMENT)
        )
    }

    #[must_use]
    pub fn append_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}:append",
            self.spreadsheet_url(spreadsheet_id),
            utf8_percent_encode(range, PATH_SEGMENT)
        )
    }
}

async fn error_body(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_else(|e| {
        format!("Failed to read error response body (status {status}): {e}")
    });
    format!("status {status}: {text}")
}

#[async_trait]
impl SpreadsheetApi for SheetsClient {
    async fn get_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, SheetsError> {
        let response = self
            .http
            .get(self.spreadsheet_url(spreadsheet_id))
            .headers(self.auth_headers.clone())
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetsError::ApiError(format!(
                "spreadsheets.get {}",
                error_body(response).await
            )));
        }

        response
            .json::<SpreadsheetMetadata>()
            .await
            .map_err(|e| SheetsError::ApiError(format!("invalid spreadsheet metadata: {e}")))
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<Value, SheetsError> {
        let response = self
            .http
            .post(self.append_url(spreadsheet_id, range))
            .headers(self.auth_headers.clone())
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(|e| SheetsError::AppendError(format!("values.append request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SheetsError::AppendError(format!(
                "values.append {}",
                error_body(response).await
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SheetsError::AppendError(format!("invalid append response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    fn client_for(server: &MockServer) -> SheetsClient {
        SheetsClient::new(Client::new(), bearer("tok"), &server.uri())
    }

    #[test]
    fn test_append_url_escapes_range() {
        let client = SheetsClient::new(Client::new(), bearer("tok"), "https://x/v4/");
        assert_eq!(
            client.append_url("abc-123", "'My Sheet'!A:D"),
            "https://x/v4/spreadsheets/abc-123/values/%27My%20Sheet%27%21A%3AD:append"
        );
    }

    #[test]
    fn test_first_sheet_title() {
        let meta: SpreadsheetMetadata = serde_json::from_value(json!({
            "sheets": [
                {"properties": {"title": "Contacts"}},
                {"properties": {"title": "Other"}}
            ]
        }))
        .unwrap();
        assert_eq!(meta.first_sheet_title(), Some("Contacts"));

        let meta: SpreadsheetMetadata = serde_json::from_value(json!({})).unwrap();
        assert_eq!(meta.first_sheet_title(), None);

        let meta: SpreadsheetMetadata =
            serde_json::from_value(json!({"sheets": [{"properties": {}}]})).unwrap();
        assert_eq!(meta.first_sheet_title(), None);
    }

    #[tokio::test]
    async fn test_get_metadata_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/sheet-1"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("fields", "sheets.properties.title"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sheets": [{"properties": {"title": "Leads"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let meta = client_for(&server).get_metadata("sheet-1").await.unwrap();
        assert_eq!(meta.first_sheet_title(), Some("Leads"));
    }

    #[tokio::test]
    async fn test_get_metadata_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_metadata("sheet-1").await.unwrap_err();
        match err {
            SheetsError::ApiError(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("forbidden"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_append_values_raw_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/spreadsheets/sheet-1/values/%27Sheet1%27%21A%3AD:append"))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_json(json!({"values": [["a", "b", "c", "d"]]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spreadsheetId": "sheet-1",
                "updates": {"updatedRows": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let row: Vec<String> = vec!["a", "b", "c", "d"].into_iter().map(String::from).collect();
        let resp = client_for(&server)
            .append_values("sheet-1", "'Sheet1'!A:D", vec![row])
            .await
            .unwrap();
        assert_eq!(resp["updates"]["updatedRows"], 1);
    }

    #[tokio::test]
    async fn test_append_values_error_is_append_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Unable to parse range"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .append_values("sheet-1", "'Nope'!A:D", vec![vec!["x".to_string()]])
            .await
            .unwrap_err();
        match err {
            SheetsError::AppendError(msg) => assert!(msg.contains("Unable to parse range")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
