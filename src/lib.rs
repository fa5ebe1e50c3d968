//! tg-sheets - saves Telegram bot messages to a Google Sheets spreadsheet.
//!
//! A single AWS Lambda receives Telegram webhook deliveries (API Gateway or
//! Function URL events), extracts the sender, chat id and text of each
//! message, and appends them with a UTC timestamp as one row of the
//! spreadsheet's first sheet.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (`lambda_runtime`) for serverless execution
//! - `google-cloud-auth` service-account credentials for API access
//! - the Sheets v4 REST API over `reqwest`
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use tg_sheets::api::handler::handle_webhook;
//! use tg_sheets::core::config::AppConfig;
//! use tg_sheets::sheets::GoogleSheetsAppender;
//!
//! #[tokio::main]
//! async fn main() {
//!     tg_sheets::setup_logging();
//!
//!     let config = AppConfig {
//!         spreadsheet_id: "dummy_spreadsheet".to_string(),
//!         credentials_path: "config/credentials.json".to_string(),
//!         telegram_secret_token: None,
//!         sheets_api_base: "https://sheets.googleapis.com/v4".to_string(),
//!     };
//!     let appender = GoogleSheetsAppender::new(&config);
//!
//!     let event = json!({
//!         "body": r#"{"message":{"text":"hello","from":{"username":"alice"},"chat":{"id":42}}}"#
//!     });
//!     let response = handle_webhook(&config, &appender, &event).await;
//!     assert_eq!(response["statusCode"], 200);
//! }
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod sheets;

pub use errors::SheetsError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. Safe to call more than once; later calls leave the first subscriber
/// in place.
///
/// # Example
///
/// ```
/// tg_sheets::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
