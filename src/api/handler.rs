//! Webhook Lambda handler.
//!
//! Parses the Telegram update carried in the HTTP event body and appends
//! `[username, chat_id, text, timestamp]` to the spreadsheet when the message
//! has text. Every outcome, including failures, is answered with a 200 so
//! Telegram never retries a delivery.

use chrono::{DateTime, SecondsFormat, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing};
use crate::core::config::AppConfig;
use crate::core::models::SheetRow;
use crate::errors::SheetsError;
use crate::sheets::RowAppender;

pub use self::function_handler as handler;

/// What happened to a successfully processed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Appended(SheetRow),
    /// The update carried no text, so nothing was written.
    Skipped,
}

/// Lambda handler for the webhook entrypoint.
///
/// # Errors
///
/// Never fails for per-request problems; those are reported in the response
/// body instead.
#[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler<A>(
    config: &AppConfig,
    appender: &A,
    event: LambdaEvent<Value>,
) -> Result<Value, Error>
where
    A: RowAppender + ?Sized,
{
    #[cfg(feature = "debug-logs")]
    info!("Webhook Lambda received request: {:?}", event.payload);

    #[cfg(not(feature = "debug-logs"))]
    info!("Webhook Lambda received request");

    Ok(handle_webhook(config, appender, &event.payload).await)
}

/// Processes one HTTP event and builds the response. Infallible.
pub async fn handle_webhook<A>(config: &AppConfig, appender: &A, payload: &Value) -> Value
where
    A: RowAppender + ?Sized,
{
    match process_update(config, appender, payload, Utc::now()).await {
        Ok(WebhookOutcome::Appended(row)) => {
            info!(chat_id = %row.chat_id, username = %row.username, "Message saved");
            helpers::ok_response()
        }
        Ok(WebhookOutcome::Skipped) => {
            info!("Update has no text, nothing to save");
            helpers::ok_response()
        }
        Err(e) => {
            error!("Error processing message: {}", e);
            helpers::error_response(&e.to_string())
        }
    }
}

/// Extracts the row from `payload` and hands it to `appender` when the
/// message text is non-empty.
///
/// # Errors
///
/// Returns parse errors for malformed events and whatever the appender
/// returns on failure.
pub async fn process_update<A>(
    config: &AppConfig,
    appender: &A,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<WebhookOutcome, SheetsError>
where
    A: RowAppender + ?Sized,
{
    if let Some(secret) = &config.telegram_secret_token {
        parsing::verify_secret_token(payload, secret)?;
    }

    let body = parsing::extract_body(payload)?;
    let update = parsing::parse_update(&body)?;
    let message = &update.message;

    if message.text().is_empty() {
        return Ok(WebhookOutcome::Skipped);
    }

    let row = SheetRow::from_message(message, format_timestamp(now));
    appender
        .append_row(&config.spreadsheet_id, row.clone().into_values())
        .await?;

    Ok(WebhookOutcome::Appended(row))
}

/// ISO-8601 UTC timestamp with microsecond precision, e.g.
/// `2024-05-01T12:30:45.123456Z`.
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
        assert_eq!(format_timestamp(now), "2024-05-01T12:30:45.000000Z");
    }
}
