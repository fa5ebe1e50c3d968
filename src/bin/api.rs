use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tg_sheets::api::handler;
use tg_sheets::core::config::AppConfig;
use tg_sheets::sheets::GoogleSheetsAppender;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tg_sheets::setup_logging();

    // Missing SPREADSHEET_ID aborts the cold start.
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let appender = GoogleSheetsAppender::new(&config);

    let config = &config;
    let appender = &appender;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(config, appender, event).await
    }))
    .await
}
