use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::core::models::TelegramUpdate;
use crate::errors::SheetsError;

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Pulls the request body out of a Lambda HTTP event, decoding it when the
/// event is flagged `isBase64Encoded`.
pub fn extract_body(payload: &Value) -> Result<String, SheetsError> {
    let Some(body) = payload.get("body") else {
        return Err(SheetsError::ParseError("Missing body".to_string()));
    };

    let Some(body_str) = body.as_str() else {
        return Err(SheetsError::ParseError("Invalid body format".to_string()));
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !is_base64 {
        return Ok(body_str.to_string());
    }

    let bytes = STANDARD
        .decode(body_str)
        .map_err(|e| SheetsError::ParseError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| SheetsError::ParseError(format!("Body is not UTF-8: {e}")))
}

pub fn parse_update(body: &str) -> Result<TelegramUpdate, SheetsError> {
    serde_json::from_str(body)
        .map_err(|e| SheetsError::ParseError(format!("Invalid JSON body: {e}")))
}

/// Checks the secret token Telegram echoes back from `setWebhook`.
pub fn verify_secret_token(payload: &Value, expected: &str) -> Result<(), SheetsError> {
    let received = payload
        .get("headers")
        .and_then(|h| get_header_value(h, SECRET_TOKEN_HEADER));

    match received {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(SheetsError::ParseError("Invalid secret token".to_string())),
        None => Err(SheetsError::ParseError(format!(
            "Missing {SECRET_TOKEN_HEADER} header"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_header_value_case_insensitive() {
        let headers = json!({"x-telegram-bot-api-secret-token": "abc"});
        assert_eq!(get_header_value(&headers, SECRET_TOKEN_HEADER), Some("abc"));
        assert_eq!(get_header_value(&headers, "content-type"), None);
    }

    #[test]
    fn test_extract_body_plain() {
        let payload = json!({"body": "{\"message\":{}}"});
        assert_eq!(extract_body(&payload).unwrap(), "{\"message\":{}}");
    }

    #[test]
    fn test_extract_body_base64() {
        let payload = json!({
            "body": STANDARD.encode("{\"message\":{\"text\":\"hi\"}}"),
            "isBase64Encoded": true
        });
        let body = extract_body(&payload).unwrap();
        assert_eq!(parse_update(&body).unwrap().message.text(), "hi");
    }

    #[test]
    fn test_extract_body_missing_or_wrong_type() {
        assert!(matches!(
            extract_body(&json!({})),
            Err(SheetsError::ParseError(msg)) if msg == "Missing body"
        ));
        assert!(matches!(
            extract_body(&json!({"body": null})),
            Err(SheetsError::ParseError(msg)) if msg == "Invalid body format"
        ));
    }

    #[test]
    fn test_parse_update_rejects_invalid_json() {
        assert!(parse_update("not json").is_err());
    }

    #[test]
    fn test_verify_secret_token() {
        let ok = json!({"headers": {"X-Telegram-Bot-Api-Secret-Token": "s"}});
        assert!(verify_secret_token(&ok, "s").is_ok());

        let wrong = json!({"headers": {"x-telegram-bot-api-secret-token": "t"}});
        assert!(verify_secret_token(&wrong, "s").is_err());

        let missing = json!({"headers": {}});
        assert!(verify_secret_token(&missing, "s").is_err());
    }
}
