//! Response builders for the webhook Lambda.
//!
//! Every response is a 200; Telegram retries anything else. Bodies are
//! rendered the way Python's `json.dumps` renders them (`{"ok": true}`), with
//! `ok` first and non-ASCII escaped.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Value, json};
use std::io;

#[derive(Serialize)]
struct ResponseBody<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// `json.dumps` default style: `", "` and `": "` separators, `\uXXXX` for
/// anything outside ASCII.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

fn render_body(body: &ResponseBody<'_>) -> String {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, SpacedFormatter);
    match body.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) if body.ok => r#"{"ok": true}"#.to_string(),
        Err(_) => r#"{"ok": false}"#.to_string(),
    }
}

/// Returns a 200 OK response with body `{"ok": true}`.
#[must_use]
pub fn ok_response() -> Value {
    json!({
        "statusCode": 200,
        "body": render_body(&ResponseBody { ok: true, error: None })
    })
}

/// Returns a 200 response with body `{"ok": false, "error": message}`.
#[must_use]
pub fn error_response(message: &str) -> Value {
    json!({
        "statusCode": 200,
        "body": render_body(&ResponseBody { ok: false, error: Some(message) })
    })
}
