use serde::Deserialize;
use serde_json::Number;
use std::fmt;

pub const UNKNOWN_USERNAME: &str = "unknown";

/// Telegram `Update` envelope, reduced to the fields persisted to the sheet.
/// Every field is optional; absent values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub message: TelegramMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub chat: Option<TelegramChat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramChat {
    #[serde(default)]
    pub id: Option<ChatId>,
}

/// Telegram sends numeric chat ids, but any JSON number or string is
/// accepted and written out as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Num(Number),
    Str(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Num(id) => write!(f, "{id}"),
            ChatId::Str(id) => f.write_str(id),
        }
    }
}

impl TelegramMessage {
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.from
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .unwrap_or(UNKNOWN_USERNAME)
    }

    #[must_use]
    pub fn chat_id(&self) -> String {
        self.chat
            .as_ref()
            .and_then(|c| c.id.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// One spreadsheet row, in column order A..D.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub username: String,
    pub chat_id: String,
    pub text: String,
    pub timestamp: String,
}

impl SheetRow {
    #[must_use]
    pub fn from_message(message: &TelegramMessage, timestamp: String) -> Self {
        Self {
            username: message.username().to_string(),
            chat_id: message.chat_id(),
            text: message.text().to_string(),
            timestamp,
        }
    }

    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        vec![self.username, self.chat_id, self.text, self.timestamp]
    }
}
