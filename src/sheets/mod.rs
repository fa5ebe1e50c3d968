//! Google Sheets integration

pub mod appender;
pub mod client;
pub mod credentials;

pub use appender::{GoogleSheetsAppender, RowAppender, append_row_with, build_range};
pub use client::{SheetsClient, SpreadsheetApi, SpreadsheetMetadata};
