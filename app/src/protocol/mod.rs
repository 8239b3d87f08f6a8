mod json;

pub use json::JsonContentProtocolHandler;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ContentProtocolType {
    #[serde(rename = "JSON", alias = "json")]
    Json,
}

/// Pulls named values out of a device response body. Never fails, a value that cannot
/// be found or interpreted is simply absent.
pub trait ContentProtocolHandler {
    fn extract_boolean(&self, content: &str, path: Option<&str>) -> Option<bool>;
}

/// Interprets the whole body as a boolean, used when no content protocol is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextProtocolHandler;

impl ContentProtocolHandler for PlainTextProtocolHandler {
    fn extract_boolean(&self, content: &str, _path: Option<&str>) -> Option<bool> {
        parse_boolean_text(content)
    }
}

pub fn parse_boolean_text(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}
