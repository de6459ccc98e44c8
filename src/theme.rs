//! Theme descriptors
//!
//! Theme files come in two shapes: icon themes (an `iconDefinitions` map plus
//! association tables) and color themes (`type` + `colors`). The shape is
//! resolved once at parse time into a tagged `ThemeDocument`; no check
//! re-sniffs fields afterwards.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// A parsed theme descriptor, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeDocument {
    Icon(IconTheme),
    Color(ColorTheme),
}

/// Icon theme: icon definitions plus association tables
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconTheme {
    pub icon_definitions: BTreeMap<String, IconDefinition>,
    #[serde(default)]
    pub file_extensions: BTreeMap<String, String>,
    #[serde(default)]
    pub file_names: BTreeMap<String, String>,
    #[serde(default)]
    pub folder_names: BTreeMap<String, String>,
}

/// One icon definition inside a theme
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDefinition {
    pub icon_path: String,
}

/// Color theme: a type tag and a color table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorTheme {
    #[serde(rename = "type")]
    pub theme_type: String,
    pub colors: BTreeMap<String, serde_json::Value>,
}

/// Why a theme descriptor failed to parse
#[derive(Error, Debug)]
pub enum ThemeParseError {
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("theme matches neither the icon-theme nor the color-theme shape")]
    UnrecognizedShape,
}

impl ThemeDocument {
    /// Parse a theme descriptor from raw text
    ///
    /// Line comments are stripped first (theme sources are JSON with
    /// comments). Shape selection: `iconDefinitions` wins; otherwise
    /// `type` + `colors`; anything else is unrecognized.
    pub fn parse(text: &str) -> Result<Self, ThemeParseError> {
        let stripped = strip_line_comments(text);
        let value: serde_json::Value = serde_json::from_str(&stripped)?;

        if value.get("iconDefinitions").is_some() {
            let theme: IconTheme = serde_json::from_value(value)?;
            return Ok(ThemeDocument::Icon(theme));
        }
        if value.get("type").is_some() && value.get("colors").is_some() {
            let theme: ColorTheme = serde_json::from_value(value)?;
            return Ok(ThemeDocument::Color(theme));
        }
        Err(ThemeParseError::UnrecognizedShape)
    }
}

/// Remove `//` line comments from JSON text, preserving string contents
pub fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Drop to end of line, keep the newline itself
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}
