use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One editable field of a page. Maps to the `site_content` table, unique on
/// `(page, section, content_key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: i64,
    pub page: String,
    pub section: String,
    pub content_key: String,
    pub content_value: String,
    pub updated_at: DateTime<Utc>,
}

/// A `content_text_styles` row joined with its entry's section and key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleRow {
    pub content_id: i64,
    pub section: String,
    pub content_key: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
}

/// Formatting laid over a field. The default is "no override".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
}

impl From<&TextStyleRow> for TextStyle {
    fn from(row: &TextStyleRow) -> Self {
        Self {
            is_bold: row.is_bold,
            is_italic: row.is_italic,
            is_underline: row.is_underline,
            font_size: row.font_size.clone().filter(|s| !s.is_empty()),
            font_color: row.font_color.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContent {
    pub page: String,
    pub section: String,
    pub content_key: String,
    #[serde(default)]
    pub content_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTextStyle {
    pub page: String,
    pub section: String,
    pub content_key: String,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_italic: bool,
    #[serde(default)]
    pub is_underline: bool,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub font_color: Option<String>,
}
