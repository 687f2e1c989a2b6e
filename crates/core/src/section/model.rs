use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Structured content for one section of a page. Maps to `page_sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PageSection {
    pub id: i64,
    pub page_id: i64,
    pub section_type: String,
    pub section_order: i32,
    pub title: Option<String>,
    /// Free-form JSON object, replaced wholesale on save.
    pub content: Value,
    pub required_fields: Vec<String>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPageSection {
    /// Taken from the route when posted over HTTP.
    #[serde(default)]
    pub page_id: i64,
    pub section_type: String,
    #[serde(default)]
    pub section_order: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "empty_object")]
    pub content: Value,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default = "visible")]
    pub is_visible: bool,
}

/// Full replacement of a section's editable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageSection {
    pub section_order: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "empty_object")]
    pub content: Value,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default = "visible")]
    pub is_visible: bool,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn visible() -> bool {
    true
}

/// Sort by display order, ties broken by insertion id.
pub fn sort_sections(sections: &mut [PageSection]) {
    sections.sort_by_key(|s| (s.section_order, s.id));
}
