use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// The closed set of page-builder block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Quote,
    Cta,
    Spacer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Quote,
        BlockKind::Cta,
        BlockKind::Spacer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Quote => "quote",
            BlockKind::Cta => "cta",
            BlockKind::Spacer => "spacer",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

/// One render unit in the page builder. Maps to `page_blocks`.
///
/// The JSON-bearing columns stay raw strings here; they are parsed at render
/// time with the fail-soft helpers in [`crate::json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock {
    pub id: i64,
    pub page_id: i64,
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: String,
    pub settings: String,
    pub visibility: String,
    pub animation: String,
    #[sqlx(rename = "block_order")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageBlock {
    /// `None` for a stored tag outside the closed set.
    pub fn kind(&self) -> Option<BlockKind> {
        self.block_type.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPageBlock {
    /// Taken from the route when posted over HTTP.
    #[serde(default)]
    pub page_id: i64,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "empty_object")]
    pub settings: String,
    #[serde(default = "empty_object")]
    pub visibility: String,
    #[serde(default = "empty_object")]
    pub animation: String,
    #[serde(default)]
    pub order: i32,
}

/// Partial edit of a block. Fields left `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUpdate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub settings: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

impl BlockUpdate {
    pub fn is_empty(&self) -> bool {
        *self == BlockUpdate::default()
    }

    pub fn apply_to(&self, block: &mut PageBlock) {
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        if let Some(settings) = &self.settings {
            block.settings = settings.clone();
        }
        if let Some(visibility) = &self.visibility {
            block.visibility = visibility.clone();
        }
        if let Some(animation) = &self.animation {
            block.animation = animation.clone();
        }
        if let Some(order) = self.order {
            block.order = order;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOrder {
    pub id: i64,
    pub order: i32,
}

fn empty_object() -> String {
    "{}".to_string()
}

/// Stable sort by `order`; ties keep storage order.
pub fn sort_blocks(blocks: &mut [PageBlock]) {
    blocks.sort_by_key(|b| b.order);
}
