use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted after successful admin writes, consumed by SSE listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    Welcome,
    Change(ChangeEvent),
    Reconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    ContentUpdated,
    TextStyleUpdated,
    SectionCreated,
    SectionUpdated,
    SectionDeleted,
    BlockCreated,
    BlockSaved,
    BlockDeleted,
    BlocksReordered,
    BlockRestored,
}

/// What changed and where. `page` is set for flat content writes, `page_id`
/// for sections and blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub event_id: Uuid,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            kind,
            page: None,
            page_id: None,
            entity_id: None,
            version_number: None,
            actor: None,
            timestamp: Utc::now(),
        }
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn page_id(mut self, page_id: i64) -> Self {
        self.page_id = Some(page_id);
        self
    }

    pub fn entity(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn version(mut self, version_number: i32) -> Self {
        self.version_number = Some(version_number);
        self
    }

    pub fn actor(mut self, actor: Option<&str>) -> Self {
        self.actor = actor.map(str::to_string);
        self
    }
}

impl ContentEvent {
    /// SSE `event:` name.
    pub fn name(&self) -> &'static str {
        match self {
            ContentEvent::Welcome => "welcome",
            ContentEvent::Change(_) => "change",
            ContentEvent::Reconnect => "reconnect",
        }
    }
}
