//! Per-request accessor over a page's flat content fields and their text styles.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{ContentEntry, TextStyle, TextStyleRow};
use crate::store::ContentStore;

/// Inline CSS derived from a [`TextStyle`]. Only truthy values are set so
/// absent overrides never clobber the page's own styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl InlineStyle {
    pub fn is_empty(&self) -> bool {
        *self == InlineStyle::default()
    }

    /// Render as a `style` attribute value.
    pub fn to_css(&self) -> String {
        let properties = [
            ("font-weight", &self.font_weight),
            ("font-style", &self.font_style),
            ("text-decoration", &self.text_decoration),
            ("font-size", &self.font_size),
            ("color", &self.color),
        ];
        properties
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}: {v}")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<&TextStyle> for InlineStyle {
    fn from(style: &TextStyle) -> Self {
        Self {
            font_weight: style.is_bold.then(|| "bold".to_string()),
            font_style: style.is_italic.then(|| "italic".to_string()),
            text_decoration: style.is_underline.then(|| "underline".to_string()),
            font_size: style.font_size.clone(),
            color: style.font_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(skip_serializing_if = "InlineStyle::is_empty")]
    pub style: InlineStyle,
}

/// Every field of a page with its styling applied, grouped by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPage {
    pub page: String,
    pub sections: BTreeMap<String, BTreeMap<String, ResolvedField>>,
}

/// Content and styles for one page, loaded fresh for each request.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    page: String,
    entries: Vec<ContentEntry>,
    styles_by_field: HashMap<String, TextStyle>,
    styles_by_key: HashMap<String, TextStyle>,
}

fn field_key(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

impl ContentSet {
    pub fn new(page: impl Into<String>, entries: Vec<ContentEntry>, styles: Vec<TextStyleRow>) -> Self {
        let mut styles_by_field = HashMap::with_capacity(styles.len());
        let mut styles_by_key = HashMap::with_capacity(styles.len());
        for row in &styles {
            let style = TextStyle::from(row);
            if row.section.is_empty() {
                styles_by_key.insert(row.content_key.clone(), style);
            } else {
                styles_by_field.insert(field_key(&row.section, &row.content_key), style);
            }
        }
        Self {
            page: page.into(),
            entries,
            styles_by_field,
            styles_by_key,
        }
    }

    pub fn empty(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Self::default()
        }
    }

    /// Fetch a page's content and styles. A failing store yields an empty set
    /// so the page renders with its defaults.
    pub async fn load(store: &dyn ContentStore, page: &str) -> Self {
        let entries = match store.content_by_page(page).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(page, "failed to load page content: {err}");
                return Self::empty(page);
            }
        };
        let styles = match store.text_styles_by_page(page).await {
            Ok(styles) => styles,
            Err(err) => {
                tracing::warn!(page, "failed to load text styles: {err}");
                return Self::empty(page);
            }
        };
        tracing::debug!(page, entries = entries.len(), styles = styles.len(), "loaded page content");
        Self::new(page, entries, styles)
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, section: &str, key: &str) -> Option<&ContentEntry> {
        self.entries
            .iter()
            .find(|e| e.section == section && e.content_key == key)
    }

    /// The stored value, or `default` when the field is missing or empty.
    pub fn get_content(&self, section: &str, key: &str, default: &str) -> String {
        match self.entry(section, key) {
            Some(entry) if !entry.content_value.is_empty() => entry.content_value.clone(),
            _ => default.to_string(),
        }
    }

    /// Override for `section.key`, falling back to a section-less override on
    /// the bare key.
    pub fn get_text_style(&self, section: &str, key: &str) -> TextStyle {
        self.styles_by_field
            .get(&field_key(section, key))
            .or_else(|| self.styles_by_key.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Class tokens for the boolean flags. Size and colour are left to
    /// [`ContentSet::get_inline_styles`].
    pub fn get_style_classes(&self, section: &str, key: &str) -> String {
        let style = self.get_text_style(section, key);
        let mut classes = Vec::with_capacity(3);
        if style.is_bold {
            classes.push("font-bold");
        }
        if style.is_italic {
            classes.push("italic");
        }
        if style.is_underline {
            classes.push("underline");
        }
        classes.join(" ")
    }

    pub fn get_inline_styles(&self, section: &str, key: &str) -> InlineStyle {
        InlineStyle::from(&self.get_text_style(section, key))
    }

    pub fn get_section(&self, section: &str) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|e| e.section == section)
            .map(|e| (e.content_key.clone(), e.content_value.clone()))
            .collect()
    }

    pub fn resolve(&self) -> ResolvedPage {
        let mut sections: BTreeMap<String, BTreeMap<String, ResolvedField>> = BTreeMap::new();
        for entry in &self.entries {
            let field = ResolvedField {
                value: entry.content_value.clone(),
                class_name: self.get_style_classes(&entry.section, &entry.content_key),
                style: self.get_inline_styles(&entry.section, &entry.content_key),
            };
            sections
                .entry(entry.section.clone())
                .or_default()
                .insert(entry.content_key.clone(), field);
        }
        ResolvedPage {
            page: self.page.clone(),
            sections,
        }
    }
}
