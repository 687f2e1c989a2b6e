//! How much of each section's required content has been filled in.

use serde::Serialize;
use serde_json::Value;

use super::model::PageSection;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCompleteness {
    pub id: i64,
    pub section_type: String,
    /// Percentage, 0–100.
    pub completeness: u8,
    pub filled_fields: Vec<String>,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCompleteness {
    pub page_id: i64,
    pub overall_completeness: u8,
    pub sections: Vec<SectionCompleteness>,
}

fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 100;
    }
    ((part as f64 * 100.0) / whole as f64).round() as u8
}

impl SectionCompleteness {
    pub fn of(section: &PageSection) -> Self {
        let (filled_fields, missing_fields): (Vec<String>, Vec<String>) = section
            .required_fields
            .iter()
            .cloned()
            .partition(|field| is_filled(section.content.get(field.as_str())));

        Self {
            id: section.id,
            section_type: section.section_type.clone(),
            completeness: percent(filled_fields.len(), section.required_fields.len()),
            filled_fields,
            missing_fields,
        }
    }
}

impl PageCompleteness {
    pub fn of(page_id: i64, sections: &[PageSection]) -> Self {
        let sections: Vec<SectionCompleteness> =
            sections.iter().map(SectionCompleteness::of).collect();
        let overall_completeness = if sections.is_empty() {
            100
        } else {
            let total: u32 = sections.iter().map(|s| u32::from(s.completeness)).sum();
            (f64::from(total) / sections.len() as f64).round() as u8
        };
        Self {
            page_id,
            overall_completeness,
            sections,
        }
    }
}
