//! Per-block settings vocabulary.
//!
//! Settings arrive as a loose JSON object. Each value is read on its own so a
//! bad entry only loses that one setting; unknown keys are ignored.

use serde::Serialize;
use serde_json::{Map, Value};

/// A setting restricted to a fixed set of string values.
pub trait Choice: Sized + Copy + 'static {
    const VALUES: &'static [(&'static str, Self)];

    fn as_str(&self) -> &'static str
    where
        Self: PartialEq,
    {
        Self::VALUES
            .iter()
            .find(|(_, value)| value == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

/// The setting's value when it names a known choice, otherwise `default`.
pub fn choice<T: Choice>(settings: &Map<String, Value>, key: &str, default: T) -> T {
    settings
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| T::VALUES.iter().find(|(name, _)| *name == raw))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

/// Non-empty string setting.
pub fn text(settings: &Map<String, Value>, key: &str) -> Option<String> {
    settings
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn flag(settings: &Map<String, Value>, key: &str) -> bool {
    settings.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Choice for Alignment {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("left", Alignment::Left),
        ("center", Alignment::Center),
        ("right", Alignment::Right),
    ];
}

impl Alignment {
    pub fn text_class(&self) -> &'static str {
        match self {
            Alignment::Left => "text-left",
            Alignment::Center => "text-center",
            Alignment::Right => "text-right",
        }
    }

    /// Horizontal placement of a fixed-width media box.
    pub fn box_class(&self) -> &'static str {
        match self {
            Alignment::Left => "mr-auto",
            Alignment::Center => "mx-auto",
            Alignment::Right => "ml-auto",
        }
    }

    pub fn flex_class(&self) -> &'static str {
        match self {
            Alignment::Left => "text-left items-start",
            Alignment::Center => "text-center items-center",
            Alignment::Right => "text-right items-end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl Choice for FontSize {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("small", FontSize::Small),
        ("medium", FontSize::Medium),
        ("large", FontSize::Large),
    ];
}

impl FontSize {
    pub fn class(&self) -> &'static str {
        match self {
            FontSize::Small => "text-sm",
            FontSize::Medium => "text-base",
            FontSize::Large => "text-lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    Small,
    Medium,
    Large,
    Full,
}

impl Choice for Width {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("small", Width::Small),
        ("medium", Width::Medium),
        ("large", Width::Large),
        ("full", Width::Full),
    ];
}

impl Width {
    pub fn class(&self) -> &'static str {
        match self {
            Width::Small => "max-w-md",
            Width::Medium => "max-w-2xl",
            Width::Large => "max-w-4xl",
            Width::Full => "max-w-full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Default,
    Bordered,
    Highlighted,
}

impl Choice for QuoteStyle {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("default", QuoteStyle::Default),
        ("bordered", QuoteStyle::Bordered),
        ("highlighted", QuoteStyle::Highlighted),
    ];
}

impl QuoteStyle {
    pub fn class(&self) -> &'static str {
        match self {
            QuoteStyle::Default => "border-l-4 border-neutral-300 pl-6 italic",
            QuoteStyle::Bordered => "border-2 border-neutral-200 p-6 rounded-lg",
            QuoteStyle::Highlighted => "bg-neutral-100 p-8 rounded-xl shadow-sm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaStyle {
    Default,
    Gradient,
    Minimal,
}

impl Choice for CtaStyle {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("default", CtaStyle::Default),
        ("gradient", CtaStyle::Gradient),
        ("minimal", CtaStyle::Minimal),
    ];
}

impl CtaStyle {
    pub fn class(&self) -> &'static str {
        match self {
            CtaStyle::Default => "bg-neutral-50 border border-neutral-200",
            CtaStyle::Gradient => "bg-gradient-to-br from-neutral-50 to-neutral-100",
            CtaStyle::Minimal => "bg-transparent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Default,
    Outline,
    Ghost,
}

impl Choice for ButtonVariant {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("default", ButtonVariant::Default),
        ("outline", ButtonVariant::Outline),
        ("ghost", ButtonVariant::Ghost),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacerHeight {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl Choice for SpacerHeight {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("small", SpacerHeight::Small),
        ("medium", SpacerHeight::Medium),
        ("large", SpacerHeight::Large),
        ("xlarge", SpacerHeight::Xlarge),
    ];
}

impl SpacerHeight {
    pub fn class(&self) -> &'static str {
        match self {
            SpacerHeight::Small => "h-8",
            SpacerHeight::Medium => "h-16",
            SpacerHeight::Large => "h-24",
            SpacerHeight::Xlarge => "h-32",
        }
    }
}
