//! Entrance animation configuration for blocks.

use serde::{Deserialize, Serialize};

use crate::json::parse_or_default;

/// Fraction of the block that must be on screen before an `on-scroll`
/// animation fires.
pub const SCROLL_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    #[default]
    None,
    FadeIn,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ZoomIn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationTrigger {
    OnLoad,
    #[default]
    OnScroll,
    OnHover,
}

impl AnimationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationTrigger::OnLoad => "on-load",
            AnimationTrigger::OnScroll => "on-scroll",
            AnimationTrigger::OnHover => "on-hover",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationConfig {
    #[serde(rename = "type")]
    pub kind: AnimationType,
    pub trigger: AnimationTrigger,
    /// Milliseconds.
    pub duration: u64,
    /// Milliseconds.
    pub delay: u64,
    pub easing: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            kind: AnimationType::None,
            trigger: AnimationTrigger::OnScroll,
            duration: 600,
            delay: 0,
            easing: "ease-out".to_string(),
        }
    }
}

/// CSS properties for one side of the transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationStyle {
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl AnimationStyle {
    pub fn to_css(&self) -> String {
        match &self.transform {
            Some(transform) => format!("opacity: {}; transform: {transform}", self.opacity),
            None => format!("opacity: {}", self.opacity),
        }
    }
}

/// Wrapper placed around a rendered block. The client toggles from `initial`
/// to `resting` according to `trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationWrapper {
    pub trigger: AnimationTrigger,
    pub delay: u64,
    pub transition: String,
    pub initial: AnimationStyle,
    pub resting: AnimationStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
}

impl AnimationConfig {
    /// Unparsable JSON yields `type: none`.
    pub fn parse(raw: &str) -> Self {
        parse_or_default(raw)
    }

    pub fn is_animated(&self) -> bool {
        self.kind != AnimationType::None
    }

    pub fn transition(&self) -> String {
        format!("all {}ms {}", self.duration, self.easing)
    }

    pub fn initial_style(&self) -> AnimationStyle {
        let transform = match self.kind {
            AnimationType::None | AnimationType::FadeIn => None,
            AnimationType::SlideUp => Some("translateY(30px)"),
            AnimationType::SlideDown => Some("translateY(-30px)"),
            AnimationType::SlideLeft => Some("translateX(30px)"),
            AnimationType::SlideRight => Some("translateX(-30px)"),
            AnimationType::ZoomIn => Some("scale(0.9)"),
        };
        AnimationStyle {
            opacity: 0.0,
            transform: transform.map(str::to_string),
        }
    }

    pub fn resting_style(&self) -> AnimationStyle {
        AnimationStyle {
            opacity: 1.0,
            transform: Some("translateY(0) translateX(0) scale(1)".to_string()),
        }
    }

    /// `None` when the block should be rendered unwrapped.
    pub fn wrapper(&self) -> Option<AnimationWrapper> {
        if !self.is_animated() {
            return None;
        }
        Some(AnimationWrapper {
            trigger: self.trigger,
            delay: self.delay,
            transition: self.transition(),
            initial: self.initial_style(),
            resting: self.resting_style(),
            threshold: (self.trigger == AnimationTrigger::OnScroll).then_some(SCROLL_THRESHOLD),
        })
    }
}
