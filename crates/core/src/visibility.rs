//! Visibility rules for page-builder blocks.
//!
//! A block carries a JSON `visibility` string. Evaluation is a pure function of
//! that string, the viewer's viewport width and the evaluation time. Malformed
//! JSON fails open: the block is shown. Each rule is read on its own, so a
//! mistyped field only drops that rule.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json::parse_object;

/// Lower bound (inclusive) of the tablet breakpoint, in CSS pixels.
pub const TABLET_MIN_WIDTH: u32 = 768;
/// Lower bound (inclusive) of the desktop breakpoint, in CSS pixels.
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: u32) -> Self {
        if width >= DESKTOP_MIN_WIDTH {
            Breakpoint::Desktop
        } else if width >= TABLET_MIN_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Mobile
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<DeviceRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
}

impl DeviceRules {
    /// Rules only apply once at least one device has been configured.
    pub fn is_configured(&self) -> bool {
        self.desktop.is_some() || self.tablet.is_some() || self.mobile.is_some()
    }

    pub fn rule_for(&self, breakpoint: Breakpoint) -> Option<bool> {
        match breakpoint {
            Breakpoint::Desktop => self.desktop,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Mobile => self.mobile,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Who is looking at the page. Auth rules are skipped entirely when no
/// context is supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub logged_in: bool,
    pub is_admin: bool,
}

fn rules<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key).and_then(Value::as_object)
}

fn bool_rule(rules: &Map<String, Value>, key: &str) -> Option<bool> {
    rules.get(key).and_then(Value::as_bool)
}

fn str_rule(rules: &Map<String, Value>, key: &str) -> Option<String> {
    rules.get(key).and_then(Value::as_str).map(str::to_string)
}

impl VisibilityCondition {
    /// Parse a stored visibility string. Unusable input yields the empty
    /// condition, which shows the block everywhere.
    pub fn parse(raw: &str) -> Self {
        let root = parse_object(raw);
        Self {
            devices: rules(&root, "devices").map(|d| DeviceRules {
                desktop: bool_rule(d, "desktop"),
                tablet: bool_rule(d, "tablet"),
                mobile: bool_rule(d, "mobile"),
            }),
            auth: rules(&root, "auth").map(|a| AuthRules {
                logged_in: bool_rule(a, "loggedIn"),
                logged_out: bool_rule(a, "loggedOut"),
                admin_only: bool_rule(a, "adminOnly"),
            }),
            schedule: rules(&root, "schedule").map(|s| Schedule {
                start_date: str_rule(s, "startDate"),
                end_date: str_rule(s, "endDate"),
            }),
        }
    }

    pub fn allows(&self, viewport_width: u32, now: DateTime<Utc>, auth: Option<&AuthContext>) -> bool {
        let breakpoint = Breakpoint::from_width(viewport_width);

        if let Some(devices) = &self.devices {
            if devices.is_configured() && devices.rule_for(breakpoint) == Some(false) {
                return false;
            }
        }

        if let Some(schedule) = &self.schedule {
            if let Some(start) = schedule.start_date.as_deref().and_then(parse_schedule_time) {
                if start > now {
                    return false;
                }
            }
            if let Some(end) = schedule.end_date.as_deref().and_then(parse_schedule_time) {
                if end < now {
                    return false;
                }
            }
        }

        match (auth, &self.auth) {
            (Some(viewer), Some(rules)) => rules.allows(viewer),
            _ => true,
        }
    }
}

impl AuthRules {
    /// `adminOnly` gates everyone else out. `loggedIn` and `loggedOut` name
    /// allowed audiences; with neither set every viewer matches.
    fn allows(&self, viewer: &AuthContext) -> bool {
        if self.admin_only == Some(true) && !viewer.is_admin {
            return false;
        }
        let members = self.logged_in == Some(true);
        let guests = self.logged_out == Some(true);
        if !members && !guests {
            return true;
        }
        (members && viewer.logged_in) || (guests && !viewer.logged_in)
    }
}

/// Evaluate a block's visibility for the public renderer. Auth rules are not
/// evaluated here.
pub fn is_visible(visibility_json: &str, viewport_width: u32, now: DateTime<Utc>) -> bool {
    is_visible_with_auth(visibility_json, viewport_width, now, None)
}

pub fn is_visible_with_auth(
    visibility_json: &str,
    viewport_width: u32,
    now: DateTime<Utc>,
    auth: Option<&AuthContext>,
) -> bool {
    VisibilityCondition::parse(visibility_json).allows(viewport_width, now, auth)
}

/// Accepts RFC 3339, `datetime-local` values (`2030-01-01T09:30`, taken as UTC)
/// and bare dates. Anything else yields `None` and the bound is ignored.
fn parse_schedule_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
