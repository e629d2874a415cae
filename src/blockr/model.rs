//! # Domain Model
//!
//! The three persisted record shapes: [`Contact`], [`ScheduleRule`] and
//! [`UserPreferences`], plus the derived [`BlockStats`] summary.
//!
//! ## Wire Format
//!
//! Records are serialized as JSON objects with camelCase field names, so data
//! written by the mobile app reads back unchanged:
//!
//! ```text
//! { "id": "1", "name": "Spam", "phone": "+33 8 99 99 99 99",
//!   "isBlocked": true, "dateBlocked": "2024-01-15T10:00:00.000Z" }
//! ```
//!
//! Optional fields are omitted when unset rather than written as `null`.
//!
//! ## Stamp-Once Blocking
//!
//! `dateBlocked` records the first time a contact was blocked. Unblocking keeps
//! it, and blocking again never moves it. See [`Contact::set_blocked`].
//!
//! The stamp is kept as the raw ISO-8601 string. New stamps use the
//! `toISOString()` shape (`2024-01-15T10:00:00.000Z`), but any stored form, a
//! bare date or an offset included, reads back untouched so one odd value can
//! never make the whole contact list undecodable.
//!
//! ## Schedule Windows
//!
//! `timeStart`/`timeEnd` are kept as the raw `HH:MM` strings the user typed.
//! They are only parsed when a window is evaluated ([`ScheduleRule::covers`]),
//! so a malformed time is stored as-is and simply never matches.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub is_blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_blocked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls_blocked: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_blocked: Option<u32>,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            is_blocked: false,
            date_blocked: None,
            calls_blocked: None,
            messages_blocked: None,
        }
    }

    /// Sets the blocked flag, stamping `date_blocked` with `now` only if the
    /// contact has never been blocked before.
    pub fn set_blocked(&mut self, blocked: bool, now: DateTime<Utc>) {
        self.is_blocked = blocked;
        if blocked && self.date_blocked.is_none() {
            self.date_blocked = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }

    /// Calendar day of `date_blocked`, for either a full timestamp or a bare
    /// `YYYY-MM-DD`. `None` if unset or unparseable.
    pub fn blocked_on(&self) -> Option<NaiveDate> {
        let raw = self.date_blocked.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// Case-insensitive substring match on name or phone.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query) || self.phone.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Block,
    Allow,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Block => write!(f, "block"),
            RuleType::Allow => write!(f, "allow"),
        }
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "block" => Ok(RuleType::Block),
            "allow" => Ok(RuleType::Allow),
            other => Err(format!("Unknown rule type: {} (expected block or allow)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub time_start: String,
    pub time_end: String,
    pub days: Vec<String>,
    pub is_active: bool,
}

impl ScheduleRule {
    /// Parses the stored `HH:MM` bounds. `None` if either is malformed.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(self.time_start.trim(), TIME_FORMAT).ok()?;
        let end = NaiveTime::parse_from_str(self.time_end.trim(), TIME_FORMAT).ok()?;
        Some((start, end))
    }

    pub fn applies_on(&self, day: &str) -> bool {
        self.days.iter().any(|d| d.eq_ignore_ascii_case(day.trim()))
    }

    /// Whether this rule is in effect on `day` at `time`.
    ///
    /// The window is half-open `[start, end)`. A start later than the end wraps
    /// past midnight (22:00-07:00 covers 23:30 and 06:59). Equal bounds cover
    /// the whole day. Inactive rules never cover anything.
    pub fn covers(&self, day: &str, time: NaiveTime) -> bool {
        if !self.is_active || !self.applies_on(day) {
            return false;
        }
        let Some((start, end)) = self.window() else {
            return false;
        };
        if start == end {
            true
        } else if start < end {
            time >= start && time < end
        } else {
            time >= start || time < end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {} (expected light or dark)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_block: bool,
    pub language: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            auto_block: false,
            language: "fr".to_string(),
        }
    }
}

/// Home screen counters, derived from the stored collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub total_contacts: usize,
    pub blocked_contacts: usize,
    pub calls_blocked: u64,
    pub messages_blocked: u64,
    pub active_rules: usize,
}

impl BlockStats {
    pub fn compute(contacts: &[Contact], rules: &[ScheduleRule]) -> Self {
        let blocked = contacts.iter().filter(|c| c.is_blocked);
        let (blocked_contacts, calls_blocked, messages_blocked) =
            blocked.fold((0, 0u64, 0u64), |(n, calls, msgs), c| {
                (
                    n + 1,
                    calls + u64::from(c.calls_blocked.unwrap_or(0)),
                    msgs + u64::from(c.messages_blocked.unwrap_or(0)),
                )
            });
        Self {
            total_contacts: contacts.len(),
            blocked_contacts,
            calls_blocked,
            messages_blocked,
            active_rules: rules.iter().filter(|r| r.is_active).count(),
        }
    }
}
