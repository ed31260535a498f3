//! Interval duration settings and form-input normalisation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key the settings record lives under
pub const SETTINGS_KEY: &str = "pomodoroSettings";

pub const WORK_RANGE: (u32, u32) = (1, 60);
pub const SHORT_BREAK_RANGE: (u32, u32) = (1, 30);
pub const LONG_BREAK_RANGE: (u32, u32) = (1, 60);

/// The three user-configurable interval lengths, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Settings {
    /// Factory defaults: 25 minutes of work, 5 and 15 minute breaks
    pub const fn factory() -> Self {
        Self {
            work: 25,
            short_break: 5,
            long_break: 15,
        }
    }

    /// Decode a persisted record. Anything unparsable yields `None`;
    /// integers outside a field's range are clamped into it.
    pub fn decode(raw: &str) -> Option<Self> {
        let record = serde_json::from_str::<StoredSettings>(raw).ok()?;
        Some(Self {
            work: clamp_wide(record.work, WORK_RANGE),
            short_break: clamp_wide(record.short_break, SHORT_BREAK_RANGE),
            long_break: clamp_wide(record.long_break, LONG_BREAK_RANGE),
        })
    }

    pub fn encode(&self) -> String {
        // A struct of three integers always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Persisted record as read back, wide enough for any stored integer
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    work: i64,
    short_break: i64,
    long_break: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self::factory()
    }
}

/// Settings as submitted from an editing form, before validation.
///
/// Each field may hold a number, a numeric string, or anything else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsCandidate {
    #[serde(default)]
    pub work: Option<Value>,
    #[serde(default)]
    pub short_break: Option<Value>,
    #[serde(default)]
    pub long_break: Option<Value>,
}

impl SettingsCandidate {
    pub fn new(work: impl Into<Value>, short_break: impl Into<Value>, long_break: impl Into<Value>) -> Self {
        Self {
            work: Some(work.into()),
            short_break: Some(short_break.into()),
            long_break: Some(long_break.into()),
        }
    }

    /// Resolve into valid settings: non-numeric or missing fields fall back
    /// to the factory default for that field, then everything is clamped.
    pub fn resolve(&self) -> Settings {
        let defaults = Settings::factory();
        Settings {
            work: field_or(&self.work, defaults.work, WORK_RANGE),
            short_break: field_or(&self.short_break, defaults.short_break, SHORT_BREAK_RANGE),
            long_break: field_or(&self.long_break, defaults.long_break, LONG_BREAK_RANGE),
        }
    }
}

impl From<Settings> for SettingsCandidate {
    fn from(settings: Settings) -> Self {
        Self::new(settings.work, settings.short_break, settings.long_break)
    }
}

fn clamp_wide(value: i64, (min, max): (u32, u32)) -> u32 {
    value.clamp(min as i64, max as i64) as u32
}

fn field_or(value: &Option<Value>, default: u32, range: (u32, u32)) -> u32 {
    let minutes = value.as_ref().and_then(parse_minutes).unwrap_or(default as i64);
    clamp_wide(minutes, range)
}

/// Interpret a loosely typed form value as whole minutes
fn parse_minutes(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Parse the leading integer of a string the way a lenient form parser does:
/// `" 12min"` is 12, `"abc"` is nothing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long inputs; they clamp to the range maximum anyway
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
