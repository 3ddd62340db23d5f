pub mod issue;
pub mod project;
pub mod search;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};

pub use issue::*;
pub use project::*;
pub use search::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownContent(pub String);

impl std::fmt::Display for MarkdownContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed UTC offset used when rendering timestamps.
///
/// Accepts a few common abbreviations (UTC, GMT, JST, EST, PST, PDT, BST) or an
/// explicit `+HH:MM` / `-HH:MM` offset. Daylight saving is not tracked: pick
/// the abbreviation that matches the period being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneOffset {
    pub offset_seconds: i32,
    pub name: String,
}

impl TimezoneOffset {
    pub fn new(hours: i32, minutes: i32, name: impl Into<String>) -> Self {
        Self {
            offset_seconds: hours * 3600 + minutes * 60,
            name: name.into(),
        }
    }

    pub fn from_local() -> Self {
        let offset = Local::now().offset().local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let name = format!(
            "{}{:02}:{:02}",
            sign,
            offset.abs() / 3600,
            (offset.abs() % 3600) / 60
        );
        Self {
            offset_seconds: offset,
            name,
        }
    }

    pub fn parse(tz: &str) -> Option<Self> {
        match tz {
            "UTC" | "GMT" => Some(Self::new(0, 0, "UTC")),
            "JST" => Some(Self::new(9, 0, tz)),
            "EST" => Some(Self::new(-5, 0, tz)),
            "PST" => Some(Self::new(-8, 0, tz)),
            "PDT" => Some(Self::new(-7, 0, tz)),
            "BST" => Some(Self::new(1, 0, tz)),
            _ => {
                let sign = match tz.chars().next()? {
                    '+' => 1,
                    '-' => -1,
                    _ => return None,
                };
                let (hours, minutes) = tz[1..].split_once(':')?;
                let hours: i32 = hours.parse().ok()?;
                let minutes: i32 = minutes.parse().ok()?;
                if hours > 14 || minutes >= 60 {
                    return None;
                }
                Some(Self::new(sign * hours, sign * minutes, tz))
            }
        }
    }

    fn to_fixed_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_seconds).unwrap_or(Utc.fix())
    }
}

impl std::fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Formats `dt` in the given offset, or in UTC when `None`.
pub fn format_datetime(dt: DateTime<Utc>, timezone: Option<&TimezoneOffset>) -> String {
    match timezone {
        Some(tz) => dt
            .with_timezone(&tz.to_fixed_offset())
            .format(&format!("%Y-%m-%d %H:%M:%S {}", tz.name))
            .to_string(),
        None => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}
