//! Wall clock and activity-time formatting

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Display language for activity labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Ok(Locale::Korean),
            "en" | "en-us" | "english" => Ok(Locale::English),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Renders timestamps the way the conversation list shows them:
/// time of day for today, a "yesterday" label, otherwise month and day.
#[derive(Clone)]
pub struct TimeFormatter {
    locale: Locale,
    offset: FixedOffset,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TimeFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeFormatter")
            .field("locale", &self.locale)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl TimeFormatter {
    pub fn new(locale: Locale, offset: FixedOffset, clock: Arc<dyn Clock>) -> Self {
        Self {
            locale,
            offset,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Format relative to the clock's current time
    pub fn format(&self, timestamp: DateTime<Utc>) -> String {
        self.format_at(timestamp, self.clock.now())
    }

    /// Format relative to an explicit "now"
    pub fn format_at(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&self.offset);
        let today = now.with_timezone(&self.offset).date_naive();
        let day = local.date_naive();

        if day == today {
            let (pm, hour) = local.hour12();
            let minute = local.minute();
            match self.locale {
                Locale::Korean => {
                    let half = if pm { "오후" } else { "오전" };
                    format!("{half} {hour:02}:{minute:02}")
                }
                Locale::English => {
                    let half = if pm { "PM" } else { "AM" };
                    format!("{hour:02}:{minute:02} {half}")
                }
            }
        } else if today.pred_opt() == Some(day) {
            match self.locale {
                Locale::Korean => "어제".to_string(),
                Locale::English => "Yesterday".to_string(),
            }
        } else {
            match self.locale {
                Locale::Korean => format!("{}. {}.", local.month(), local.day()),
                Locale::English => format!("{}/{}", local.month(), local.day()),
            }
        }
    }
}
