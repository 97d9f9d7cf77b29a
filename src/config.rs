//! Session configuration

use crate::clock::Locale;
use chrono::{FixedOffset, Offset, Utc};

/// Display name of the local user when none is configured
pub const DEFAULT_LOCAL_USER: &str = "나";

/// Korea Standard Time, the offset the seed data was recorded in
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;

pub const DEFAULT_COMMAND_BUFFER: usize = 32;
pub const DEFAULT_RENDER_BUFFER: usize = 128;

/// What to do with an event addressed to a conversation that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownConversationPolicy {
    /// Reject the event with `ChatError::UnknownConversation`
    #[default]
    Reject,
    /// Create a directory entry named after the peer, then record the event
    Create,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub local_user: String,
    pub locale: Locale,
    pub utc_offset: FixedOffset,
    pub unknown_conversation: UnknownConversationPolicy,
    /// Start from the built-in seed conversations
    pub seed: bool,
    pub command_buffer: usize,
    pub render_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local_user: DEFAULT_LOCAL_USER.to_string(),
            locale: Locale::default(),
            utc_offset: default_offset(),
            unknown_conversation: UnknownConversationPolicy::default(),
            seed: true,
            command_buffer: DEFAULT_COMMAND_BUFFER,
            render_buffer: DEFAULT_RENDER_BUFFER,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; invalid values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(user) = lookup("DUOPANE_LOCAL_USER").filter(|u| !u.trim().is_empty()) {
            config.local_user = user;
        }

        if let Some(raw) = lookup("DUOPANE_LOCALE") {
            match raw.parse::<Locale>() {
                Ok(locale) => config.locale = locale,
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring DUOPANE_LOCALE"),
            }
        }

        if let Some(raw) = lookup("DUOPANE_UTC_OFFSET") {
            match parse_utc_offset(&raw) {
                Some(offset) => config.utc_offset = offset,
                None => tracing::warn!(value = %raw, "Ignoring malformed DUOPANE_UTC_OFFSET"),
            }
        }

        if let Some(raw) = lookup("DUOPANE_AUTO_CREATE") {
            match parse_flag(&raw) {
                Some(true) => config.unknown_conversation = UnknownConversationPolicy::Create,
                Some(false) => config.unknown_conversation = UnknownConversationPolicy::Reject,
                None => tracing::warn!(value = %raw, "Ignoring malformed DUOPANE_AUTO_CREATE"),
            }
        }

        if let Some(raw) = lookup("DUOPANE_SEED") {
            match parse_flag(&raw) {
                Some(seed) => config.seed = seed,
                None => tracing::warn!(value = %raw, "Ignoring malformed DUOPANE_SEED"),
            }
        }

        config
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `Z`, `UTC`, `+09:00`, `-0530` or `+9`
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match raw.chars().next()? {
        '+' => (1, raw.get(1..)?),
        '-' => (-1, raw.get(1..)?),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => (rest.get(..2)?, rest.get(2..)?),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
