//! Sign level classifier — deterministic, hour-bucketed tier assignment for a wish.
//!
//! The same trimmed wish always lands on the same level within one UTC hour,
//! across processes. The level is a pure function of the text and the hour bucket:
//!
//! 1. key   = `"{trimmed wish}|{year}-{month0}-{day}-{hour}"` (UTC, month is 0-indexed)
//! 2. hash  = Σ over UTF-16 code units: `h = h * 31 + c`, wrapping at 32 bits (signed)
//! 3. bucket = |hash| mod 100
//! 4. bucket < 20 → 吉, 20..70 → 中, ≥ 70 → 平   (target split 20 / 50 / 30)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, DurationRound, SecondsFormat, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Buckets below this are Auspicious.
const AUSPICIOUS_UPPER: u32 = 20;
/// Buckets below this (and ≥ AUSPICIOUS_UPPER) are Neutral. Everything else is Plain.
const NEUTRAL_UPPER: u32 = 70;

/// The three possible sign levels. Serialized as the single CJK character the
/// front end displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignLevel {
    #[serde(rename = "吉")]
    Auspicious,
    #[serde(rename = "中")]
    Neutral,
    #[serde(rename = "平")]
    Plain,
}

impl SignLevel {
    pub const ALL: [SignLevel; 3] = [SignLevel::Auspicious, SignLevel::Neutral, SignLevel::Plain];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignLevel::Auspicious => "吉",
            SignLevel::Neutral => "中",
            SignLevel::Plain => "平",
        }
    }

    /// Maps a bucket in `0..100` to a level.
    pub fn from_bucket(bucket: u32) -> Self {
        if bucket < AUSPICIOUS_UPPER {
            SignLevel::Auspicious
        } else if bucket < NEUTRAL_UPPER {
            SignLevel::Neutral
        } else {
            SignLevel::Plain
        }
    }
}

impl fmt::Display for SignLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSignLevel(pub String);

impl fmt::Display for UnknownSignLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sign level: {:?}", self.0)
    }
}

impl std::error::Error for UnknownSignLevel {}

impl FromStr for SignLevel {
    type Err = UnknownSignLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownSignLevel(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Clock
// ────────────────────────────────────────────────────────────────────────────

/// Source of "now". Injected through `AppState` so tests can pin the hour bucket.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock. Read on every call, never cached across an hour boundary.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// UTC hour bucket key, e.g. `2024-2-15-9` for 2024-03-15 09:xx UTC.
pub fn hour_bucket(now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}-{}",
        now.year(),
        now.month0(),
        now.day(),
        now.hour()
    )
}

/// Polynomial string hash (multiplier 31) over UTF-16 code units with i32 wraparound.
pub fn wish_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

/// |hash| mod 100. `i32::MIN` has no i32 absolute value; its magnitude 2^31 is used.
pub fn bucket_of(hash: i32) -> u32 {
    hash.unsigned_abs() % 100
}

/// Trims leading/trailing whitespace with ECMAScript `String.prototype.trim` rules:
/// U+FEFF is whitespace, U+0085 is not. Everything else matches `char::is_whitespace`.
pub fn trim_wish(wish: &str) -> &str {
    wish.trim_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}')
}

/// Classifies a wish for the hour containing `now`. Callers read their `Clock`
/// once and pass the instant in, so level and timestamp agree.
pub fn classify(wish: &str, now: DateTime<Utc>) -> SignLevel {
    let key = format!("{}|{}", trim_wish(wish), hour_bucket(now));
    SignLevel::from_bucket(bucket_of(wish_hash(&key)))
}

/// `now` truncated to the hour, formatted like `2024-01-01T09:00:00.000Z`.
pub fn hour_timestamp(now: DateTime<Utc>) -> String {
    now.duration_trunc(TimeDelta::hours(1))
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
