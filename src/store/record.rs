use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// On-disk timestamp layout. Lexicographic order matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Version tag written into every record line.
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// Local wall-clock time truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParseError(String);

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected YYYY-MM-DD-HH-MM-SS or YYYY-MM-DD, got `{}`",
            self.0
        )
    }
}

impl std::error::Error for TimestampParseError {}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    /// Accepts the full record layout or a bare date (midnight of that day).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(at) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
            return Ok(Self(at));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| TimestampParseError(s.to_string()))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One logged mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionRecord {
    pub timestamp: Timestamp,
    pub source_key: String,
    pub text: String,
    pub read: bool,
}

/// Wire shape of a record line, version 1.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordLine {
    v: u32,
    ts: Timestamp,
    key: String,
    text: String,
    read: u8,
}

impl MentionRecord {
    pub fn unread(timestamp: Timestamp, source_key: &str, text: &str) -> Self {
        Self {
            timestamp,
            source_key: source_key.to_string(),
            text: text.to_string(),
            read: false,
        }
    }

    /// Serialize as a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let line = RecordLine {
            v: RECORD_FORMAT_VERSION,
            ts: self.timestamp,
            key: self.source_key.clone(),
            text: self.text.clone(),
            read: u8::from(self.read),
        };
        let mut out = serde_json::to_string(&line)?;
        out.push('\n');
        Ok(out)
    }

    /// Parse one line; the error string describes what was wrong with it.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let parsed: RecordLine =
            serde_json::from_str(line.trim_end_matches(['\r', '\n'])).map_err(|e| e.to_string())?;

        if parsed.v != RECORD_FORMAT_VERSION {
            return Err(format!("unsupported record version {}", parsed.v));
        }
        let read = match parsed.read {
            0 => false,
            1 => true,
            other => return Err(format!("read flag must be 0 or 1, got {other}")),
        };

        Ok(Self {
            timestamp: parsed.ts,
            source_key: parsed.key,
            text: parsed.text,
            read,
        })
    }
}
