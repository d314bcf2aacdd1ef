//! Record types persisted by the quiz state store.
//!
//! Records serialize to the JSON documents quiz widgets read back from
//! browser storage: camelCase field names, and timestamps as RFC 3339 UTC
//! strings with millisecond precision (`2025-03-01T12:00:00.000Z`).

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted answer for a single quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// The selected choice.
    pub answer: String,
    /// Whether the choice was correct.
    pub is_correct: bool,
    /// Write time, set by the store.
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// A single caller-supplied completion field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

/// Caller-supplied completion fields, ordered by name.
pub type Payload = BTreeMap<String, PayloadValue>;

impl From<bool> for PayloadValue {
    fn from(v: bool) -> Self {
        PayloadValue::Bool(v)
    }
}

impl From<i64> for PayloadValue {
    fn from(v: i64) -> Self {
        PayloadValue::Number(v.into())
    }
}

impl From<u64> for PayloadValue {
    fn from(v: u64) -> Self {
        PayloadValue::Number(v.into())
    }
}

impl From<&str> for PayloadValue {
    fn from(v: &str) -> Self {
        PayloadValue::String(v.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(v: String) -> Self {
        PayloadValue::String(v)
    }
}

impl PayloadValue {
    /// Build a number value. Returns `None` for NaN and infinities, which
    /// have no JSON representation.
    pub fn from_f64(v: f64) -> Option<Self> {
        serde_json::Number::from_f64(v).map(PayloadValue::Number)
    }
}

/// Parses command-line style input: `true`/`false` become booleans, anything
/// that reads as a finite number becomes a number, the rest stays a string.
impl FromStr for PayloadValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s {
            "true" => PayloadValue::Bool(true),
            "false" => PayloadValue::Bool(false),
            _ => {
                if let Ok(n) = s.parse::<i64>() {
                    n.into()
                } else if let Ok(n) = s.parse::<u64>() {
                    n.into()
                } else if let Some(n) = s.parse::<f64>().ok().and_then(Self::from_f64) {
                    n
                } else {
                    PayloadValue::String(s.to_string())
                }
            }
        };
        Ok(value)
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Bool(b) => write!(f, "{b}"),
            PayloadValue::Number(n) => write!(f, "{n}"),
            PayloadValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// Marker that a quiz was finished, with caller-supplied fields.
///
/// The `timestamp` and `completed` fields belong to the store: constructing a
/// record drops any payload entries with those names, and `completed` is
/// always `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CompletionDocument", into = "CompletionDocument")]
pub struct CompletionRecord {
    fields: Payload,
    timestamp: DateTime<Utc>,
}

impl CompletionRecord {
    /// Field names controlled by the store.
    pub const RESERVED_FIELDS: [&'static str; 2] = ["timestamp", "completed"];

    /// Build a record from a caller payload and the write time.
    pub fn new(mut payload: Payload, timestamp: DateTime<Utc>) -> Self {
        payload.retain(|name, _| !Self::RESERVED_FIELDS.contains(&name.as_str()));
        Self {
            fields: payload,
            timestamp,
        }
    }

    /// Caller-supplied fields.
    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    /// Look up a single caller-supplied field.
    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.fields.get(name)
    }

    /// Write time, set by the store.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Always `true`; there is no in-progress completion.
    pub fn completed(&self) -> bool {
        true
    }
}

/// Wire shape of a completion record.
#[derive(Clone, Serialize, Deserialize)]
struct CompletionDocument {
    #[serde(flatten)]
    fields: Payload,
    #[serde(with = "iso8601")]
    timestamp: DateTime<Utc>,
    completed: bool,
}

impl TryFrom<CompletionDocument> for CompletionRecord {
    type Error = String;

    fn try_from(doc: CompletionDocument) -> Result<Self, Self::Error> {
        if !doc.completed {
            return Err("`completed` is not true".to_string());
        }
        Ok(CompletionRecord {
            fields: doc.fields,
            timestamp: doc.timestamp,
        })
    }
}

impl From<CompletionRecord> for CompletionDocument {
    fn from(record: CompletionRecord) -> Self {
        CompletionDocument {
            fields: record.fields,
            timestamp: record.timestamp,
            completed: true,
        }
    }
}

/// Badge state for a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizStatus {
    Completed,
    NotSubmitted,
}

impl QuizStatus {
    /// Badge state given the quiz's completion record, if any.
    pub fn from_completion(completion: Option<&CompletionRecord>) -> Self {
        match completion {
            Some(_) => QuizStatus::Completed,
            None => QuizStatus::NotSubmitted,
        }
    }
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizStatus::Completed => write!(f, "completed"),
            QuizStatus::NotSubmitted => write!(f, "not-submitted"),
        }
    }
}

/// Serde adapter for ISO-8601 timestamps at millisecond precision.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
