// src/domain/application.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::status::normalize_label;

/// One recorded status change. Never mutated once appended to a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    #[serde(default)]
    pub label: String,
    /// Raw timestamp as recorded; may be missing or unparseable.
    #[serde(default, deserialize_with = "text_or_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "text_or_none")]
    pub rejection_reason: Option<String>,
}

impl StatusEvent {
    pub fn new(label: impl Into<String>, date: Option<String>) -> Self {
        Self {
            label: label.into(),
            date,
            rejection_reason: None,
        }
    }

    pub fn with_rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }

    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DD HH:MM:SS` and plain dates.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Append-only, oldest-first log of status events for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatusHistory(Vec<StatusEvent>);

impl StatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: StatusEvent) {
        self.0.push(event);
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The authoritative (most recent) event.
    pub fn latest(&self) -> Option<&StatusEvent> {
        self.0.last()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.latest().map(|e| e.label.as_str())
    }
}

impl From<Vec<StatusEvent>> for StatusHistory {
    fn from(events: Vec<StatusEvent>) -> Self {
        Self(events)
    }
}

impl FromIterator<StatusEvent> for StatusHistory {
    fn from_iter<I: IntoIterator<Item = StatusEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// A null or non-array history is an empty one; entries that aren't events are skipped.
impl<'de> Deserialize<'de> for StatusHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(items) = value else {
            return Ok(Self::default());
        };

        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value::<StatusEvent>(item).ok())
            .collect())
    }
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A visa application as the back office stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplication {
    pub id: i64,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub visa_type: String,
    #[serde(default = "one")]
    pub traveller_count: u32,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Fee per traveller in cents.
    #[serde(default)]
    pub fee_cents: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub status_history: StatusHistory,
}

fn one() -> u32 {
    1
}

impl VisaApplication {
    /// Lower-cased latest label, or `unknown` when nothing was recorded yet.
    pub fn latest_status(&self) -> String {
        self.status_history
            .last_label()
            .map(normalize_label)
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.status_history
            .latest()
            .and_then(StatusEvent::recorded_at)
            .or(self.created_at)
    }
}

/// Decodes a batch of applications from an external feed.
///
/// `null` and malformed entries are skipped one by one instead of failing the batch.
/// A payload that isn't an array decodes to nothing.
pub fn decode_applications(json: &str) -> Vec<VisaApplication> {
    let items = match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("application feed is not an array, ignoring");
            return Vec::new();
        }
        Err(e) => {
            warn!("application feed is not valid JSON: {e}");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if item.is_null() {
                warn!(index = idx, "skipping null application");
                return None;
            }
            serde_json::from_value::<VisaApplication>(item)
                .map_err(|e| warn!(index = idx, "skipping malformed application: {e}"))
                .ok()
        })
        .collect()
}
