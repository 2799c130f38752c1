// src/domain/timeline.rs

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::domain::application::StatusHistory;
use crate::domain::status::{humanize_label, is_rejection, is_terminal, StageCatalogue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Current => "current",
            StepStatus::Pending => "pending",
        }
    }
}

/// One row of a rendered status timeline. Derived on every render, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    /// 1-based position in the timeline.
    pub id: usize,
    /// The label exactly as recorded (or the catalogue stage for pending steps).
    pub name: String,
    pub status: StepStatus,
    /// `None` for synthesized steps and for events whose date didn't parse.
    #[serde(serialize_with = "date_only")]
    pub date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl TimelineStep {
    pub fn display_name(&self) -> String {
        humanize_label(&self.name)
    }

    /// Blank when there is no usable date.
    pub fn display_date(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

// Steps show the day only, as the history records it.
fn date_only<S: Serializer>(date: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.collect_str(&d.format(DATE_FORMAT)),
        None => s.serialize_none(),
    }
}

/// Derives the display timeline for one application.
///
/// Every recorded event becomes a `Completed` step, in order, duplicates included.
/// If the latest label is not terminal, that step is shown as `Current` and the
/// catalogue stages after it are appended as `Pending`. A terminal label (approved
/// or rejected) ends the timeline.
pub fn build_timeline(history: &StatusHistory, stages: &StageCatalogue) -> Vec<TimelineStep> {
    let Some(last_label) = history.last_label() else {
        return Vec::new();
    };

    let mut steps: Vec<TimelineStep> = history
        .events()
        .iter()
        .enumerate()
        .map(|(idx, event)| TimelineStep {
            id: idx + 1,
            name: event.label.clone(),
            status: StepStatus::Completed,
            date: event.recorded_at(),
            rejection_reason: if is_rejection(&event.label) {
                event.rejection_reason.clone()
            } else {
                None
            },
        })
        .collect();

    if is_terminal(last_label) {
        return steps;
    }

    if let Some(last) = steps.last_mut() {
        last.status = StepStatus::Current;
    }

    let offset = steps.len();
    steps.extend(
        stages
            .remaining_after(last_label)
            .iter()
            .enumerate()
            .map(|(idx, stage)| TimelineStep {
                id: offset + idx + 1,
                name: stage.clone(),
                status: StepStatus::Pending,
                date: None,
                rejection_reason: None,
            }),
    );

    steps
}
