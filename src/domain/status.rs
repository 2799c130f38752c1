// src/domain/status.rs

/// Initial label every new application starts with.
pub const PENDING: &str = "pending";
pub const VISA_APPROVED: &str = "visa_approved";
pub const VISA_REJECTED: &str = "visa_rejected";

/// Labels after which no further pipeline progress is implied.
pub const TERMINAL_LABELS: [&str; 2] = [VISA_APPROVED, VISA_REJECTED];

/// Default ordered pipeline for deployments that don't configure their own.
pub const DEFAULT_STAGES: [&str; 4] = [
    PENDING,
    "document_received",
    "document_verified",
    "in_process_with_embassy",
];

/// Labels are compared trimmed and lower-cased; operators type them by hand.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

pub fn is_terminal(label: &str) -> bool {
    let label = normalize_label(label);
    TERMINAL_LABELS.contains(&label.as_str())
}

pub fn is_rejection(label: &str) -> bool {
    normalize_label(label) == VISA_REJECTED
}

/// Turns `in_process_with_embassy` into `In Process With Embassy`.
/// Free-text labels go through the same transform.
pub fn humanize_label(label: &str) -> String {
    label
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// The ordered catalogue of non-terminal pipeline stages.
///
/// Terminal labels never belong here; they are dropped if configured by mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalogue {
    stages: Vec<String>,
}

impl Default for StageCatalogue {
    fn default() -> Self {
        Self::new(DEFAULT_STAGES)
    }
}

impl StageCatalogue {
    pub fn new<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stages = stages
            .into_iter()
            .map(|s| normalize_label(s.as_ref()))
            .filter(|s| !s.is_empty() && !is_terminal(s))
            .collect();

        Self { stages }
    }

    /// Parses a comma separated list such as `pending,document_received`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        let label = normalize_label(label);
        self.stages.iter().position(|s| *s == label)
    }

    /// Stages strictly after `label`. Empty when the label isn't in the catalogue,
    /// since the pipeline position is unknown.
    pub fn remaining_after(&self, label: &str) -> &[String] {
        match self.position(label) {
            Some(idx) => &self.stages[idx + 1..],
            None => &[],
        }
    }

    /// Every label the status form offers: the pipeline followed by the terminals.
    pub fn selectable_labels(&self) -> Vec<&str> {
        self.stages
            .iter()
            .map(String::as_str)
            .chain(TERMINAL_LABELS)
            .collect()
    }
}
