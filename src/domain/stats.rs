// src/domain/stats.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::application::VisaApplication;
use crate::domain::status::normalize_label;

/// Dashboard summary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Pending,
    Processing,
    Approved,
    Issued,
    Rejected,
}

impl Bucket {
    /// Classification order. The first keyword found in a label wins.
    pub const PRIORITY: [Bucket; 5] = [
        Bucket::Pending,
        Bucket::Processing,
        Bucket::Approved,
        Bucket::Issued,
        Bucket::Rejected,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Bucket::Pending => "pending",
            Bucket::Processing => "processing",
            Bucket::Approved => "approved",
            Bucket::Issued => "issued",
            Bucket::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Bucket> {
        let raw = normalize_label(raw);
        Self::PRIORITY.into_iter().find(|b| b.keyword() == raw)
    }

    /// Substring match, so free-text labels like `Rejected - insufficient funds` still land.
    /// Labels matching none of the keywords belong to no bucket.
    pub fn classify(label: &str) -> Option<Bucket> {
        let label = normalize_label(label);
        Self::PRIORITY
            .into_iter()
            .find(|b| label.contains(b.keyword()))
    }

    pub fn of(app: &VisaApplication) -> Option<Bucket> {
        Self::classify(&app.latest_status())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub pending: usize,
    pub processing: usize,
    pub approved: usize,
    pub issued: usize,
    pub rejected: usize,
    /// Every application counted, bucketed or not.
    pub total: usize,
}

impl StatusSummary {
    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Pending => self.pending,
            Bucket::Processing => self.processing,
            Bucket::Approved => self.approved,
            Bucket::Issued => self.issued,
            Bucket::Rejected => self.rejected,
        }
    }

    fn bump(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Pending => self.pending += 1,
            Bucket::Processing => self.processing += 1,
            Bucket::Approved => self.approved += 1,
            Bucket::Issued => self.issued += 1,
            Bucket::Rejected => self.rejected += 1,
        }
    }

    /// Bucket name to count, plus `total`.
    pub fn as_map(&self) -> BTreeMap<&'static str, usize> {
        let mut map: BTreeMap<&'static str, usize> = Bucket::PRIORITY
            .iter()
            .map(|b| (b.keyword(), self.count(*b)))
            .collect();
        map.insert("total", self.total);
        map
    }
}

/// Counts applications per bucket by their latest status.
pub fn aggregate<'a, I>(applications: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a VisaApplication>,
{
    let mut summary = StatusSummary::default();

    for app in applications {
        summary.total += 1;
        if let Some(bucket) = Bucket::of(app) {
            summary.bump(bucket);
        }
    }

    summary
}
