// src/domain/view.rs

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::application::VisaApplication;
use crate::domain::stats::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Created,
    Country,
    Travellers,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Id,
        SortKey::Created,
        SortKey::Country,
        SortKey::Travellers,
        SortKey::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Created => "created",
            SortKey::Country => "country",
            SortKey::Travellers => "travellers",
            SortKey::Status => "status",
        }
    }

    pub fn parse(raw: &str) -> Option<SortKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }

    fn compare(&self, a: &VisaApplication, b: &VisaApplication) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Country => a.country.to_lowercase().cmp(&b.country.to_lowercase()),
            SortKey::Travellers => a.traveller_count.cmp(&b.traveller_count),
            SortKey::Status => a.latest_status().cmp(&b.latest_status()),
        }
    }
}

/// The list screen's view state: search, filter, sort and page.
/// Re-applied to the full fetched list on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub search: Option<String>,
    pub bucket: Option<Bucket>,
    pub sort: SortKey,
    pub descending: bool,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ApplicationQuery {
    fn default() -> Self {
        Self {
            search: None,
            bucket: None,
            sort: SortKey::Id,
            descending: true,
            page: 1,
            per_page: 10,
        }
    }
}

#[derive(Debug)]
pub struct Page<'a> {
    pub items: Vec<&'a VisaApplication>,
    pub page: usize,
    pub total_pages: usize,
    /// Matches before pagination.
    pub total_items: usize,
}

impl ApplicationQuery {
    /// Builds the view state from query-string pairs. Unknown or bad values fall back to defaults.
    pub fn from_params(params: &HashMap<String, String>, per_page: usize) -> Self {
        let defaults = Self::default();

        Self {
            search: params
                .get("q")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            bucket: params.get("status").and_then(|s| Bucket::parse(s)),
            sort: params
                .get("sort")
                .and_then(|s| SortKey::parse(s))
                .unwrap_or(defaults.sort),
            descending: params
                .get("dir")
                .map(|d| d != "asc")
                .unwrap_or(defaults.descending),
            page: params
                .get("page")
                .and_then(|p| p.parse().ok())
                .filter(|p| *p > 0)
                .unwrap_or(1),
            per_page: per_page.max(1),
        }
    }

    fn matches(&self, app: &VisaApplication) -> bool {
        if let Some(bucket) = self.bucket {
            if Bucket::of(app) != Some(bucket) {
                return false;
            }
        }

        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let needle = needle.to_lowercase();

        app.id.to_string() == needle
            || app.applicant_name.to_lowercase().contains(&needle)
            || app.email.to_lowercase().contains(&needle)
            || app.country.to_lowercase().contains(&needle)
            || app
                .payment_reference
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(&needle))
    }

    /// Filter, sort and cut one page out of `apps`. Out-of-range pages clamp to the last page.
    pub fn select<'a>(&self, apps: &'a [VisaApplication]) -> Page<'a> {
        let matched = self.filter_sorted(apps);

        let per_page = self.per_page.max(1);
        let total_items = matched.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = self.page.clamp(1, total_pages);

        let start = (page - 1) * per_page;
        let items = matched.into_iter().skip(start).take(per_page).collect();

        Page {
            items,
            page,
            total_pages,
            total_items,
        }
    }

    /// All matches in display order, without pagination.
    pub fn filter_sorted<'a>(&self, apps: &'a [VisaApplication]) -> Vec<&'a VisaApplication> {
        let mut matched: Vec<&VisaApplication> = apps.iter().filter(|a| self.matches(a)).collect();

        matched.sort_by(|a, b| {
            let ord = self.sort.compare(a, b).then_with(|| a.id.cmp(&b.id));
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        matched
    }

    /// Query string for the same view on another page.
    pub fn to_query_string(&self, page: usize) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &self.search {
            out.append_pair("q", q);
        }
        if let Some(bucket) = self.bucket {
            out.append_pair("status", bucket.keyword());
        }
        out.append_pair("sort", self.sort.as_str());
        out.append_pair("dir", if self.descending { "desc" } else { "asc" });
        out.append_pair("page", &page.to_string());
        out.finish()
    }
}
