use crate::domain::stats::{Bucket, StatusSummary};
use maud::{html, Markup};

/// Summary tiles linking to the list filtered by each bucket.
pub fn stat_tiles(summary: &StatusSummary) -> Markup {
    html! {
        div class="stat-tiles" {
            a class="stat-tile stat-total" href="/admin" {
                span class="stat-count" { (summary.total) }
                span class="stat-label" { "Total" }
            }
            @for bucket in Bucket::PRIORITY {
                a class=(format!("stat-tile stat-{}", bucket.keyword()))
                    href=(format!("/admin?status={}", bucket.keyword()))
                {
                    span class="stat-count" { (summary.count(bucket)) }
                    span class="stat-label" { (bucket.keyword()) }
                }
            }
        }
    }
}
