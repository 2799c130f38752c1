use crate::domain::stats::Bucket;
use crate::domain::status::humanize_label;
use crate::domain::timeline::TimelineStep;
use maud::{html, Markup};

/// Renders a derived timeline. The same markup is used by the back office and the traveler page.
pub fn timeline(steps: &[TimelineStep]) -> Markup {
    html! {
        @if steps.is_empty() {
            p class="empty-state" { "No status recorded yet." }
        } @else {
            ol class="timeline" {
                @for step in steps {
                    li class=(format!("timeline-step step-{}", step.status.as_str())) data-step=(step.id) {
                        span class="step-marker" aria-hidden="true" {}
                        div class="step-body" {
                            strong class="step-name" { (step.display_name()) }
                            span class="step-state" { (step.status.as_str()) }
                            @let date = step.display_date();
                            @if !date.is_empty() {
                                time class="step-date" datetime=(date) { (date) }
                            }
                            @if let Some(reason) = &step.rejection_reason {
                                p class="rejection-reason" { "Reason: " (reason) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Badge for an application's latest label, coloured by its dashboard bucket.
pub fn status_badge(label: Option<&str>) -> Markup {
    let Some(label) = label else {
        return html! { span class="badge badge-none" { "No status yet" } };
    };

    let class = match Bucket::classify(label) {
        Some(bucket) => format!("badge badge-{}", bucket.keyword()),
        None => "badge badge-other".to_string(),
    };

    html! {
        span class=(class) { (humanize_label(label)) }
    }
}
