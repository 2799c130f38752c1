use crate::domain::timeline::TimelineStep;
use crate::templates::{card, desktop_layout, status_badge, timeline};
use maud::{html, Markup};

pub struct TrackVm {
    pub application_id: i64,
    pub country: String,
    pub visa_type: String,
    pub traveller_count: u32,
    pub latest_label: Option<String>,
    pub steps: Vec<TimelineStep>,
}

pub fn track_page(vm: &TrackVm) -> Markup {
    desktop_layout(
        "Application status",
        false,
        html! {
            main class="container narrow" {
                h1 { "Application #" (vm.application_id) }
                p {
                    (vm.country) " · " (vm.visa_type) " · "
                    (vm.traveller_count) @if vm.traveller_count == 1 { " traveller" } @else { " travellers" }
                }
                p { "Current status: " (status_badge(vm.latest_label.as_deref())) }

                (card("Progress", timeline(&vm.steps)))
            }
        },
    )
}
