use maud::{html, Markup};

pub mod stats;
pub mod timeline;

pub use stats::stat_tiles;
pub use timeline::{status_badge, timeline};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
