// templates/pages/home.rs

use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Track your visa",
        false,
        html! {
            main class="container narrow" {
                h1 { "Track your visa application" }

                (card("Application status", html! {
                    form action="/track" method="get" class="track-form" {
                        label for="id" { "Application number" }
                        input type="number" id="id" name="id" min="1" required;

                        label for="email" { "Email used when applying" }
                        input type="email" id="email" name="email" autocomplete="email" required;

                        button type="submit" class="primary" { "Check status" }
                    }
                }))
            }
        },
    )
}
