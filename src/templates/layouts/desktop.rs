use maud::{html, Markup, DOCTYPE};

/// `back_office` switches the nav to the admin links.
pub fn desktop_layout(title: &str, back_office: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Visa Desk" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { a href="/" { "Visa Desk" } }
                    nav {
                        ul {
                            li { a href="/" { "Track application" } }
                            @if back_office {
                                li { a href="/admin" { "Applications" } }
                                li { a href="/admin/promo-codes" { "Promo codes" } }
                            }
                        }
                    }
                }
                (content)
            }
        }
    }
}
