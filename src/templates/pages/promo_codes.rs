use crate::db::promo_codes::PromoCode;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn promo_codes_page(codes: &[PromoCode]) -> Markup {
    desktop_layout(
        "Promo codes",
        true,
        html! {
            main class="container" {
                h1 { "Promo codes" }

                div class="card" style="margin-bottom: 2rem;" {
                    @if codes.is_empty() {
                        p class="empty-state" { "No promo codes yet." }
                    } @else {
                        table style="width: 100%; border-collapse: collapse;" {
                            thead {
                                tr {
                                    th { "Code" }
                                    th { "Discount" }
                                    th { "Created" }
                                    th { "" }
                                }
                            }
                            tbody {
                                @for promo in codes {
                                    tr {
                                        td { code { (promo.code) } }
                                        td { (promo.percent_off) "%" }
                                        td { (promo.created_at.format("%Y-%m-%d").to_string()) }
                                        td {
                                            form action=(format!("/admin/promo-codes/{}/delete", promo.code)) method="post"
                                                onsubmit="return confirm('Delete this promo code?');" style="margin: 0;"
                                            {
                                                button type="submit" style="color: #dc2626; background: none; border: none; cursor: pointer;" {
                                                    "Delete"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div class="card" {
                    h3 { "New promo code" }
                    form action="/admin/promo-codes" method="post" style="display: flex; gap: 8px; align-items: center;" {
                        input type="text" name="code" placeholder="SUMMER10" required;
                        input type="number" name="percent_off" min="1" max="100" placeholder="% off" required;
                        button type="submit" { "Create" }
                    }
                }
            }
        },
    )
}
