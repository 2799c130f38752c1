use crate::domain::stats::{Bucket, StatusSummary};
use crate::domain::view::{ApplicationQuery, Page, SortKey};
use crate::templates::{desktop_layout, stat_tiles, status_badge};
use maud::{html, Markup};

pub struct AdminVm<'a> {
    pub summary: StatusSummary,
    pub query: ApplicationQuery,
    pub page: Page<'a>,
}

pub fn admin_page(vm: &AdminVm<'_>) -> Markup {
    desktop_layout(
        "Applications",
        true,
        html! {
            main class="container" {
                h1 { "Visa Applications" }

                (stat_tiles(&vm.summary))

                div class="card" style="margin-bottom: 2rem;" {
                    (filter_form(&vm.query))
                    (applications_table(vm))
                    (pagination(vm))
                }

                (new_application_form())
            }
        },
    )
}

fn filter_form(query: &ApplicationQuery) -> Markup {
    html! {
        form action="/admin" method="get" class="filters" style="display: flex; gap: 10px; align-items: center;" {
            input type="search" name="q" placeholder="Search name, email, country, payment ref…"
                value=(query.search.as_deref().unwrap_or(""));

            select name="status" {
                option value="" selected[query.bucket.is_none()] { "All statuses" }
                @for bucket in Bucket::PRIORITY {
                    option value=(bucket.keyword()) selected[query.bucket == Some(bucket)] { (bucket.keyword()) }
                }
            }

            select name="sort" {
                @for key in SortKey::ALL {
                    option value=(key.as_str()) selected[query.sort == key] { "Sort by " (key.as_str()) }
                }
            }

            select name="dir" {
                option value="desc" selected[query.descending] { "Descending" }
                option value="asc" selected[!query.descending] { "Ascending" }
            }

            button type="submit" { "Apply" }
            a href=(format!("/admin/export?{}", query.to_query_string(1))) { "Export XLSX" }
        }
    }
}

fn applications_table(vm: &AdminVm<'_>) -> Markup {
    html! {
        @if vm.page.items.is_empty() {
            p class="empty-state" { "No applications match." }
        } @else {
            div style="overflow-x: auto;" {
                table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                    thead {
                        tr {
                            th { "ID" }
                            th { "Applicant" }
                            th { "Country" }
                            th { "Visa" }
                            th { "Travellers" }
                            th { "Payment Ref" }
                            th { "Status" }
                            th { "Updated" }
                        }
                    }
                    tbody {
                        @for app in &vm.page.items {
                            tr {
                                td { a href=(format!("/admin/applications/{}", app.id)) { "#" (app.id) } }
                                td {
                                    (app.applicant_name)
                                    br;
                                    span style="color: #6b7280; font-size: 0.85em;" { (app.email) }
                                }
                                td { (app.country) }
                                td { (app.visa_type) }
                                td { (app.traveller_count) }
                                td { (app.payment_reference.as_deref().unwrap_or("—")) }
                                td { (status_badge(app.status_history.last_label())) }
                                td style="color: #6b7280; font-size: 0.9em;" {
                                    @match app.last_updated() {
                                        Some(ts) => (ts.format("%Y-%m-%d %H:%M").to_string()),
                                        None => "—",
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn pagination(vm: &AdminVm<'_>) -> Markup {
    let page = vm.page.page;
    let total_pages = vm.page.total_pages;

    html! {
        nav class="pagination" {
            @if page > 1 {
                a href=(format!("/admin?{}", vm.query.to_query_string(page - 1))) { "← Previous" }
            }
            span { "Page " (page) " of " (total_pages) " · " (vm.page.total_items) " applications" }
            @if page < total_pages {
                a href=(format!("/admin?{}", vm.query.to_query_string(page + 1))) { "Next →" }
            }
        }
    }
}

fn new_application_form() -> Markup {
    html! {
        div class="card" {
            h3 { "New application" }
            form action="/admin/applications" method="post" style="display: grid; gap: 8px; max-width: 480px;" {
                input type="text" name="applicant_name" placeholder="Applicant name" required;
                input type="email" name="email" placeholder="Email" required;
                input type="text" name="country" placeholder="Destination country" required;
                input type="text" name="visa_type" placeholder="Visa type (e.g. tourist 30 days)";
                input type="number" name="traveller_count" min="1" value="1" required;
                input type="number" name="fee" min="0" step="0.01" placeholder="Fee per traveller";
                input type="text" name="payment_reference" placeholder="Payment reference";
                input type="text" name="promo_code" placeholder="Promo code";
                button type="submit" style="padding: 8px 16px; background: #10b981; color: white; border: none; border-radius: 4px; cursor: pointer;" {
                    "Create application"
                }
            }
        }
    }
}
