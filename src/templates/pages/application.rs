use crate::domain::application::VisaApplication;
use crate::domain::pricing::{format_cents, Quote};
use crate::domain::status::humanize_label;
use crate::domain::timeline::TimelineStep;
use crate::templates::{card, desktop_layout, status_badge, timeline};
use maud::{html, Markup};

pub struct ApplicationVm<'a> {
    pub app: &'a VisaApplication,
    pub steps: Vec<TimelineStep>,
    pub quote: Quote,
    pub tax_percent: u32,
    /// What the status form's select offers.
    pub selectable_labels: Vec<&'a str>,
}

pub fn application_page(vm: &ApplicationVm<'_>) -> Markup {
    let app = vm.app;

    desktop_layout(
        &format!("Application #{}", app.id),
        true,
        html! {
            main class="container" {
                p { a href="/admin" { "← All applications" } }
                h1 { "Application #" (app.id) " · " (app.applicant_name) }
                p { "Current status: " (status_badge(app.status_history.last_label())) }

                (card("Details", html! {
                    dl class="details" {
                        dt { "Email" } dd { (app.email) }
                        dt { "Country" } dd { (app.country) }
                        dt { "Visa type" } dd { (app.visa_type) }
                        dt { "Travellers" } dd { (app.traveller_count) }
                        dt { "Payment reference" } dd { (app.payment_reference.as_deref().unwrap_or("—")) }
                        dt { "Promo code" } dd { (app.promo_code.as_deref().unwrap_or("—")) }
                        @if let Some(created) = app.created_at {
                            dt { "Submitted" } dd { (created.format("%Y-%m-%d %H:%M").to_string()) }
                        }
                    }
                }))

                (card("Fees", quote_table(&vm.quote, vm.tax_percent)))

                (card("Timeline", timeline(&vm.steps)))

                (card("Update status", status_form(vm)))
            }
        },
    )
}

fn quote_table(quote: &Quote, tax_percent: u32) -> Markup {
    html! {
        table class="quote" {
            tbody {
                tr { th { "Subtotal" } td { (format_cents(quote.subtotal)) } }
                @if quote.discount > 0 {
                    tr { th { "Promo discount" } td { "-" (format_cents(quote.discount)) } }
                }
                tr { th { "Tax (" (tax_percent) "%)" } td { (format_cents(quote.tax)) } }
                tr class="total" { th { "Total" } td { (format_cents(quote.total)) } }
            }
        }
    }
}

fn status_form(vm: &ApplicationVm<'_>) -> Markup {
    html! {
        form action=(format!("/admin/applications/{}/status", vm.app.id)) method="post"
            style="display: grid; gap: 8px; max-width: 480px;"
        {
            label for="label" { "New status" }
            select name="label" id="label" {
                @for label in vm.selectable_labels.iter().copied() {
                    option value=(label) { (humanize_label(label)) }
                }
            }

            label for="custom_label" { "…or a custom status" }
            input type="text" name="custom_label" id="custom_label" placeholder="e.g. Waiting on bank letter";

            label for="rejection_reason" { "Rejection reason (only shown for Visa Rejected)" }
            textarea name="rejection_reason" id="rejection_reason" rows="2" {}

            button type="submit" class="primary" { "Append status" }
        }
    }
}
