use crate::domain::application::VisaApplication;
use crate::domain::status::humanize_label;
use crate::errors::ServerError;
use crate::responses::xlsx::attachment_name;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use chrono::Utc;
use rust_xlsxwriter::{Workbook, XlsxError};

const HEADERS: [&str; 10] = [
    "ID",
    "Applicant",
    "Email",
    "Country",
    "Visa Type",
    "Travellers",
    "Payment Ref",
    "Latest Status",
    "Last Update",
    "Updates",
];

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Builds the workbook bytes for a list of applications, one row each.
pub fn applications_workbook(apps: &[&VisaApplication]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err("header"))?;
    }

    for (i, app) in apps.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_number(r, 0, app.id as f64)
            .map_err(xlsx_err("id"))?;
        worksheet
            .write_string(r, 1, &app.applicant_name)
            .map_err(xlsx_err("applicant"))?;
        worksheet
            .write_string(r, 2, &app.email)
            .map_err(xlsx_err("email"))?;
        worksheet
            .write_string(r, 3, &app.country)
            .map_err(xlsx_err("country"))?;
        worksheet
            .write_string(r, 4, &app.visa_type)
            .map_err(xlsx_err("visa type"))?;
        worksheet
            .write_number(r, 5, f64::from(app.traveller_count))
            .map_err(xlsx_err("travellers"))?;
        worksheet
            .write_string(r, 6, app.payment_reference.as_deref().unwrap_or(""))
            .map_err(xlsx_err("payment ref"))?;

        let status = app
            .status_history
            .last_label()
            .map(humanize_label)
            .unwrap_or_else(|| "No status yet".to_string());
        worksheet
            .write_string(r, 7, &status)
            .map_err(xlsx_err("status"))?;

        let updated = app
            .last_updated()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        worksheet
            .write_string(r, 8, &updated)
            .map_err(xlsx_err("last update"))?;
        worksheet
            .write_number(r, 9, app.status_history.len() as f64)
            .map_err(xlsx_err("updates"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_applications_xlsx(apps: &[&VisaApplication]) -> ResultResp {
    let buffer = applications_workbook(apps)?;
    xlsx_response(
        buffer,
        &attachment_name("visa_applications", Utc::now().date_naive()),
    )
}
