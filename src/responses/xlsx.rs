use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use chrono::NaiveDate;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `visa_applications` on 2026-03-01 downloads as `visa_applications-2026-03-01.xlsx`.
pub fn attachment_name(stem: &str, day: NaiveDate) -> String {
    format!("{stem}-{}.xlsx", day.format("%Y-%m-%d"))
}

pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", XLSX_MIME)
        .header("Content-Length", buffer.len())
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(buffer))
        .map_err(|_| ServerError::InternalError)
}
