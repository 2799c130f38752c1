use crate::db::applications::{self, NewApplication};
use crate::db::promo_codes;
use crate::domain::application::VisaApplication;
use crate::domain::pricing::{parse_amount, quote};
use crate::domain::stats::aggregate;
use crate::domain::status::is_rejection;
use crate::domain::timeline::build_timeline;
use crate::domain::view::ApplicationQuery;
use crate::errors::ServerError;
use crate::responses::{html_response, json_response, redirect, ResultResp};
use crate::spreadsheets::export_applications_xlsx;
use crate::state::AppState;
use crate::templates::pages::{self, AdminVm, ApplicationVm, TrackVm};
use astra::Request;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;

/// Form bodies larger than this are rejected.
const MAX_FORM_BYTES: u64 = 64 * 1024;

type Params = HashMap<String, String>;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_query(&req);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => html_response(pages::home_page()),
        ("GET", ["track"]) => track(state, &query),

        // Back office
        ("GET", ["admin"]) => admin_dashboard(state, &query),
        ("GET", ["admin", "export"]) => export_applications(state, &query),
        ("POST", ["admin", "applications"]) => create_application(state, &read_form(req)?),
        ("GET", ["admin", "applications", id]) => application_detail(state, parse_id(id)?),
        ("POST", ["admin", "applications", id, "status"]) => {
            let id = parse_id(id)?;
            update_status(state, id, &read_form(req)?)
        }
        ("GET", ["admin", "promo-codes"]) => promo_codes_page(state),
        ("POST", ["admin", "promo-codes"]) => create_promo_code(state, &read_form(req)?),
        ("POST", ["admin", "promo-codes", code, "delete"]) => delete_promo_code(state, code),

        // JSON
        ("GET", ["api", "applications"]) => {
            let apps = state.db.with_conn(|conn| applications::list_applications(conn))?;
            json_response(&apps)
        }
        ("GET", ["api", "applications", id]) => {
            let app = load_application(state, parse_id(id)?)?;
            json_response(&json!({
                "application": app,
                "latestStatus": app.latest_status(),
                "timeline": build_timeline(&app.status_history, &state.settings.stages),
            }))
        }
        ("GET", ["api", "applications", id, "timeline"]) => {
            let app = load_application(state, parse_id(id)?)?;
            json_response(&build_timeline(&app.status_history, &state.settings.stages))
        }
        ("GET", ["api", "stats"]) => {
            let apps = state.db.with_conn(|conn| applications::list_applications(conn))?;
            json_response(&aggregate(&apps).as_map())
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> Params {
    req.uri()
        .query()
        .map(|q| decode_pairs(q.as_bytes()))
        .unwrap_or_default()
}

fn read_form(req: Request) -> Result<Params, ServerError> {
    let mut body = req.into_body();
    let mut raw = Vec::new();

    body.reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("failed to read form body: {e}")))?;

    if raw.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("form body too large".into()));
    }

    Ok(decode_pairs(&raw))
}

// Last value wins for repeated keys.
fn decode_pairs(raw: &[u8]) -> Params {
    url::form_urlencoded::parse(raw).into_owned().collect()
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

fn field<'a>(form: &'a Params, key: &str) -> Option<&'a str> {
    form.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn load_application(state: &AppState, id: i64) -> Result<VisaApplication, ServerError> {
    state
        .db
        .with_conn(|conn| applications::get_application(conn, id))?
        .ok_or(ServerError::NotFound)
}

fn track(state: &AppState, query: &Params) -> ResultResp {
    let id = field(query, "id")
        .ok_or_else(|| ServerError::BadRequest("application number is required".into()))?
        .parse::<i64>()
        .map_err(|_| ServerError::BadRequest("application number must be a number".into()))?;
    let email = field(query, "email")
        .ok_or_else(|| ServerError::BadRequest("email is required".into()))?;

    // Same answer for "no such application" and "wrong email".
    let app = state
        .db
        .with_conn(|conn| applications::get_application(conn, id))?
        .filter(|app| app.email.eq_ignore_ascii_case(email))
        .ok_or(ServerError::NotFound)?;

    let vm = TrackVm {
        application_id: app.id,
        steps: build_timeline(&app.status_history, &state.settings.stages),
        latest_label: app.status_history.last_label().map(str::to_string),
        country: app.country,
        visa_type: app.visa_type,
        traveller_count: app.traveller_count,
    };

    html_response(pages::track_page(&vm))
}

fn admin_dashboard(state: &AppState, query: &Params) -> ResultResp {
    let apps = state.db.with_conn(|conn| applications::list_applications(conn))?;
    let query = ApplicationQuery::from_params(query, state.settings.page_size);

    let vm = AdminVm {
        summary: aggregate(&apps),
        page: query.select(&apps),
        query,
    };

    html_response(pages::admin_page(&vm))
}

fn export_applications(state: &AppState, query: &Params) -> ResultResp {
    let apps = state.db.with_conn(|conn| applications::list_applications(conn))?;
    let query = ApplicationQuery::from_params(query, state.settings.page_size);

    export_applications_xlsx(&query.filter_sorted(&apps))
}

fn application_detail(state: &AppState, id: i64) -> ResultResp {
    let (app, percent_off) = state.db.with_conn(|conn| {
        let app = applications::get_application(conn, id)?.ok_or(ServerError::NotFound)?;
        // A deleted promo code no longer discounts.
        let percent_off = match app.promo_code.as_deref() {
            Some(code) => promo_codes::find_promo_code(conn, code)?
                .map(|p| p.percent_off)
                .unwrap_or(0),
            None => 0,
        };
        Ok((app, percent_off))
    })?;

    let settings = &state.settings;
    let vm = ApplicationVm {
        app: &app,
        steps: build_timeline(&app.status_history, &settings.stages),
        quote: quote(app.fee_cents, app.traveller_count, percent_off, settings.tax_percent),
        tax_percent: settings.tax_percent,
        selectable_labels: settings.stages.selectable_labels(),
    };

    html_response(pages::application_page(&vm))
}

fn update_status(state: &AppState, id: i64, form: &Params) -> ResultResp {
    // A typed custom status overrides the select.
    let label = field(form, "custom_label")
        .or_else(|| field(form, "label"))
        .ok_or_else(|| ServerError::BadRequest("status label is required".into()))?;

    let rejection_reason = if is_rejection(label) {
        field(form, "rejection_reason")
    } else {
        None
    };

    state.db.with_conn(|conn| {
        applications::append_status_event(conn, id, label, rejection_reason, Utc::now())
    })?;

    redirect(&format!("/admin/applications/{id}"))
}

fn create_application(state: &AppState, form: &Params) -> ResultResp {
    let traveller_count = match field(form, "traveller_count") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ServerError::BadRequest("traveller count must be a whole number".into()))?,
        None => 1,
    };
    let fee_cents = match field(form, "fee") {
        Some(raw) => parse_amount(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("invalid fee amount {raw}")))?,
        None => 0,
    };

    let new = NewApplication {
        applicant_name: field(form, "applicant_name").unwrap_or_default().to_string(),
        email: field(form, "email").unwrap_or_default().to_string(),
        country: field(form, "country").unwrap_or_default().to_string(),
        visa_type: field(form, "visa_type").unwrap_or("tourist").to_string(),
        traveller_count,
        fee_cents,
        payment_reference: field(form, "payment_reference").map(str::to_string),
        promo_code: field(form, "promo_code").map(str::to_string),
    };

    let id = state
        .db
        .with_conn(|conn| applications::insert_application(conn, &new, Utc::now()))?;

    redirect(&format!("/admin/applications/{id}"))
}

fn promo_codes_page(state: &AppState) -> ResultResp {
    let codes = state.db.with_conn(|conn| promo_codes::list_promo_codes(conn))?;
    html_response(pages::promo_codes_page(&codes))
}

fn create_promo_code(state: &AppState, form: &Params) -> ResultResp {
    let code = field(form, "code")
        .ok_or_else(|| ServerError::BadRequest("promo code is required".into()))?;
    let percent_off = field(form, "percent_off")
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(|| ServerError::BadRequest("percent off must be a whole number".into()))?;

    state
        .db
        .with_conn(|conn| promo_codes::create_promo_code(conn, code, percent_off, Utc::now()))?;

    redirect("/admin/promo-codes")
}

fn delete_promo_code(state: &AppState, code: &str) -> ResultResp {
    let removed = state
        .db
        .with_conn(|conn| promo_codes::delete_promo_code(conn, code))?;

    if !removed {
        return Err(ServerError::NotFound);
    }

    redirect("/admin/promo-codes")
}
