// src/db/applications.rs
use crate::db::promo_codes::{find_promo_code, normalize_code};
use crate::domain::application::{StatusEvent, StatusHistory, VisaApplication};
use crate::domain::status::PENDING;
use crate::errors::ServerError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use tracing::info;

/// Upper bounds for form input.
pub const MAX_TRAVELLERS: u32 = 100;
pub const MAX_FEE_CENTS: i64 = 10_000_000_000;

/// Form input for a new application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub applicant_name: String,
    pub email: String,
    pub country: String,
    pub visa_type: String,
    pub traveller_count: u32,
    pub fee_cents: i64,
    pub payment_reference: Option<String>,
    pub promo_code: Option<String>,
}

impl NewApplication {
    fn validate(&self) -> Result<(), ServerError> {
        if self.applicant_name.trim().is_empty() {
            return Err(ServerError::BadRequest("applicant name is required".into()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        if self.country.trim().is_empty() {
            return Err(ServerError::BadRequest("country is required".into()));
        }
        if self.traveller_count == 0 {
            return Err(ServerError::BadRequest("at least one traveller is required".into()));
        }
        if self.traveller_count > MAX_TRAVELLERS {
            return Err(ServerError::BadRequest(format!(
                "at most {MAX_TRAVELLERS} travellers per application"
            )));
        }
        if self.fee_cents < 0 {
            return Err(ServerError::BadRequest("fee cannot be negative".into()));
        }
        if self.fee_cents > MAX_FEE_CENTS {
            return Err(ServerError::BadRequest("fee is too large".into()));
        }
        Ok(())
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Creates the application and records its initial `pending` status.
pub fn insert_application(
    conn: &mut Connection,
    new: &NewApplication,
    now: DateTime<Utc>,
) -> Result<i64, ServerError> {
    new.validate()?;

    let promo_code = match blank_to_none(&new.promo_code) {
        Some(code) => {
            let promo = find_promo_code(conn, &code)?
                .ok_or_else(|| ServerError::BadRequest(format!("unknown promo code {}", normalize_code(&code))))?;
            Some(promo.code)
        }
        None => None,
    };

    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin insert application failed: {e}")))?;

    tx.execute(
        r#"
        insert into applications
            (applicant_name, email, country, visa_type, traveller_count,
             fee_cents, payment_reference, promo_code, created_at)
        values (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            new.applicant_name.trim(),
            new.email.trim().to_lowercase(),
            new.country.trim(),
            new.visa_type.trim(),
            new.traveller_count,
            new.fee_cents,
            blank_to_none(&new.payment_reference),
            promo_code,
            now.naive_utc(),
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert application failed: {e}")))?;

    let id = tx.last_insert_rowid();

    tx.execute(
        "insert into status_events (application_id, seq, label, recorded_at) values (?, 1, ?, ?)",
        params![id, PENDING, timestamp(now)],
    )
    .map_err(|e| ServerError::DbError(format!("insert initial status failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit insert application failed: {e}")))?;

    info!(application_id = id, "application created");
    Ok(id)
}

/// Appends a status event. The history is never rewritten, only extended.
///
/// `rejection_reason` is kept only when provided and non-blank.
pub fn append_status_event(
    conn: &mut Connection,
    application_id: i64,
    label: &str,
    rejection_reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<StatusEvent, ServerError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(ServerError::BadRequest("status label is required".into()));
    }
    let rejection_reason = rejection_reason.map(str::trim).filter(|s| !s.is_empty());

    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin append status failed: {e}")))?;

    let exists = tx
        .query_row(
            "select 1 from applications where id = ?",
            params![application_id],
            |_| Ok(()),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("application lookup failed: {e}")))?
        .is_some();

    if !exists {
        return Err(ServerError::NotFound);
    }

    let next_seq: i64 = tx
        .query_row(
            "select coalesce(max(seq), 0) + 1 from status_events where application_id = ?",
            params![application_id],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("next status seq failed: {e}")))?;

    let recorded_at = timestamp(now);

    tx.execute(
        r#"
        insert into status_events (application_id, seq, label, recorded_at, rejection_reason)
        values (?, ?, ?, ?, ?)
        "#,
        params![application_id, next_seq, label, recorded_at, rejection_reason],
    )
    .map_err(|e| ServerError::DbError(format!("append status failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit append status failed: {e}")))?;

    info!(application_id, seq = next_seq, label, "status appended");

    let event = StatusEvent::new(label, Some(recorded_at));
    Ok(match rejection_reason {
        Some(reason) => event.with_rejection_reason(reason),
        None => event,
    })
}

const SELECT_APPLICATION: &str = r#"
    select id, applicant_name, email, country, visa_type, traveller_count,
           fee_cents, payment_reference, promo_code, created_at
    from applications
"#;

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<VisaApplication> {
    Ok(VisaApplication {
        id: row.get(0)?,
        applicant_name: row.get(1)?,
        email: row.get(2)?,
        country: row.get(3)?,
        visa_type: row.get(4)?,
        traveller_count: row.get(5)?,
        fee_cents: row.get(6)?,
        payment_reference: row.get(7)?,
        promo_code: row.get(8)?,
        created_at: row.get::<_, Option<NaiveDateTime>>(9)?,
        status_history: StatusHistory::new(),
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, StatusEvent)> {
    Ok((
        row.get(0)?,
        StatusEvent {
            label: row.get(1)?,
            date: row.get(2)?,
            rejection_reason: row.get(3)?,
        },
    ))
}

/// Every application with its full history, oldest application first.
pub fn list_applications(conn: &Connection) -> Result<Vec<VisaApplication>, ServerError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_APPLICATION} order by id"))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], application_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut apps = Vec::new();
    for r in rows {
        apps.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }

    let mut stmt = conn
        .prepare(
            "select application_id, label, recorded_at, rejection_reason from status_events order by application_id, seq",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], event_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut histories: HashMap<i64, StatusHistory> = HashMap::new();
    for r in rows {
        let (app_id, event) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        histories.entry(app_id).or_default().push(event);
    }

    for app in &mut apps {
        if let Some(history) = histories.remove(&app.id) {
            app.status_history = history;
        }
    }

    Ok(apps)
}

pub fn get_application(conn: &Connection, id: i64) -> Result<Option<VisaApplication>, ServerError> {
    let app = conn
        .query_row(
            &format!("{SELECT_APPLICATION} where id = ?"),
            params![id],
            application_from_row,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("load application failed: {e}")))?;

    let Some(mut app) = app else {
        return Ok(None);
    };

    app.status_history = load_history(conn, id)?;
    Ok(Some(app))
}

pub fn load_history(conn: &Connection, application_id: i64) -> Result<StatusHistory, ServerError> {
    let mut stmt = conn
        .prepare(
            "select application_id, label, recorded_at, rejection_reason from status_events where application_id = ? order by seq",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![application_id], event_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut history = StatusHistory::new();
    for r in rows {
        let (_, event) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        history.push(event);
    }
    Ok(history)
}
