// src/db/promo_codes.rs
use crate::errors::ServerError;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    pub code: String,
    pub percent_off: u32,
    pub created_at: NaiveDateTime,
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn create_promo_code(
    conn: &Connection,
    code: &str,
    percent_off: u32,
    now: DateTime<Utc>,
) -> Result<PromoCode, ServerError> {
    let code = normalize_code(code);
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ServerError::BadRequest("promo code must be letters, digits, - or _".into()));
    }
    if !(1..=100).contains(&percent_off) {
        return Err(ServerError::BadRequest("percent off must be between 1 and 100".into()));
    }

    conn.execute(
        "insert into promo_codes (code, percent_off, created_at) values (?, ?, ?)",
        params![code, percent_off, now.naive_utc()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            ServerError::BadRequest(format!("promo code {code} already exists"))
        }
        e => ServerError::DbError(format!("create promo code failed: {e}")),
    })?;

    Ok(PromoCode {
        code,
        percent_off,
        created_at: now.naive_utc(),
    })
}

pub fn find_promo_code(conn: &Connection, code: &str) -> Result<Option<PromoCode>, ServerError> {
    conn.query_row(
        "select code, percent_off, created_at from promo_codes where code = ?",
        params![normalize_code(code)],
        |row| {
            Ok(PromoCode {
                code: row.get(0)?,
                percent_off: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("promo code lookup failed: {e}")))
}

pub fn list_promo_codes(conn: &Connection) -> Result<Vec<PromoCode>, ServerError> {
    let mut stmt = conn
        .prepare("select code, percent_off, created_at from promo_codes order by code")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PromoCode {
                code: row.get(0)?,
                percent_off: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut codes = Vec::new();
    for r in rows {
        codes.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(codes)
}

/// Returns whether a row was removed.
pub fn delete_promo_code(conn: &Connection, code: &str) -> Result<bool, ServerError> {
    let removed = conn
        .execute(
            "delete from promo_codes where code = ?",
            params![normalize_code(code)],
        )
        .map_err(|e| ServerError::DbError(format!("delete promo code failed: {e}")))?;

    Ok(removed > 0)
}
