use crate::config::AppSettings;
use crate::db::connection::{init_db, Database};
use crate::router::handle;
use crate::state::AppState;
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// App state over a temp-file database. The file is removed on drop.
pub struct TestState {
    state: AppState,
    path: PathBuf,
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

impl Drop for TestState {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn temp_path(ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "visa_desk_test_{}_{}_{}.{ext}",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        DB_COUNTER.fetch_add(1, Ordering::SeqCst)
    ))
}

/// Fresh temp-file database using the production schema.
pub fn test_state() -> TestState {
    let path = temp_path("sqlite");
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    TestState {
        state: AppState::new(db, AppSettings::default()),
        path,
    }
}

pub fn get(state: &AppState, uri: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    handle(req, state).unwrap_or_else(|e| panic!("GET {uri} failed: {e}"))
}

pub fn try_get(state: &AppState, uri: &str) -> Result<Response, crate::errors::ServerError> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    handle(req, state)
}

pub fn try_post_form(
    state: &AppState,
    uri: &str,
    form: &[(&str, &str)],
) -> Result<Response, crate::errors::ServerError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();

    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.into_bytes()))
        .unwrap();

    handle(req, state)
}

pub fn post_form(state: &AppState, uri: &str, form: &[(&str, &str)]) -> Response {
    try_post_form(state, uri, form).unwrap_or_else(|e| panic!("POST {uri} failed: {e}"))
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Creates an application through the form and returns its id.
pub fn create_application(state: &AppState, name: &str, email: &str, country: &str) -> i64 {
    let resp = post_form(
        state,
        "/admin/applications",
        &[
            ("applicant_name", name),
            ("email", email),
            ("country", country),
            ("visa_type", "tourist 30 days"),
            ("traveller_count", "2"),
            ("fee", "100.00"),
        ],
    );

    assert_eq!(resp.status(), 302, "create should redirect");
    location(&resp)
        .rsplit('/')
        .next()
        .and_then(|id| id.parse().ok())
        .expect("redirect should end in the new id")
}

pub fn set_status(state: &AppState, id: i64, label: &str) {
    let resp = post_form(
        state,
        &format!("/admin/applications/{id}/status"),
        &[("label", label)],
    );
    assert_eq!(resp.status(), 302);
}
