use crate::errors::ServerError;
use crate::tests::utils::{body_string, create_application, get, set_status, test_state, try_get};

#[test]
fn home_page_has_the_lookup_form() {
    let state = test_state();
    let body = body_string(get(&state, "/"));

    assert!(body.contains("Track your visa application"));
    assert!(body.contains(r#"action="/track""#));
}

#[test]
fn traveler_sees_the_same_timeline_as_the_back_office() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    set_status(&state, id, "document_received");

    let resp = get(&state, &format!("/track?id={id}&email=ASHA@example.com"));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains(&format!("Application #{id}")));
    assert!(body.contains("2 travellers"));
    assert!(body.contains("step-current"));
    assert!(body.contains("Document Received"));
    assert!(body.contains("In Process With Embassy"));
    // No back-office links for travelers.
    assert!(!body.contains("/admin/promo-codes"));
}

#[test]
fn approved_application_shows_no_upcoming_steps() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    set_status(&state, id, "visa_approved");

    let body = body_string(get(&state, &format!("/track?id={id}&email=asha@example.com")));
    assert!(body.contains("Visa Approved"));
    assert!(!body.contains("step-pending"));
}

#[test]
fn wrong_email_looks_like_a_missing_application() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    let err = try_get(&state, &format!("/track?id={id}&email=someone@else.com")).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));

    let err = try_get(&state, "/track?id=999&email=asha@example.com").unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn lookup_needs_a_numeric_id_and_an_email() {
    let state = test_state();

    assert!(matches!(
        try_get(&state, "/track?id=abc&email=a@b.com"),
        Err(ServerError::BadRequest(_))
    ));
    assert!(matches!(try_get(&state, "/track?id=1"), Err(ServerError::BadRequest(_))));
}
