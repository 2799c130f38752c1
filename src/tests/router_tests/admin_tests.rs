use crate::errors::ServerError;
use crate::tests::utils::{
    body_string, create_application, get, location, post_form, set_status, test_state,
    try_get, try_post_form,
};

#[test]
fn admin_page_lists_applications_with_stat_tiles() {
    let state = test_state();
    let first = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    let second = create_application(&state, "Bilal Khan", "bilal@example.com", "Singapore");
    create_application(&state, "Chen Wei", "chen@example.com", "Thailand");
    set_status(&state, second, "visa_approved");

    let resp = get(&state, "/admin");
    assert_eq!(resp.status(), 200, "Admin page should load");

    let body = body_string(resp);
    assert!(body.contains("Visa Applications"));
    assert!(body.contains("asha@example.com"));
    assert!(body.contains(&format!("/admin/applications/{first}")));
    assert!(body.contains(r#"<a class="stat-tile stat-total" href="/admin"><span class="stat-count">3</span>"#));
    assert!(body.contains(r#"href="/admin?status=pending"><span class="stat-count">2</span>"#));
    assert!(body.contains(r#"href="/admin?status=approved"><span class="stat-count">1</span>"#));
    assert!(body.contains("Visa Approved"));
}

#[test]
fn bucket_filter_and_search_narrow_the_table() {
    let state = test_state();
    let asha = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    let bilal = create_application(&state, "Bilal Khan", "bilal@example.com", "Singapore");
    set_status(&state, bilal, "visa_rejected");

    let body = body_string(get(&state, "/admin?status=rejected"));
    assert!(body.contains("bilal@example.com"));
    assert!(!body.contains("asha@example.com"));

    let body = body_string(get(&state, "/admin?q=dub"));
    assert!(body.contains(&format!("/admin/applications/{asha}")));
    assert!(!body.contains("bilal@example.com"));

    // Tiles always summarize everything, not just the filtered rows.
    assert!(body.contains(r#"<span class="stat-count">2</span>"#));
}

#[test]
fn pagination_links_keep_the_view() {
    let state = test_state();
    for i in 0..12 {
        create_application(&state, &format!("Traveller {i}"), &format!("t{i}@example.com"), "Dubai");
    }

    let body = body_string(get(&state, "/admin?q=dubai&page=2"));
    assert!(body.contains("Page 2 of 2"));
    assert!(body.contains("12 applications"));
    assert!(body.contains("/admin?q=dubai&amp;sort=id&amp;dir=desc&amp;page=1"));
}

#[test]
fn detail_page_shows_timeline_and_quote() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    set_status(&state, id, "document_received");

    let resp = get(&state, &format!("/admin/applications/{id}"));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Application #"));
    assert!(body.contains("timeline-step step-completed"));
    assert!(body.contains("timeline-step step-current"));
    assert!(body.contains("Document Verified"));
    assert!(body.contains("In Process With Embassy"));
    // 2 travellers x 100.00, 18% tax
    assert!(body.contains("200.00"));
    assert!(body.contains("36.00"));
    assert!(body.contains("236.00"));
}

#[test]
fn appending_a_status_redirects_back_to_the_detail_page() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    let resp = post_form(
        &state,
        &format!("/admin/applications/{id}/status"),
        &[("label", "visa_rejected"), ("rejection_reason", "Insufficient funds")],
    );

    assert_eq!(resp.status(), 302, "Should redirect after update");
    assert_eq!(location(&resp), format!("/admin/applications/{id}"));

    let body = body_string(get(&state, &format!("/admin/applications/{id}")));
    assert!(body.contains("Reason: Insufficient funds"));
    assert!(!body.contains("step-pending"));
    assert!(!body.contains("step-current"));
}

#[test]
fn custom_label_wins_and_reason_is_dropped_for_non_rejections() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    post_form(
        &state,
        &format!("/admin/applications/{id}/status"),
        &[
            ("label", "document_received"),
            ("custom_label", "Waiting on bank letter"),
            ("rejection_reason", "should not show"),
        ],
    );

    let body = body_string(get(&state, &format!("/admin/applications/{id}")));
    assert!(body.contains("Waiting On Bank Letter"));
    assert!(!body.contains("should not show"));
    // Unknown pipeline position: nothing pending is synthesized.
    assert!(!body.contains("step-pending"));
}

#[test]
fn bad_status_posts_are_rejected() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    let err = try_post_form(
        &state,
        &format!("/admin/applications/{id}/status"),
        &[("label", "  ")],
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = try_post_form(
        &state,
        "/admin/applications/9999/status",
        &[("label", "document_received")],
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn huge_fee_is_refused_and_the_largest_allowed_quote_renders() {
    let state = test_state();

    let err = try_post_form(
        &state,
        "/admin/applications",
        &[
            ("applicant_name", "Asha"),
            ("email", "asha@example.com"),
            ("country", "Dubai"),
            ("fee", "90000000000000000"),
            ("traveller_count", "1000"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let resp = post_form(
        &state,
        "/admin/applications",
        &[
            ("applicant_name", "Asha"),
            ("email", "asha@example.com"),
            ("country", "Dubai"),
            ("fee", "100000000.00"),
            ("traveller_count", "100"),
        ],
    );
    assert_eq!(resp.status(), 302);

    let resp = get(&state, location(&resp));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("10000000000.00"));
}

#[test]
fn create_application_validates_input() {
    let state = test_state();

    let err = try_post_form(
        &state,
        "/admin/applications",
        &[("applicant_name", "Asha"), ("email", "asha@example.com"), ("country", "Dubai"), ("fee", "12.345")],
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = try_post_form(
        &state,
        "/admin/applications",
        &[("applicant_name", "Asha"), ("email", "not-an-email"), ("country", "Dubai")],
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn export_returns_an_xlsx_attachment() {
    let state = test_state();
    create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    let resp = get(&state, "/admin/export?status=pending");
    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"visa_applications-"));
    assert!(disposition.ends_with(".xlsx\""));

    let body = {
        use std::io::Read;
        let mut bytes = Vec::new();
        resp.into_body().reader().read_to_end(&mut bytes).unwrap();
        bytes
    };
    // XLSX files are zip archives.
    assert!(body.starts_with(b"PK"));
}

#[test]
fn unknown_routes_are_not_found() {
    let state = test_state();
    assert!(matches!(try_get(&state, "/nope"), Err(ServerError::NotFound)));
    assert!(matches!(try_get(&state, "/admin/applications/abc"), Err(ServerError::NotFound)));
    assert!(matches!(try_get(&state, "/admin/applications/42"), Err(ServerError::NotFound)));
}
