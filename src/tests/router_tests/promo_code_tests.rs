use crate::errors::ServerError;
use crate::tests::utils::{body_string, get, location, post_form, test_state, try_post_form};

#[test]
fn promo_codes_can_be_created_used_and_deleted() {
    let state = test_state();

    let resp = post_form(
        &state,
        "/admin/promo-codes",
        &[("code", "spring10"), ("percent_off", "10")],
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/promo-codes");

    let body = body_string(get(&state, "/admin/promo-codes"));
    assert!(body.contains("SPRING10"));
    assert!(body.contains("10%"));

    let resp = post_form(
        &state,
        "/admin/applications",
        &[
            ("applicant_name", "Asha Rao"),
            ("email", "asha@example.com"),
            ("country", "Dubai"),
            ("traveller_count", "1"),
            ("fee", "100"),
            ("promo_code", "Spring10"),
        ],
    );
    let detail = location(&resp).to_string();

    // 100.00 - 10.00 promo, then 18% of 90.00
    let body = body_string(get(&state, &detail));
    assert!(body.contains("Promo discount"));
    assert!(body.contains("-10.00"));
    assert!(body.contains("16.20"));
    assert!(body.contains("106.20"));

    let resp = post_form(&state, "/admin/promo-codes/SPRING10/delete", &[]);
    assert_eq!(resp.status(), 302);

    let body = body_string(get(&state, "/admin/promo-codes"));
    assert!(!body.contains("SPRING10"));

    // Deleted codes stop discounting.
    let body = body_string(get(&state, &detail));
    assert!(!body.contains("Promo discount"));
}

#[test]
fn duplicate_and_invalid_codes_are_bad_requests() {
    let state = test_state();
    post_form(&state, "/admin/promo-codes", &[("code", "DUP"), ("percent_off", "5")]);

    let err = try_post_form(&state, "/admin/promo-codes", &[("code", "dup"), ("percent_off", "5")])
        .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = try_post_form(&state, "/admin/promo-codes", &[("code", "HALF"), ("percent_off", "fifty")])
        .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = try_post_form(&state, "/admin/promo-codes/NOPE/delete", &[]).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}
