use crate::tests::utils::{body_string, create_application, get, post_form, set_status, test_state};
use serde_json::Value;

fn get_json(state: &crate::state::AppState, uri: &str) -> Value {
    let resp = get(state, uri);
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );
    serde_json::from_str(&body_string(resp)).unwrap()
}

#[test]
fn timeline_endpoint_serializes_derived_steps() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");

    let steps = get_json(&state, &format!("/api/applications/{id}/timeline"));
    let steps = steps.as_array().unwrap();

    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["id"], 1);
    assert_eq!(steps[0]["name"], "pending");
    assert_eq!(steps[0]["status"], "current");
    assert_eq!(steps[0]["date"].as_str().map(str::len), Some(10));
    assert_eq!(steps[3]["name"], "in_process_with_embassy");
    assert_eq!(steps[3]["status"], "pending");
    assert!(steps[3]["date"].is_null());
    assert!(steps[3].get("rejectionReason").is_none());
}

#[test]
fn application_endpoint_carries_history_in_camel_case() {
    let state = test_state();
    let id = create_application(&state, "Asha Rao", "asha@example.com", "Dubai");
    post_form(
        &state,
        &format!("/admin/applications/{id}/status"),
        &[("label", "visa_rejected"), ("rejection_reason", "Insufficient funds")],
    );

    let json = get_json(&state, &format!("/api/applications/{id}"));

    assert_eq!(json["latestStatus"], "visa_rejected");
    let history = json["application"]["statusHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["label"], "visa_rejected");
    assert_eq!(history[1]["rejectionReason"], "Insufficient funds");

    let timeline = json["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1]["status"], "completed");
    assert_eq!(timeline[1]["rejectionReason"], "Insufficient funds");
}

#[test]
fn stats_endpoint_counts_by_bucket() {
    let state = test_state();
    let a = create_application(&state, "A", "a@example.com", "Dubai");
    let b = create_application(&state, "B", "b@example.com", "Dubai");
    let c = create_application(&state, "C", "c@example.com", "Dubai");
    create_application(&state, "D", "d@example.com", "Dubai");
    set_status(&state, a, "visa_approved");
    set_status(&state, b, "document_verified");
    set_status(&state, c, "Visa issued at counter");

    let stats = get_json(&state, "/api/stats");

    assert_eq!(stats["total"], 4);
    assert_eq!(stats["approved"], 1);
    assert_eq!(stats["issued"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["processing"], 0);
    assert_eq!(stats["rejected"], 0);
}

#[test]
fn list_endpoint_returns_every_application() {
    let state = test_state();
    create_application(&state, "A", "a@example.com", "Dubai");
    create_application(&state, "B", "b@example.com", "Oman");

    let apps = get_json(&state, "/api/applications");
    let apps = apps.as_array().unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[1]["country"], "Oman");
    assert_eq!(apps[1]["travellerCount"], 2);
    assert_eq!(apps[1]["statusHistory"][0]["label"], "pending");
}
