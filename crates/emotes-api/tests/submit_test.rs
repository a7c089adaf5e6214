//! Submission integration tests.
//!
//! Run with: `cargo test -p emotes-api --test submit_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_invalid_id_format_is_rejected() {
    let app = setup_test_app();

    for body in [
        json!({ "emoteId": "abc" }),
        json!({ "emoteId": "" }),
        json!({ "submittedBy": "someone" }),
    ] {
        let response = app.client().post("/api/submit-emote").json(&body).await;
        assert_eq!(response.status_code(), 400, "{}", body);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
    assert_eq!(app.validator.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/submit-emote")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_new_emote_is_added_once() {
    let app = setup_test_app();
    app.client().get("/api/emotes").await;

    let first = app
        .client()
        .post("/api/submit-emote")
        .json(&json!({ "emoteId": "555", "category": "Pose", "submittedBy": "builder" }))
        .await;
    assert_eq!(first.status_code(), 200);
    let first: Value = first.json();
    assert_eq!(first["success"], true);
    assert_eq!(first["emote"]["id"], "555");
    assert_eq!(first["emote"]["category"], "Pose");

    let second: Value = app
        .client()
        .post("/api/submit-emote")
        .json(&json!({ "emoteId": 555 }))
        .await
        .json();
    assert_eq!(second["success"], true);
    assert_eq!(second["emote"], first["emote"]);
    assert_eq!(second["message"], "Emote already exists in database");

    assert_eq!(app.state.cache.registry().len().await, 7);

    let listing: Value = app
        .client()
        .get("/api/emotes")
        .add_query_param("category", "Pose")
        .await
        .json();
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
async fn test_not_for_sale_submission_leaves_state_unchanged() {
    let app = helpers::setup_test_app_with(
        helpers::test_config(),
        helpers::default_validator().not_for_sale(&["2"]),
        helpers::default_seeds(),
    );
    let before: Value = app.client().get("/api/emotes").await.json();

    let response = app
        .client()
        .post("/api/submit-emote")
        .json(&json!({ "emoteId": "2" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "EMOTE_REJECTED");
    assert!(!app.state.cache.registry().contains("2").await);

    let after: Value = app.client().get("/api/emotes").await.json();
    assert_eq!(before["emotes"], after["emotes"]);
    assert_eq!(before["lastUpdated"], after["lastUpdated"]);
}

#[tokio::test]
async fn test_upstream_outage_looks_like_rejection() {
    let app = helpers::setup_test_app_with(
        helpers::test_config(),
        helpers::default_validator().unavailable(&["9"]),
        helpers::default_seeds(),
    );

    let response = app
        .client()
        .post("/api/submit-emote")
        .json(&json!({ "emoteId": "9" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "EMOTE_REJECTED");
    assert_eq!(
        body["error"],
        "Emote could not be validated as a purchasable emote"
    );
    assert!(body.get("message").is_none());
    assert!(!app.state.cache.registry().contains("9").await);
}

#[tokio::test]
async fn test_known_unvalidated_emote() {
    let app = setup_test_app();
    app.client().get("/api/emotes").await;

    let response = app
        .client()
        .post("/api/submit-emote")
        .json(&json!({ "emoteId": "301" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["emote"].is_null());
}

#[tokio::test]
async fn test_error_detail_follows_configured_environment() {
    let mut production = helpers::test_config();
    production.base.environment = "production".to_string();
    production.base.cors_origins = vec!["https://play.example.com".to_string()];

    for (catalog, expose) in [(helpers::test_config(), true), (production, false)] {
        let app = helpers::setup_test_app_with(
            catalog,
            helpers::default_validator(),
            helpers::default_seeds(),
        );

        let response = app
            .client()
            .post("/api/submit-emote")
            .json(&json!({ "emoteId": "abc" }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["error"], "Invalid emote ID format");
        if expose {
            assert_eq!(body["message"], "Invalid input: Invalid emote ID format");
        } else {
            assert!(body.get("message").is_none());
        }
    }
}
