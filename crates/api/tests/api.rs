//! Full-stack API tests against a real database.
//!
//! Each test builds the production router over a `#[sqlx::test]` pool,
//! authenticates with an HS256 token the test verifier accepts, and
//! drives the HTTP surface end to end.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use questlog_api::auth::provider::{AuthConfig, AuthKey, Claims, JwtIdentityProvider};
use questlog_api::config::ServerConfig;
use questlog_api::router::build_app_router;
use questlog_api::state::AppState;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

const SECRET: &str = "api-test-secret";

fn test_app(pool: PgPool) -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        auth: AuthConfig {
            key: AuthKey::Hs256Secret(SECRET.to_string()),
            audience: None,
            issuer: None,
        },
    };
    let identity =
        JwtIdentityProvider::new(&config.auth).expect("HS256 verifier construction cannot fail");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity: Arc::new(identity),
    };
    build_app_router(state, &config)
}

fn token_for(subject: &str) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        exp: chrono::Utc::now().timestamp() + 600,
        email: Some(format!("{subject}@example.com")),
        name: Some(subject.to_string()),
        role: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_campaign(app: &axum::Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/campaigns",
        token,
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_blank_required_field_names_the_field(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-validate");
    let campaign_id = create_campaign(&app, &token, "Validation").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["fields"]["name"].is_array(), "violation must name the field");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_character_kind_is_rejected(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-kind");
    let campaign_id = create_campaign(&app, &token, "Kinds").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Strahd", "kind": "lich" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["kind"].is_array());
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn another_users_campaign_is_indistinguishable_from_missing(pool: PgPool) {
    let app = test_app(pool);
    let alice = token_for("alice");
    let bob = token_for("bob");
    let campaign_id = create_campaign(&app, &alice, "Alice's game").await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}"),
        &bob,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &bob,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_the_provisioned_profile(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("profile-gm");

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", &token, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subject"], "profile-gm");
    assert_eq!(body["data"]["email"], "profile-gm@example.com");
    assert_eq!(body["data"]["role"], "user");
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn self_relationship_is_a_validation_error(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-self-rel");
    let campaign_id = create_campaign(&app, &token, "Edges").await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Loner" })),
    )
    .await;
    let loner = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/relationships"),
        &token,
        Some(json!({ "from_id": loner, "to_id": loner })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["to_id"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_relationship_is_a_conflict(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-dup-rel");
    let campaign_id = create_campaign(&app, &token, "Edges again").await;

    let mut ids = Vec::new();
    for name in ["Strahd", "Ireena"] {
        let (_, body) = send(
            &app,
            "POST",
            &format!("/api/v1/campaigns/{campaign_id}/characters"),
            &token,
            Some(json!({ "name": name })),
        )
        .await;
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let edge = json!({ "from_id": ids[0], "to_id": ids[1], "kind": "obsession" });
    let uri = format!("/api/v1/campaigns/{campaign_id}/relationships");

    let (status, _) = send(&app, "POST", &uri, &token, Some(edge.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", &uri, &token, Some(edge)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn campaign_delete_cascades_through_the_api(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-cascade");
    let campaign_id = create_campaign(&app, &token, "Doomed").await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Victim" })),
    )
    .await;
    let character_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/campaigns/{campaign_id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The campaign and everything under it is gone.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/characters/{character_id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn search_returns_only_the_matching_entity(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-search");
    let campaign_id = create_campaign(&app, &token, "Lore").await;

    send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Strahd", "description": "master of Ravenloft" })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Ireena" })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/notes"),
        &token,
        Some(json!({ "title": "Shopping", "content": "rope and torches" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/search?q=ravenloft"),
        &token,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let characters = body["data"]["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0]["name"], "Strahd");
    assert_eq!(body["data"]["notes"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tag_search_returns_entities_not_counts(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-tags");
    let campaign_id = create_campaign(&app, &token, "Tagged").await;

    send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        &token,
        Some(json!({ "name": "Strahd", "tags": ["undead"] })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/search/tags?tag=undead"),
        &token,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let characters = body["data"]["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0]["name"], "Strahd");
}

// ---------------------------------------------------------------------------
// Export / import validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn export_preserves_entity_counts_and_validates(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-export");
    let campaign_id = create_campaign(&app, &token, "Portable").await;

    for name in ["Strahd", "Ireena", "Ismark"] {
        send(
            &app,
            "POST",
            &format!("/api/v1/campaigns/{campaign_id}/characters"),
            &token,
            Some(json!({ "name": name })),
        )
        .await;
    }
    for title in ["Session 0", "Session 1"] {
        send(
            &app,
            "POST",
            &format!("/api/v1/campaigns/{campaign_id}/notes"),
            &token,
            Some(json!({ "title": title })),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/export"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let envelope = &body["data"];
    assert_eq!(envelope["meta"]["version"], "1");
    assert_eq!(envelope["campaign"]["name"], "Portable");
    assert_eq!(envelope["characters"].as_array().unwrap().len(), 3);
    assert_eq!(envelope["notes"].as_array().unwrap().len(), 2);
    assert_eq!(envelope["items"].as_array().unwrap().len(), 0);

    // The exported envelope must validate for re-import.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/campaigns/import/validate",
        &token,
        Some(envelope.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], true);
    assert!(body["data"]["collections"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "characters"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn csv_export_escapes_embedded_quotes(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-csv");
    let campaign_id = create_campaign(&app, &token, "Spreadsheet").await;

    send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/items"),
        &token,
        Some(json!({ "name": "the \"Fang\", a dagger" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/export?format=csv&include=items"),
        &token,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items_csv = body["data"]["items.csv"].as_str().unwrap();
    assert!(items_csv.starts_with("id,name,kind,"));
    assert!(items_csv.contains("\"the \"\"Fang\"\", a dagger\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn import_validation_reports_missing_keys(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-import");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/campaigns/import/validate",
        &token,
        Some(json!({ "campaign": {} })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], false);
    assert!(body["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e.as_str().unwrap().contains("meta")));
}

// ---------------------------------------------------------------------------
// Dice rolls
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn dice_roll_is_resolved_and_logged(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-dice");
    let campaign_id = create_campaign(&app, &token, "Rolls").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/dice-rolls/roll"),
        &token,
        Some(json!({ "expression": "2d6+1", "purpose": "initiative" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let roll = &body["data"];
    assert_eq!(roll["expression"], "2d6+1");
    let rolls = roll["rolls"].as_array().unwrap();
    assert_eq!(rolls.len(), 2);
    let sum: i64 = rolls.iter().map(|r| r.as_i64().unwrap()).sum();
    assert_eq!(roll["total"].as_i64().unwrap(), sum + 1);

    // Logged and listable.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/campaigns/{campaign_id}/dice-rolls"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_dice_expression_is_a_validation_error(pool: PgPool) {
    let app = test_app(pool);
    let token = token_for("gm-bad-dice");
    let campaign_id = create_campaign(&app, &token, "Bad rolls").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/campaigns/{campaign_id}/dice-rolls/roll"),
        &token,
        Some(json!({ "expression": "banana" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["expression"].is_array());
}
