//! Integration tests for automation management: admin gating, secret
//! handling, test pings, and delivery replay.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_member, delete_auth, get_auth, login, post_json_auth, put_json_auth,
    register_team, token_of, TEST_PASSWORD,
};
use hiperflow_db::repositories::OutboxRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Role gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_mutations_require_admin(pool: PgPool) {
    let admin = register_team(&pool, "Gate Co", "admin_ana").await;
    let admin_token = token_of(&admin);
    let team_id = admin["user"]["team_id"].as_i64().unwrap();

    create_member(&pool, team_id, "member_bea").await;
    let member = login(&pool, "member_bea", TEST_PASSWORD).await;
    let member_token = token_of(&member);

    // Members cannot create automations.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &member_token,
        serde_json::json!({"name": "Nope", "target_url": "https://hook.example/x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");

    // The admin can.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &admin_token,
        serde_json::json!({"name": "Si", "target_url": "https://hook.example/y"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let automation_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Members cannot update, delete, test, or replay.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/automations/{automation_id}"),
        &member_token,
        serde_json::json!({"name": "Renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/automations/{automation_id}"),
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/automations/{automation_id}/test"),
        &member_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But members may read the configuration and the delivery log.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/automations", &member_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/automations/{automation_id}/deliveries"),
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// CRUD and secret handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_crud_roundtrip(pool: PgPool) {
    let admin = register_team(&pool, "Crud Hooks", "carla").await;
    let token = token_of(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &token,
        serde_json::json!({
            "name": "Make scenario",
            "platform": "make",
            "target_url": "https://hook.make.example/abc",
            "event_types": ["saleflow.deal.created"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["name"], "Make scenario");
    assert_eq!(created["data"]["platform"], "make");
    assert_eq!(created["data"]["is_active"], true);
    assert_eq!(
        created["data"]["event_types"],
        serde_json::json!(["saleflow.deal.created"])
    );
    let id = created["data"]["id"].as_i64().unwrap();

    // Update: rename and deactivate.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/automations/{id}"),
        &token,
        serde_json::json!({"name": "Paused scenario", "is_active": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["name"], "Paused scenario");
    assert_eq!(updated["data"]["is_active"], false);

    // List shows the row.
    let app = common::build_test_app(pool.clone());
    let list = body_json(get_auth(app, "/api/v1/automations", &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    // Delete, then 404.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/automations/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/automations/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_secret_is_write_only(pool: PgPool) {
    let admin = register_team(&pool, "Secret Co", "dario").await;
    let token = token_of(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &token,
        serde_json::json!({
            "name": "Signed hook",
            "target_url": "https://hook.example/signed",
            "secret": "super-secret-signing-key",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert!(
        created["data"].get("secret").is_none(),
        "secret must never serialize, got: {}",
        created["data"]
    );
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let fetched = body_json(get_auth(app, &format!("/api/v1/automations/{id}"), &token).await).await;
    assert!(fetched["data"].get("secret").is_none());

    let app = common::build_test_app(pool);
    let list = body_json(get_auth(app, "/api/v1/automations", &token).await).await;
    assert!(list["data"][0].get("secret").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_rejects_invalid_target_url(pool: PgPool) {
    let admin = register_team(&pool, "Url Co", "estela").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &token_of(&admin),
        serde_json::json!({"name": "Broken", "target_url": "not a url"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_rejects_unknown_event_type(pool: PgPool) {
    let admin = register_team(&pool, "Evt Co", "felipe").await;

    // A subscription naming an event that never fires would silently receive
    // nothing; reject it up front.
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/automations",
        &token_of(&admin),
        serde_json::json!({
            "name": "Typo hook",
            "target_url": "https://hook.example/t",
            "event_types": ["saleflow.deal.deleted"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(
        json["error"].as_str().unwrap().contains("Unknown event type"),
        "got: {}",
        json["error"]
    );
}

// ---------------------------------------------------------------------------
// Test pings and replay
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ping_enqueues_pending_delivery(pool: PgPool) {
    let admin = register_team(&pool, "Ping Co", "fabio").await;
    let token = token_of(&admin);

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/automations",
            &token,
            serde_json::json!({"name": "Ping target", "target_url": "https://hook.example/ping"}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/automations/{id}/test"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ping = body_json(response).await;
    assert_eq!(ping["data"]["event_type"], "automation.test");
    assert_eq!(ping["data"]["status"], "pending");
    assert_eq!(ping["data"]["payload"]["automation"]["name"], "Ping target");
    assert!(ping["data"]["deal_id"].is_null());

    // The ping shows up in the delivery log.
    let app = common::build_test_app(pool);
    let log = body_json(
        get_auth(app, &format!("/api/v1/automations/{id}/deliveries"), &token).await,
    )
    .await;
    assert_eq!(log["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replay_resets_a_delivered_record(pool: PgPool) {
    let admin = register_team(&pool, "Replay Co", "gema").await;
    let token = token_of(&admin);

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/automations",
            &token,
            serde_json::json!({"name": "Replay target", "target_url": "https://hook.example/r"}),
        )
        .await,
    )
    .await;
    let automation_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let ping = body_json(
        post_json_auth(
            app,
            &format!("/api/v1/automations/{automation_id}/test"),
            &token,
            serde_json::json!({}),
        )
        .await,
    )
    .await;
    let record_id = ping["data"]["id"].as_i64().unwrap();

    // Simulate the dispatcher having delivered the record.
    OutboxRepo::mark_sent(&pool, record_id, 200, 35).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/automations/deliveries/{record_id}/replay"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replayed = body_json(response).await;
    assert_eq!(replayed["data"]["status"], "pending");
    assert_eq!(replayed["data"]["attempt_count"], 0);
    assert!(replayed["data"]["delivered_at"].is_null());
    assert!(replayed["data"]["response_status"].is_null());

    // Replaying a record that does not exist is a 404.
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/automations/deliveries/999999/replay",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Team scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_team_automations_look_missing(pool: PgPool) {
    let team_a = register_team(&pool, "Hooks A", "owner_ana").await;
    let team_b = register_team(&pool, "Hooks B", "owner_bob").await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/automations",
            &token_of(&team_a),
            serde_json::json!({"name": "Solo A", "target_url": "https://hook.example/a"}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/automations/{id}"), &token_of(&team_b)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/automations/{id}/deliveries"),
        &token_of(&team_b),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
