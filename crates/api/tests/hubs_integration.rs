//! Integration tests for hub creation and roster management.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_hub_makes_creator_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}/members", hub_id),
            &creator.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let roster = parse_response_body(response).await;
    let roster = roster.as_array().expect("roster should be an array");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["user_id"], creator.id.to_string());
    assert_eq!(roster[0]["role"], "admin");
}

#[tokio::test]
async fn test_get_hub_includes_member_count() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new().group()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &member.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], hub_id.to_string());
    assert_eq!(body["kind"], "group");
    assert_eq!(body["member_count"], 2);
}

#[tokio::test]
async fn test_get_hub_rejects_non_member() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let stranger = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &stranger.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_unknown_hub_returns_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}", uuid::Uuid::new_v4()),
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_without_token_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/invitations")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_hub_rejects_empty_name() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/hubs",
            serde_json::json!({"name": "", "kind": "event"}),
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_can_remove_self() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/hubs/{}/members/{}", hub_id, member.id),
            &member.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Membership gone, so hub reads are now rejected
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &member.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_remove_another_member() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let member_a = TestUser::new();
    let member_b = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;
    add_member(&pool, hub_id, member_a.id, "member").await;
    add_member(&pool, hub_id, member_b.id, "member").await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/hubs/{}/members/{}", hub_id, member_b.id),
            &member_a.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_can_remove_member() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/hubs/{}/members/{}", hub_id, member.id),
            &creator.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}/members", hub_id),
            &creator.token,
        ))
        .await
        .unwrap();
    let roster = parse_response_body(response).await;
    assert_eq!(roster.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_hub_requires_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let creator = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &creator, &TestHub::new()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &member.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &creator.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
