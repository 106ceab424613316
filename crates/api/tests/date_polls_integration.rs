//! Integration tests for date polls: voting and promoting an option onto the
//! hub's canonical schedule.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;
use uuid::Uuid;

const START: &str = "2026-07-10T10:00:00Z";
const END: &str = "2026-07-12T18:00:00Z";

async fn create_option(
    app: &axum::Router,
    user: &TestUser,
    hub_id: Uuid,
    start: &str,
    end: Option<&str>,
) -> axum::response::Response {
    app.clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/hubs/{}/poll-options", hub_id),
            serde_json::json!({ "start_date": start, "end_date": end }),
            &user.token,
        ))
        .await
        .unwrap()
}

async fn list_options(app: &axum::Router, user: &TestUser, hub_id: Uuid) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}/poll-options", hub_id),
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_vote_toggle_and_promote_flow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let response = create_option(&app, &member, hub_id, START, Some(END)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let option = parse_response_body(response).await;
    assert_eq!(option["user_count"], 0);
    assert_eq!(option["is_selected"], false);
    let option_id = option["id"].as_str().unwrap().to_string();

    // Two members vote
    for user in [&admin, &member] {
        let response = app
            .clone()
            .oneshot(post_request_with_auth(
                &format!("/api/v1/poll-options/{}/vote", option_id),
                &user.token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;
        assert_eq!(body["voted"], true);
    }

    let options = list_options(&app, &admin, hub_id).await;
    assert_eq!(options[0]["user_count"], 2);

    // Voting again withdraws the vote
    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/vote", option_id),
            &member.token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["voted"], false);
    assert_eq!(body["user_count"], 1);

    // Promotion copies the dates onto the hub schedule
    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/promote", option_id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let schedule = parse_response_body(response).await;
    assert_eq!(schedule["hub_id"], hub_id.to_string());

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/hubs/{}", hub_id),
            &admin.token,
        ))
        .await
        .unwrap();
    let hub = parse_response_body(response).await;
    assert_eq!(hub["start_date"], schedule["start_date"]);
    assert_eq!(hub["end_date"], schedule["end_date"]);

    // Selection is derived by comparing against that schedule
    let options = list_options(&app, &admin, hub_id).await;
    assert_eq!(options[0]["is_selected"], true);
}

#[tokio::test]
async fn test_promoting_another_option_moves_selection() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;

    let first =
        parse_response_body(create_option(&app, &admin, hub_id, START, Some(END)).await).await;
    let second =
        parse_response_body(create_option(&app, &admin, hub_id, "2026-08-01T09:00:00Z", None).await)
            .await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();

    for id in [&first_id, &second_id] {
        let response = app
            .clone()
            .oneshot(post_request_with_auth(
                &format!("/api/v1/poll-options/{}/promote", id),
                &admin.token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let options = list_options(&app, &admin, hub_id).await;
    let selected: Vec<&str> = options
        .as_array()
        .unwrap()
        .iter()
        .filter(|o| o["is_selected"] == true)
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(selected, vec![second_id.as_str()]);
}

#[tokio::test]
async fn test_vote_requires_membership() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let stranger = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;

    let option = parse_response_body(create_option(&app, &admin, hub_id, START, None).await).await;
    let option_id = option["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/vote", option_id),
            &stranger.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_promote_requires_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let member = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;
    add_member(&pool, hub_id, member.id, "member").await;

    let option = parse_response_body(create_option(&app, &member, hub_id, START, None).await).await;
    let option_id = option["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/promote", option_id),
            &member.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_option_with_end_before_start_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;

    let response = create_option(&app, &admin, hub_id, END, Some(START)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_option_rejected_when_module_disabled() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new().without_date_poll()).await;

    let response = create_option(&app, &admin, hub_id, START, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_option_drops_votes() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = TestUser::new();
    let hub_id = create_test_hub(&app, &admin, &TestHub::new()).await;

    let option = parse_response_body(create_option(&app, &admin, hub_id, START, None).await).await;
    let option_id = option["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/vote", option_id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/poll-options/{}", option_id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let options = list_options(&app, &admin, hub_id).await;
    assert_eq!(options.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_vote_on_unknown_option_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/poll-options/{}/vote", Uuid::new_v4()),
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
