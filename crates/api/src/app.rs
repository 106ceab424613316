use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{date_polls, health, hubs, invitations, prepare_items};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes (require a valid user JWT)
    let protected_routes = Router::new()
        // Hub routes (v1)
        .route("/api/v1/hubs", post(hubs::create_hub))
        .route(
            "/api/v1/hubs/:hub_id",
            get(hubs::get_hub).delete(hubs::delete_hub),
        )
        .route("/api/v1/hubs/:hub_id/members", get(hubs::list_members))
        .route(
            "/api/v1/hubs/:hub_id/members/:user_id",
            delete(hubs::remove_member),
        )
        // Invitation routes (v1)
        .route(
            "/api/v1/hubs/:hub_id/invitations",
            post(invitations::create_invitations).get(invitations::list_pending),
        )
        .route("/api/v1/invitations", get(invitations::list_mine))
        .route(
            "/api/v1/invitations/:invitation_id/accept",
            post(invitations::accept_invitation),
        )
        .route(
            "/api/v1/invitations/:invitation_id",
            delete(invitations::decline_invitation),
        )
        // Prepare-item routes (v1)
        .route(
            "/api/v1/hubs/:hub_id/prepare-items",
            post(prepare_items::create_item).get(prepare_items::list_items),
        )
        .route(
            "/api/v1/prepare-items/:item_id",
            delete(prepare_items::delete_item),
        )
        .route(
            "/api/v1/prepare-items/:item_id/declare",
            post(prepare_items::toggle_declare),
        )
        .route(
            "/api/v1/prepare-items/:item_id/done",
            post(prepare_items::toggle_done),
        )
        // Date-poll routes (v1)
        .route(
            "/api/v1/hubs/:hub_id/poll-options",
            post(date_polls::create_option).get(date_polls::list_options),
        )
        .route(
            "/api/v1/poll-options/:option_id",
            delete(date_polls::remove_option),
        )
        .route(
            "/api/v1/poll-options/:option_id/vote",
            post(date_polls::toggle_vote),
        )
        .route(
            "/api/v1/poll-options/:option_id/promote",
            post(date_polls::promote_option),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
