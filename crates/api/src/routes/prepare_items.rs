//! Prepare-list routes.
//!
//! Declarations are capacity checked inside the store's transaction, so the
//! handlers here only resolve the hub, enforce roles and shape responses.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    is_item_done, CreatePrepareItemRequest, Declaration, DeclarationResponse, PrepareItem,
    PrepareItemResponse, ToggleDoneRequest,
};
use persistence::repositories::{
    DeclarationToggle, HubRepository, MemberRepository, PrepareItemRepository,
};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics, UserAuth};
use crate::services::authz;

fn declaration_response(d: &Declaration) -> DeclarationResponse {
    DeclarationResponse {
        participant_id: d.participant_id,
        is_done: d.is_done,
        created_at: d.created_at,
    }
}

fn item_response(item: PrepareItem, declarations: Vec<Declaration>) -> PrepareItemResponse {
    let done = is_item_done(item.participants_limit, &declarations);
    PrepareItemResponse {
        id: item.id,
        hub_id: item.hub_id,
        description: item.description,
        participants_limit: item.participants_limit,
        declarations: declarations.iter().map(declaration_response).collect(),
        is_item_done: done,
        created_at: item.created_at,
    }
}

/// POST /api/v1/hubs/:hub_id/prepare-items
///
/// Create a prepare item. Requires admin and the hub's prepare list module.
pub async fn create_item(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
    Json(request): Json<CreatePrepareItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let hub_repo = HubRepository::new(state.pool.clone());
    let member_repo = MemberRepository::new(state.pool.clone());
    let item_repo = PrepareItemRepository::new(state.pool.clone());

    let hub = hub_repo
        .find_by_id(hub_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hub not found".to_string()))?;

    if !hub.prepare_list_enabled {
        return Err(ApiError::Validation(
            "The prepare list is disabled for this hub".to_string(),
        ));
    }

    authz::require_admin(&member_repo, hub_id, auth.user_id).await?;

    let item = item_repo
        .create(
            hub_id,
            &request.description,
            request.participants_limit,
            auth.user_id,
        )
        .await?;

    info!(
        hub_id = %hub_id,
        item_id = %item.id,
        participants_limit = item.participants_limit,
        created_by = %auth.user_id,
        "Created prepare item"
    );

    Ok((StatusCode::CREATED, Json(item_response(item, Vec::new()))))
}

/// GET /api/v1/hubs/:hub_id/prepare-items
///
/// List a hub's prepare items with declarations and derived completion.
/// Requires membership.
pub async fn list_items(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(hub_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let item_repo = PrepareItemRepository::new(state.pool.clone());

    authz::require_member(&member_repo, hub_id, auth.user_id).await?;

    let items = item_repo.list_by_hub(hub_id).await?;
    let declarations = item_repo.list_declarations_by_hub(hub_id).await?;

    let mut by_item: HashMap<Uuid, Vec<Declaration>> = HashMap::new();
    for declaration in declarations {
        by_item
            .entry(declaration.item_id)
            .or_default()
            .push(declaration);
    }

    let responses: Vec<PrepareItemResponse> = items
        .into_iter()
        .map(|item| {
            let declarations = by_item.remove(&item.id).unwrap_or_default();
            item_response(item, declarations)
        })
        .collect();

    Ok(Json(responses))
}

/// POST /api/v1/prepare-items/:item_id/declare
///
/// Toggle the caller's declaration on an item. Declaring checks the
/// participant cap atomically and answers 201 with the new declaration;
/// undeclaring always succeeds and answers 204.
pub async fn toggle_declare(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let item_repo = PrepareItemRepository::new(state.pool.clone());

    let item = item_repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Prepare item not found".to_string()))?;

    authz::require_member(&member_repo, item.hub_id, auth.user_id).await?;

    let outcome = item_repo.toggle_declaration(item_id, auth.user_id).await?;

    let response = match outcome {
        DeclarationToggle::Declared(declaration) => {
            metrics::record_declaration_toggled(true);
            info!(
                item_id = %item_id,
                participant = %auth.user_id,
                "Recorded declaration"
            );
            (
                StatusCode::CREATED,
                Json(declaration_response(&declaration)),
            )
                .into_response()
        }
        DeclarationToggle::Undeclared => {
            metrics::record_declaration_toggled(false);
            info!(
                item_id = %item_id,
                participant = %auth.user_id,
                "Withdrew declaration"
            );
            StatusCode::NO_CONTENT.into_response()
        }
    };

    Ok(response)
}

/// POST /api/v1/prepare-items/:item_id/done
///
/// Flip a declaration's done flag. Without a body target the caller flips
/// their own; naming another participant requires admin rights and the
/// `policy.admins_can_toggle_done` setting.
pub async fn toggle_done(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<ToggleDoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let item_repo = PrepareItemRepository::new(state.pool.clone());

    let item = item_repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Prepare item not found".to_string()))?;

    let participant_id = request.participant_id.unwrap_or(auth.user_id);

    if participant_id == auth.user_id {
        authz::require_member(&member_repo, item.hub_id, auth.user_id).await?;
    } else {
        if !state.config.policy.admins_can_toggle_done {
            return Err(ApiError::Unauthorized(
                "Only the declared participant may toggle done".to_string(),
            ));
        }
        authz::require_admin(&member_repo, item.hub_id, auth.user_id).await?;
    }

    let declaration = item_repo
        .toggle_done(item_id, participant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Declaration not found".to_string()))?;

    info!(
        item_id = %item_id,
        participant = %participant_id,
        is_done = declaration.is_done,
        toggled_by = %auth.user_id,
        "Toggled declaration done flag"
    );

    Ok(Json(declaration_response(&declaration)))
}

/// DELETE /api/v1/prepare-items/:item_id
///
/// Delete a prepare item and its declarations. Requires admin.
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member_repo = MemberRepository::new(state.pool.clone());
    let item_repo = PrepareItemRepository::new(state.pool.clone());

    let item = item_repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Prepare item not found".to_string()))?;

    authz::require_admin(&member_repo, item.hub_id, auth.user_id).await?;

    if !item_repo.delete(item_id).await? {
        return Err(ApiError::NotFound("Prepare item not found".to_string()));
    }

    info!(
        item_id = %item_id,
        hub_id = %item.hub_id,
        deleted_by = %auth.user_id,
        "Deleted prepare item"
    );

    Ok(StatusCode::NO_CONTENT)
}
