//! Prepare-list domain models.
//!
//! A prepare item is a task with an optional participant cap. Members declare
//! themselves on an item (a toggle) and mark their own declaration done; the
//! item-level completion flag is derived from the declaration set on every
//! read, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Sentinel for an item without a participant cap.
pub const UNLIMITED_PARTICIPANTS: i32 = -1;

/// A capacity-constrained task on a hub's prepare list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PrepareItem {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub description: String,
    /// `-1` means unlimited, otherwise a positive cap on declarations.
    pub participants_limit: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A member's claim on a prepare item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Declaration {
    pub id: Uuid,
    pub item_id: Uuid,
    pub participant_id: Uuid,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Returns the derived completion state of an item.
///
/// An item is done when its slots are filled (or it is unlimited) and every
/// declaration is marked done. An unlimited item with no declarations is
/// vacuously done.
pub fn is_item_done(participants_limit: i32, declarations: &[Declaration]) -> bool {
    let slots_filled = participants_limit == UNLIMITED_PARTICIPANTS
        || declarations.len() as i32 == participants_limit;

    slots_filled && declarations.iter().all(|d| d.is_done)
}

/// Request payload for creating a prepare item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePrepareItemRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Description must be between 1 and 500 characters"
    ))]
    pub description: String,

    /// `-1` for unlimited, otherwise must be positive.
    #[serde(default = "default_participants_limit")]
    #[validate(custom(function = "validate_participants_limit"))]
    pub participants_limit: i32,
}

fn default_participants_limit() -> i32 {
    UNLIMITED_PARTICIPANTS
}

fn validate_participants_limit(limit: i32) -> Result<(), ValidationError> {
    if limit == UNLIMITED_PARTICIPANTS || limit > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("participants_limit");
        err.message = Some("Participants limit must be -1 (unlimited) or positive".into());
        Err(err)
    }
}

/// Request payload for toggling a declaration's done flag.
///
/// When `participant_id` is omitted the caller toggles their own declaration.
/// Naming someone else requires admin rights and is subject to the
/// `policy.admins_can_toggle_done` setting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToggleDoneRequest {
    pub participant_id: Option<Uuid>,
}

/// Response for a single declaration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeclarationResponse {
    pub participant_id: Uuid,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Response for a prepare item with its declarations and derived state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PrepareItemResponse {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub description: String,
    pub participants_limit: i32,
    pub declarations: Vec<DeclarationResponse>,
    pub is_item_done: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(is_done: bool) -> Declaration {
        Declaration {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            participant_id: Uuid::new_v4(),
            is_done,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_item_done_when_limit_reached_and_all_done() {
        let declarations = vec![declaration(true), declaration(true)];
        assert!(is_item_done(2, &declarations));
    }

    #[test]
    fn test_item_not_done_when_slots_remain() {
        let declarations = vec![declaration(true)];
        assert!(!is_item_done(2, &declarations));
    }

    #[test]
    fn test_item_not_done_when_any_declaration_pending() {
        let declarations = vec![declaration(true), declaration(false)];
        assert!(!is_item_done(2, &declarations));
    }

    #[test]
    fn test_unlimited_item_done_when_all_done() {
        let declarations = vec![declaration(true), declaration(true), declaration(true)];
        assert!(is_item_done(UNLIMITED_PARTICIPANTS, &declarations));
    }

    #[test]
    fn test_unlimited_item_with_no_declarations_vacuously_done() {
        assert!(is_item_done(UNLIMITED_PARTICIPANTS, &[]));
    }

    #[test]
    fn test_limited_item_with_no_declarations_not_done() {
        assert!(!is_item_done(3, &[]));
    }

    #[test]
    fn test_flipping_one_declaration_flips_item() {
        let mut declarations = vec![declaration(true), declaration(true)];
        assert!(is_item_done(2, &declarations));
        declarations[0].is_done = false;
        assert!(!is_item_done(2, &declarations));
    }

    #[test]
    fn test_participants_limit_validation() {
        assert!(validate_participants_limit(UNLIMITED_PARTICIPANTS).is_ok());
        assert!(validate_participants_limit(1).is_ok());
        assert!(validate_participants_limit(10).is_ok());
        assert!(validate_participants_limit(0).is_err());
        assert!(validate_participants_limit(-2).is_err());
    }

    #[test]
    fn test_create_prepare_item_request_defaults_to_unlimited() {
        let json = r#"{"description": "Bring snacks"}"#;
        let req: CreatePrepareItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.participants_limit, UNLIMITED_PARTICIPANTS);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_prepare_item_request_rejects_zero_limit() {
        let req = CreatePrepareItemRequest {
            description: "Drive the van".to_string(),
            participants_limit: 0,
        };
        assert!(req.validate().is_err());
    }
}
