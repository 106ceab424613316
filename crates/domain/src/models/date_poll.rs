//! Date-poll domain models.
//!
//! Members propose candidate time windows and vote on them; an admin promotes
//! one option, copying its dates onto the hub's canonical schedule. "Selected"
//! is derived by comparing an option's dates against that schedule, never
//! stored as a link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A candidate time window for a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PollOption {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub suggested_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a poll option.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_date_order"))]
pub struct CreatePollOptionRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

fn validate_date_order(req: &CreatePollOptionRequest) -> Result<(), validator::ValidationError> {
    if let Some(end) = req.end_date {
        if end < req.start_date {
            let mut err = validator::ValidationError::new("end_date");
            err.message = Some("End date must not be before start date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Response for a poll option with its derived read model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PollOptionResponse {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub suggested_by: Uuid,
    /// Number of votes currently on this option.
    pub user_count: i64,
    /// True when the option's dates equal the hub's canonical schedule.
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
}

/// The hub schedule resulting from a promotion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PromotedSchedule {
    pub hub_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_option_without_end_date_is_valid() {
        let req = CreatePollOptionRequest {
            start_date: at(10),
            end_date: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_end_after_start_is_valid() {
        let req = CreatePollOptionRequest {
            start_date: at(10),
            end_date: Some(at(12)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_end_equal_start_is_valid() {
        let req = CreatePollOptionRequest {
            start_date: at(10),
            end_date: Some(at(10)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let req = CreatePollOptionRequest {
            start_date: at(12),
            end_date: Some(at(10)),
        };
        assert!(req.validate().is_err());
    }
}
