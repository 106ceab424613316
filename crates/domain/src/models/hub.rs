//! Hub domain models.
//!
//! A hub is the shared abstraction over the two coordinated entity kinds
//! (events and groups). Both follow identical membership and invitation
//! rules; the kind only matters to the excluded presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Kind of a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubKind {
    Event,
    Group,
}

impl HubKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubKind::Event => "event",
            HubKind::Group => "group",
        }
    }
}

impl FromStr for HubKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(HubKind::Event),
            "group" => Ok(HubKind::Group),
            _ => Err(format!("Invalid hub kind: {}", s)),
        }
    }
}

impl fmt::Display for HubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role within a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubRole {
    Admin,
    Member,
}

impl HubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubRole::Admin => "admin",
            HubRole::Member => "member",
        }
    }

    /// Returns true if this role can manage invitations, items and options.
    pub fn is_admin(&self) -> bool {
        matches!(self, HubRole::Admin)
    }
}

impl FromStr for HubRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(HubRole::Admin),
            "member" => Ok(HubRole::Member),
            _ => Err(format!("Invalid hub role: {}", s)),
        }
    }
}

impl fmt::Display for HubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coordinated event or group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Hub {
    pub id: Uuid,
    pub kind: HubKind,
    pub name: String,
    pub description: Option<String>,
    /// Private hubs accept self-requested invitations; membership in any hub
    /// otherwise requires an admin-initiated invitation.
    pub is_private: bool,
    pub date_poll_enabled: bool,
    pub prepare_list_enabled: bool,
    /// Canonical schedule, set on creation or by promoting a poll option.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HubMember {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub user_id: Uuid,
    pub role: HubRole,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a hub.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateHubRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    pub kind: HubKind,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default = "default_module_enabled")]
    pub date_poll_enabled: bool,

    #[serde(default = "default_module_enabled")]
    pub prepare_list_enabled: bool,
}

fn default_module_enabled() -> bool {
    true
}

/// Response for a single hub.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HubResponse {
    pub id: Uuid,
    pub kind: HubKind,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub date_poll_enabled: bool,
    pub prepare_list_enabled: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Response for a roster entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub role: HubRole,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn test_hub_kind_round_trip() {
        assert_eq!("event".parse::<HubKind>().unwrap(), HubKind::Event);
        assert_eq!("Group".parse::<HubKind>().unwrap(), HubKind::Group);
        assert_eq!(HubKind::Event.to_string(), "event");
        assert!("party".parse::<HubKind>().is_err());
    }

    #[test]
    fn test_hub_role_round_trip() {
        assert_eq!("admin".parse::<HubRole>().unwrap(), HubRole::Admin);
        assert_eq!("MEMBER".parse::<HubRole>().unwrap(), HubRole::Member);
        assert_eq!(HubRole::Member.to_string(), "member");
        assert!("owner".parse::<HubRole>().is_err());
    }

    #[test]
    fn test_hub_role_is_admin() {
        assert!(HubRole::Admin.is_admin());
        assert!(!HubRole::Member.is_admin());
    }

    #[test]
    fn test_create_hub_request_validation() {
        let valid = CreateHubRequest {
            name: "Summer trip".to_string(),
            kind: HubKind::Event,
            description: Some(Faker.fake::<String>()),
            is_private: true,
            date_poll_enabled: true,
            prepare_list_enabled: true,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_create_hub_request_empty_name_rejected() {
        let invalid = CreateHubRequest {
            name: String::new(),
            kind: HubKind::Group,
            description: None,
            is_private: false,
            date_poll_enabled: true,
            prepare_list_enabled: true,
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_create_hub_request_defaults() {
        let json = r#"{"name": "Hiking club", "kind": "group"}"#;
        let req: CreateHubRequest = serde_json::from_str(json).unwrap();
        assert!(!req.is_private);
        assert!(req.date_poll_enabled);
        assert!(req.prepare_list_enabled);
    }
}
