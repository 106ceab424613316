//! Domain model definitions.

pub mod date_poll;
pub mod hub;
pub mod invitation;
pub mod prepare_item;

pub use date_poll::{CreatePollOptionRequest, PollOption, PollOptionResponse, PromotedSchedule};
pub use hub::{
    CreateHubRequest, Hub, HubKind, HubMember, HubResponse, HubRole, MemberResponse,
};
pub use invitation::{
    CreateInvitationsRequest, Invitation, InvitationResponse, PendingInvitationsResponse,
};
pub use prepare_item::{
    is_item_done, CreatePrepareItemRequest, Declaration, DeclarationResponse, PrepareItem,
    PrepareItemResponse, ToggleDoneRequest,
};
