//! Database entity definitions (row mappings).

pub mod date_poll;
pub mod hub;
pub mod invitation;
pub mod prepare_item;

pub use date_poll::{PollOptionEntity, PollOptionWithVotesEntity};
pub use hub::{HubEntity, HubKindDb, HubMemberEntity, HubRoleDb};
pub use invitation::HubInvitationEntity;
pub use prepare_item::{DeclarationEntity, PrepareItemEntity};
