//! Repository modules for database access.

pub mod date_poll;
pub mod hub;
pub mod invitation;
pub mod member;
pub mod prepare_item;

pub use date_poll::{DatePollRepository, VoteToggle};
pub use hub::HubRepository;
pub use invitation::{InvitationRepository, InvitationStoreError};
pub use member::MemberRepository;
pub use prepare_item::{DeclarationToggle, PrepareItemRepository, PrepareStoreError};
