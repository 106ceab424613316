//! HTTP route handlers.

pub mod date_polls;
pub mod health;
pub mod hubs;
pub mod invitations;
pub mod prepare_items;
