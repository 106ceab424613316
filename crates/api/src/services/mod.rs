//! Domain services for the API layer.

pub mod authz;

pub use authz::{require_admin, require_member};
