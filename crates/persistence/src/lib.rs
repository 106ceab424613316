//! Persistence layer for the Gather backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//!
//! All pair-uniqueness invariants (membership, invitation, declaration and
//! vote per pair) are enforced by unique indexes in the schema; repositories
//! wrap read-decide-write sequences in transactions so that concurrent
//! requests either serialize cleanly or fail with a catchable constraint
//! violation.

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
