//! Domain models for the Gather backend.
//!
//! This crate contains the business-level types shared between the API and
//! persistence layers: hubs (events and groups), memberships, dual-consent
//! invitations, prepare-list items and date polls.

pub mod models;
