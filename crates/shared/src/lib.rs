//! Shared utilities for the Gather backend.
//!
//! Code in this crate has no knowledge of the web or persistence layers and
//! can be used from any other crate in the workspace.

pub mod jwt;
