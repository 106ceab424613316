//! HTTP API for the Gather backend.
//!
//! This crate wires the axum router: route handlers for hubs, invitations,
//! prepare lists and date polls, the JWT auth and observability middleware,
//! and the layered configuration the binary loads at startup.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
