//! ladybug-core: domain stores, derivations, and form sessions for the
//! ladybug dashboard.
//!
//! # Conventions
//!
//! - **Errors**: typed errors from `error` inside the domain layer;
//!   `anyhow::Result` at binary boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **State**: everything is in-memory and single-threaded; stores are
//!   owned by [`state::AppState`] and passed by reference.

pub mod config;
pub mod derive;
pub mod error;
pub mod export;
pub mod form;
pub mod model;
pub mod report;
pub mod seed;
pub mod state;
pub mod store;
