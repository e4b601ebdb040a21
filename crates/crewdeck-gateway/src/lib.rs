//! `crewdeck-gateway`: axum HTTP surface over the crew, schedule and access crates.

pub mod app;
pub mod http;

pub use app::{build_router, AppState};
