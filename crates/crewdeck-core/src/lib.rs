//! `crewdeck-core`: configuration, shared types and the top-level error for
//! every Crewdeck subsystem.

pub mod config;
pub mod error;
pub mod types;

pub use config::CrewdeckConfig;
pub use error::{CrewdeckError, Result};
pub use types::Role;
