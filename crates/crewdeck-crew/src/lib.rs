//! `crewdeck-crew`: crew records persisted in the `crew` table.

pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::{CrewError, Result};
pub use manager::CrewManager;
pub use types::{CrewFields, CrewMember};
