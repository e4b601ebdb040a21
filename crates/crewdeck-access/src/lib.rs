//! `crewdeck-access`: the access gate in front of crew and schedule routes.
//!
//! Operators (username, role, argon2 hash) live in SQLite and are seeded
//! from config. A successful login yields an HMAC-signed bearer token; every
//! protected call verifies it and asks [`permissions::PermissionChecker`]
//! whether the caller's role may perform the requested [`Capability`].

pub mod db;
pub mod error;
pub mod gate;
pub mod operators;
pub mod permissions;
pub mod token;
pub mod types;

pub use error::{AccessError, Result};
pub use gate::AccessGate;
pub use permissions::{Capability, PermissionCheck, PermissionChecker};
pub use token::TokenSigner;
pub use types::{Claims, Operator};
