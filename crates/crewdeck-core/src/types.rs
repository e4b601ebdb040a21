use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator roles recognised by the access gate.
///
/// Crew records are manager-only; the schedule grid is open to both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Manager,
    CoManager,
}

impl Role {
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Manager => write!(f, "manager"),
            Role::CoManager => write!(f, "co-manager"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "co-manager" => Ok(Role::CoManager),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
