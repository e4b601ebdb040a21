use crewdeck_core::Role;

/// Operations the gate can be asked about. Adding a variant here forces the
/// compiler to make check() decide on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// List, read, create, update and delete crew records.
    ManageCrew,
    ViewSchedule,
    EditSchedule,
}

/// Result of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCheck {
    Allowed,
    Denied { reason: String },
}

impl PermissionCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionCheck::Allowed)
    }
}

pub struct PermissionChecker;

impl PermissionChecker {
    /// Evaluate whether `role` may perform `capability`.
    pub fn check(role: Role, capability: Capability) -> PermissionCheck {
        match capability {
            Capability::ManageCrew => {
                if role.is_manager() {
                    PermissionCheck::Allowed
                } else {
                    PermissionCheck::Denied {
                        reason: "manager role required".to_string(),
                    }
                }
            }
            Capability::ViewSchedule | Capability::EditSchedule => PermissionCheck::Allowed,
        }
    }
}
