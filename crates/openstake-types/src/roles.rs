//! Role-based authorization surface.
//!
//! The core never owns role bookkeeping; it consults an injected
//! [`AccessControl`] capability check before admin-gated operations.
//! [`StaticAccessControl`] is a plain in-memory grant table for tests and
//! single-operator deployments.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OpenstakeError, Result};
use crate::ids::Address;

/// Roles consulted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Group creation, keygen requests, loop-bound and ceiling configuration.
    Admin,
    /// The custody collaborator returning principal and rewards.
    Custodian,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Custodian => write!(f, "CUSTODIAN"),
        }
    }
}

/// Capability check injected into every admin-gated operation.
pub trait AccessControl {
    fn has_role(&self, role: Role, caller: &Address) -> bool;
}

/// Reject the operation unless `caller` holds `role`.
pub fn require_role(ac: &dyn AccessControl, role: Role, caller: &Address) -> Result<()> {
    if ac.has_role(role, caller) {
        Ok(())
    } else {
        Err(OpenstakeError::RoleRequired { role })
    }
}

/// In-memory grant table implementing [`AccessControl`].
#[derive(Debug, Clone, Default)]
pub struct StaticAccessControl {
    grants: HashMap<Role, HashSet<Address>>,
}

impl StaticAccessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, role: Role, addr: Address) {
        self.grants.entry(role).or_default().insert(addr);
    }

    pub fn revoke(&mut self, role: Role, addr: &Address) {
        if let Some(holders) = self.grants.get_mut(&role) {
            holders.remove(addr);
        }
    }
}

impl AccessControl for StaticAccessControl {
    fn has_role(&self, role: Role, caller: &Address) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|holders| holders.contains(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> Address {
        Address([seed; 20])
    }

    #[test]
    fn grant_and_check() {
        let mut ac = StaticAccessControl::new();
        ac.grant(Role::Admin, addr(1));

        assert!(ac.has_role(Role::Admin, &addr(1)));
        assert!(!ac.has_role(Role::Admin, &addr(2)));
        assert!(!ac.has_role(Role::Custodian, &addr(1)));
    }

    #[test]
    fn revoke_removes_grant() {
        let mut ac = StaticAccessControl::new();
        ac.grant(Role::Custodian, addr(1));
        ac.revoke(Role::Custodian, &addr(1));
        assert!(!ac.has_role(Role::Custodian, &addr(1)));
    }

    #[test]
    fn require_role_rejects_with_named_error() {
        let ac = StaticAccessControl::new();
        let err = require_role(&ac, Role::Admin, &addr(1)).unwrap_err();
        assert!(matches!(err, OpenstakeError::RoleRequired { role: Role::Admin }));
        assert!(format!("{err}").contains("ADMIN"));
    }
}
