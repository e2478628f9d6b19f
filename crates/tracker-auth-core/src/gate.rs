//! Role-based authorization decisions
//!
//! Binary allow/deny per route. There is no permission tree: a route names
//! the roles it admits and the caller's role is either in that set or not.

use tracker_types::Role;

use crate::token::Identity;
use crate::AuthError;

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Allow iff `role` is one of `allowed`
pub fn require_role(role: Role, allowed: &[Role]) -> Decision {
    if allowed.contains(&role) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

impl Identity {
    /// Gate on the identity's role, mapping a deny to [`AuthError::Forbidden`]
    pub fn require_any(&self, allowed: &[Role]) -> Result<(), AuthError> {
        match require_role(self.role, allowed) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                tracing::debug!(
                    user_id = %self.user_id,
                    role = %self.role,
                    "Role not permitted for this operation"
                );
                metrics::counter!("auth_forbidden_total").increment(1);
                Err(AuthError::Forbidden)
            }
        }
    }
}
