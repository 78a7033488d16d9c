//! Role-name gate for administrative operations
//!
//! Coarser than the per-menu capability checks: a protected operation names
//! the role(s) it requires and the gate is a plain set-intersection test on
//! the principal's resolved role names. Stateless; callers inject the
//! required names per operation.

use std::collections::HashSet;

use tracing::warn;

use crate::error::DomainError;

pub fn is_authorized(required: &[&str], held: &HashSet<String>) -> bool {
    required.iter().any(|role| held.contains(*role))
}

/// Fails with `AccessDenied` when no required role is held. The error carries
/// no detail about which role was missing.
pub fn require_any(required: &[&str], held: &HashSet<String>) -> Result<(), DomainError> {
    if is_authorized(required, held) {
        Ok(())
    } else {
        warn!(?required, "role gate rejected principal");
        Err(DomainError::AccessDenied)
    }
}
