//! Permission evaluation.
//!
//! A role either carries the super-admin flag, which grants everything without
//! looking at its permission list, or it grants exactly the permission strings in
//! its list. There is no wildcard or prefix matching.

use campus_core::{AppError, ErrorKind};

/// Read access to the parts of a role that matter for authorization.
pub trait RoleGrants {
    fn is_super_admin(&self) -> bool;
    fn permissions(&self) -> &[String];
}

/// Why a request was refused. Both variants render the same response body; the
/// distinction exists for status codes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("failed to resolve role")]
    RoleNotFound,
    #[error("not enough permissions")]
    MissingPermission,
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        let kind = match denied {
            AccessDenied::RoleNotFound => ErrorKind::Unauthorized,
            AccessDenied::MissingPermission => ErrorKind::Forbidden,
        };
        AppError::message(kind, "Not enough permissions").with_message("Access denied")
    }
}

/// Decides whether `role` grants `required`. `None` means the caller's role could
/// not be resolved.
pub fn evaluate<R>(required: &str, role: Option<&R>) -> Result<(), AccessDenied>
where
    R: RoleGrants + ?Sized,
{
    let role = role.ok_or(AccessDenied::RoleNotFound)?;

    if role.is_super_admin() {
        return Ok(());
    }

    if role.permissions().iter().any(|p| p == required) {
        Ok(())
    } else {
        Err(AccessDenied::MissingPermission)
    }
}
