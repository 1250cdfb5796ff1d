//! Runtime permission gate
//!
//! Every component behind the shell needs its permissions up front;
//! missing any required one terminates the application with a
//! user-visible notice instead of degrading.

use crate::{Result, VoicemapError};
use std::fmt;

/// Permissions the application cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    FineLocation,
    RecordAudio,
    ReadExternalStorage,
    WriteExternalStorage,
    ReadContacts,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::FineLocation => "ACCESS_FINE_LOCATION",
            Permission::RecordAudio => "RECORD_AUDIO",
            Permission::ReadExternalStorage => "READ_EXTERNAL_STORAGE",
            Permission::WriteExternalStorage => "WRITE_EXTERNAL_STORAGE",
            Permission::ReadContacts => "READ_CONTACTS",
        };
        f.write_str(name)
    }
}

/// The full set required before any component is initialized
pub const REQUIRED_PERMISSIONS: &[Permission] = &[
    Permission::FineLocation,
    Permission::WriteExternalStorage,
    Permission::RecordAudio,
    Permission::ReadExternalStorage,
    Permission::ReadContacts,
];

/// Host-provided permission lookup
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;
}

/// Gate that grants everything, for hosts without a permission model
pub struct GrantAllGate;

impl PermissionGate for GrantAllGate {
    fn is_granted(&self, _permission: Permission) -> bool {
        true
    }
}

/// Required permissions the gate does not grant
pub fn missing_permissions(gate: &dyn PermissionGate) -> Vec<Permission> {
    REQUIRED_PERMISSIONS
        .iter()
        .copied()
        .filter(|permission| !gate.is_granted(*permission))
        .collect()
}

/// Fail with the first missing required permission, if any
pub fn ensure_granted(gate: &dyn PermissionGate) -> Result<()> {
    match missing_permissions(gate).first() {
        Some(permission) => Err(VoicemapError::PermissionDenied(permission.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyOne(Permission);

    impl PermissionGate for DenyOne {
        fn is_granted(&self, permission: Permission) -> bool {
            permission != self.0
        }
    }

    #[test]
    fn test_grant_all_passes() {
        assert!(missing_permissions(&GrantAllGate).is_empty());
        assert!(ensure_granted(&GrantAllGate).is_ok());
    }

    #[test]
    fn test_denied_permission_is_fatal() {
        let gate = DenyOne(Permission::RecordAudio);
        assert_eq!(missing_permissions(&gate), vec![Permission::RecordAudio]);

        let err = ensure_granted(&gate).unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("RECORD_AUDIO"));
    }
}
