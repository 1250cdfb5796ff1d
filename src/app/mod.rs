//! Host-side glue: permissions, positioning, services, and the shell
//! wiring the hardware trigger to the speech controller.

pub mod permissions;
pub mod position;
pub mod services;
pub mod shell;

pub use permissions::{missing_permissions, Permission, PermissionGate, REQUIRED_PERMISSIONS};
pub use position::{
    LocationMethod, PositionFix, PositionListener, PositionListenerRegistry, PositioningService,
    RegistrationHandle,
};
pub use services::Services;
pub use shell::ActivityShell;
