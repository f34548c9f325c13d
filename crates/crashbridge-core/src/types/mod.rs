//! # Types
//!
//! Plain data that crosses the bridge: captured frames, the enums that map to
//! managed constants, the user identity and the transient notification event.
//!
//! Nothing in here knows about the boundary; the bridge modules turn these
//! values into managed objects.

pub mod address;
pub mod arch;
pub mod breadcrumb;
pub mod event;
pub mod frame;
pub mod severity;
pub mod user;

// Re-export all public types
pub use address::{Address, HexAddress};
pub use arch::Architecture;
pub use breadcrumb::BreadcrumbType;
pub use event::NotificationEvent;
pub use frame::StackFrame;
pub use severity::Severity;
pub use user::UserIdentity;
