//! Interface to the underlying call SDK.
//!
//! The transport only talks to a call through [`CallSession`], creates sessions
//! through a [`CallProvider`], and keeps at most one alive per
//! [`SessionRegistry`].

pub mod events;
mod listeners;
mod registry;
mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use events::{CallEvent, EventKind};
pub use listeners::{EventListener, ListenerId, Listeners};
pub use registry::SessionRegistry;
pub use session::{CallConfig, CallProvider, CallSession, RoomConfig, RoomInfo};
