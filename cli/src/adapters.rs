//! Thin shell-out implementations of the core ports.
//!
//! These exist so the binary works end to end against OpenSSH-managed hosts; any
//! real deployment substitutes its own transport/inventory implementations at the
//! [`fleetprobe_core::ports`] seams.

pub mod inventory;
pub mod ping;
pub mod registry;
pub mod ssh;
