//! # Fleetprobe Common
//!
//! Shared data model and configuration for the probe pipeline.
//!
//! ## Contents
//! * **[`record`]**: The target record flowing through the pipeline and its
//!   sentinel-tagged fields.
//! * **[`connectivity`]**: Explicit gating flags produced by the connectivity prober.
//! * **[`registry`]**: Typed registry value model for the mutation-with-undo stage.
//! * **[`config`]**: Pipeline tuning knobs threaded through commands.
//! * **[`error`]**: The discriminated remote-call error taxonomy.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod record;
pub mod registry;

mod macros;

#[doc(hidden)]
pub use tracing;
