//! # Fleetprobe Core
//!
//! The per-host probe pipeline: a connectivity prober sets gating flags, independent
//! enrichment stages run behind those gates (reusing an established session where one
//! exists), the volume expansion stage fans one record out into one row per volume,
//! and an optional registry mutation captures rollback data before writing.
//!
//! All remote work goes through the trait ports in [`ports`]; the core never opens a
//! socket itself. Per-host failures degrade to sentinel state on that host's record
//! and never abort the batch.

pub mod pipeline;
pub mod ports;
pub mod session;

mod enrich;
mod probe;
mod registry;
mod volumes;

pub use enrich::normalize_caption;
pub use pipeline::{Gate, ProbePipeline, ProgressFn};
pub use session::HostContext;
