use std::time::Duration;

/// Pipeline tuning knobs, built once by the caller and threaded through every stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Force enrichment attempts even when a record's gate is unmet.
    ///
    /// A forced attempt that fails degrades to a blank field instead of the
    /// `"No Try"` sentinel.
    pub no_error_check: bool,
    /// Establish one persistent remote session per host and reuse it for every
    /// remote-execution stage, instead of per-call connections.
    pub use_sessions: bool,
    /// Volume expansion emits minimal, uninherited rows for volumes past the first.
    pub report_mode: bool,
    /// Emit the trailing blank/separator rows after volume expansion.
    ///
    /// Kept for output-shape compatibility with interactive table rendering.
    pub trailing_separators: bool,
    /// Upper bound applied to every individual remote call.
    pub call_timeout: Duration,
    /// Maximum hosts probed concurrently.
    pub max_in_flight: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            no_error_check: false,
            use_sessions: true,
            report_mode: false,
            trailing_separators: true,
            call_timeout: Duration::from_secs(15),
            max_in_flight: 8,
        }
    }
}
