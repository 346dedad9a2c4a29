//! Per-host processing context and session lifecycle.

use tracing::debug;

use fleetprobe_common::record::TargetRecord;

use crate::pipeline::ProbePipeline;
use crate::ports::{ExecTarget, SessionHandle};

/// Everything one in-flight host owns while moving through the pipeline.
///
/// The session handle lives here rather than inside the record: it is acquired at
/// most once by the connectivity prober and released by [`ProbePipeline::release_session`]
/// as the last step of per-host processing, on every path. If the whole batch is
/// cancelled mid-flight, sessions of tasks that never reached release are leaked;
/// callers that care should drain the batch instead of dropping it.
#[derive(Debug)]
pub struct HostContext {
    pub record: TargetRecord,
    pub(crate) session: Option<SessionHandle>,
}

impl HostContext {
    pub fn new(record: TargetRecord) -> Self {
        Self {
            record,
            session: None,
        }
    }

    /// The execution target stages must use: the attached session where one is
    /// live, the bare host otherwise. Stages never open connections themselves.
    pub fn exec_target(&self) -> ExecTarget<'_> {
        match &self.session {
            Some(session) => ExecTarget::Session(session),
            None => ExecTarget::Host(&self.record.computer_name),
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

impl ProbePipeline {
    /// Closes the context's session, if any. Safe to call more than once; the
    /// handle is surrendered on the first call.
    pub async fn release_session(&self, ctx: &mut HostContext) {
        if let Some(session) = ctx.session.take() {
            debug!(host = session.host(), "closing remote session");
            self.transport().disconnect(session).await;
        }
    }
}
