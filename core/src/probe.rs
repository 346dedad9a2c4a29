//! Connectivity prober: the one stage that sets gating flags.

use tracing::{debug, warn};

use fleetprobe_common::record::Field;

use crate::pipeline::ProbePipeline;
use crate::ports::ExecTarget;
use crate::session::HostContext;

/// Trivial remote command used to verify execution capability in the
/// per-call (non-session) variant.
const NOOP_COMMAND: &str = "hostname";

impl ProbePipeline {
    /// Evaluates reachability, the management channel, and remote execution for
    /// one record, exactly once per source record.
    ///
    /// Every failure degrades to a `false` flag or sentinel on the record; nothing
    /// propagates. In the session variant a successful connect attaches the handle
    /// to the context for downstream reuse.
    pub async fn probe_connectivity(&self, ctx: &mut HostContext) {
        let host = ctx.record.computer_name.clone();

        let reachable = tokio::time::timeout(
            self.config().call_timeout,
            self.reachability().probe(&host),
        )
        .await
        .unwrap_or(false);
        ctx.record.connectivity.ping = reachable;

        if !reachable {
            debug!(%host, "unreachable, skipping management probes");
            ctx.record.boot_time = Field::NoTry;
            return;
        }

        match self.bounded(self.inventory().os_facts(&host)).await {
            Ok(facts) => {
                ctx.record.connectivity.management = true;
                ctx.record.boot_time = Field::Value(facts.last_boot);
            }
            Err(err) => {
                warn!(%host, %err, "management channel unavailable");
                ctx.record.connectivity.management = false;
                ctx.record.boot_time = Field::NoTry;
            }
        }

        if self.config().use_sessions {
            match self.bounded(self.transport().connect(&host)).await {
                Ok(session) => {
                    ctx.record.connectivity.remote_exec = true;
                    ctx.session = Some(session);
                }
                Err(err) => {
                    warn!(%host, %err, "session establishment failed");
                    ctx.record.connectivity.remote_exec = false;
                }
            }
        } else {
            let ok = self
                .bounded(self.transport().execute(ExecTarget::Host(&host), NOOP_COMMAND))
                .await
                .is_ok();
            if !ok {
                warn!(%host, "remote execution check failed");
            }
            ctx.record.connectivity.remote_exec = ok;
        }
    }
}
