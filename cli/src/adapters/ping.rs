use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use fleetprobe_core::ports::ReachabilityProbe;

/// Single-attempt reachability check via the system `ping` binary.
pub struct SystemPing {
    timeout: Duration,
}

impl SystemPing {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(&self, host: &str) -> Command {
        let mut cmd = Command::new("ping");
        #[cfg(target_os = "windows")]
        cmd.args(["-n", "1", "-w", &self.timeout.as_millis().to_string()]);
        #[cfg(not(target_os = "windows"))]
        cmd.args(["-c", "1", "-W", &self.timeout.as_secs().max(1).to_string()]);
        cmd.arg(host);
        cmd
    }
}

#[async_trait]
impl ReachabilityProbe for SystemPing {
    async fn probe(&self, host: &str) -> bool {
        let status = self.command(host).output().await;
        let up = matches!(&status, Ok(output) if output.status.success());
        debug!(%host, up, "reachability probe");
        up
    }
}
