//! OpenSSH transport: persistent sessions use a ControlMaster socket per host so
//! every later call on that host multiplexes over the established connection.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use fleetprobe_common::error::{RemoteError, RemoteResult};
use fleetprobe_core::ports::{ExecTarget, RemoteTransport, SessionHandle};

pub struct OpenSshTransport {
    control_dir: PathBuf,
    next_id: AtomicU64,
}

impl OpenSshTransport {
    pub fn new() -> Self {
        Self {
            control_dir: std::env::temp_dir(),
            next_id: AtomicU64::new(1),
        }
    }

    fn control_path(&self, session: &SessionHandle) -> PathBuf {
        self.control_dir
            .join(format!("fleetprobe-{}-{}.sock", session.host(), session.id()))
    }

    fn base_command(&self, target: ExecTarget<'_>) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(["-o", "BatchMode=yes"]);
        if let ExecTarget::Session(session) = target {
            let control = self.control_path(session);
            cmd.args(["-o", &format!("ControlPath={}", control.display())]);
        }
        cmd.arg(target.host());
        cmd
    }
}

impl Default for OpenSshTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteTransport for OpenSshTransport {
    async fn connect(&self, host: &str) -> RemoteResult<SessionHandle> {
        let session = SessionHandle::new(host, self.next_id.fetch_add(1, Ordering::Relaxed));
        let control = self.control_path(&session);

        let output = Command::new("ssh")
            .args(["-o", "BatchMode=yes", "-o", "ControlMaster=yes"])
            .args(["-o", &format!("ControlPath={}", control.display())])
            .args(["-o", "ControlPersist=yes"])
            .arg(host)
            .arg("exit")
            .output()
            .await
            .map_err(|e| RemoteError::Failed(e.to_string()))?;

        if output.status.success() {
            debug!(%host, id = session.id(), "session established");
            Ok(session)
        } else {
            Err(classify(&String::from_utf8_lossy(&output.stderr)))
        }
    }

    async fn execute(&self, target: ExecTarget<'_>, command: &str) -> RemoteResult<String> {
        let output = self
            .base_command(target)
            .arg(command)
            .output()
            .await
            .map_err(|e| RemoteError::Failed(e.to_string()))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(classify(&String::from_utf8_lossy(&output.stderr)))
        }
    }

    async fn disconnect(&self, session: SessionHandle) {
        let control = self.control_path(&session);
        let result = Command::new("ssh")
            .args(["-o", &format!("ControlPath={}", control.display())])
            .args(["-O", "exit"])
            .arg(session.host())
            .output()
            .await;
        if let Err(err) = result {
            warn!(host = session.host(), %err, "session teardown failed");
        }
    }
}

fn classify(stderr: &str) -> RemoteError {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("permission denied") {
        RemoteError::Denied
    } else if lower.contains("timed out") {
        RemoteError::Timeout
    } else if lower.contains("could not resolve") || lower.contains("no route to host") {
        RemoteError::Unreachable
    } else {
        RemoteError::Failed(stderr.trim().to_string())
    }
}
