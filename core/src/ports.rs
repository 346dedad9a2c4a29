//! # Collaborator Ports
//!
//! Traits the pipeline is built against. Concrete transports (WMI, WinRM, SSH,
//! agent RPC) live outside the core; the CLI ships thin shell-out adapters and the
//! integration tests ship instrumented fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fleetprobe_common::error::RemoteResult;
use fleetprobe_common::registry::RegistryData;

/// Opaque handle for an established persistent remote session.
///
/// Host-bound and owned by exactly one in-flight record's context; never shared
/// across hosts or concurrent operations. Invalid once passed to
/// [`RemoteTransport::disconnect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    host: String,
    id: u64,
}

impl SessionHandle {
    pub fn new(host: impl Into<String>, id: u64) -> Self {
        Self {
            host: host.into(),
            id,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Where a remote command should run: over an established session, or ad-hoc
/// against a bare host.
#[derive(Debug, Clone, Copy)]
pub enum ExecTarget<'a> {
    Session(&'a SessionHandle),
    Host(&'a str),
}

impl ExecTarget<'_> {
    pub fn host(&self) -> &str {
        match self {
            ExecTarget::Session(session) => session.host(),
            ExecTarget::Host(host) => host,
        }
    }
}

/// OS facts returned by the management/inventory channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsFacts {
    pub caption: String,
    pub last_boot: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInfo {
    pub name: String,
    pub cores: u32,
    pub data_width: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Drive letter or mount label.
    pub label: String,
    /// Numeric drive type code as reported by the host (3 = fixed, 5 = CD-ROM, ...).
    pub drive_type: u32,
    pub capacity_bytes: u64,
    pub free_bytes: u64,
}

/// Single-attempt reachability check with bounded latency.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn probe(&self, host: &str) -> bool;
}

/// Hardware and OS inventory over the management channel.
///
/// `processors` and `volumes` always return a sequence, even when the host reports
/// a single scalar result; adapters normalize that shape.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn os_facts(&self, host: &str) -> RemoteResult<OsFacts>;
    async fn memory_modules(&self, host: &str) -> RemoteResult<Vec<u64>>;
    async fn machine_model(&self, host: &str) -> RemoteResult<String>;
    async fn processors(&self, host: &str) -> RemoteResult<Vec<ProcessorInfo>>;
    async fn volumes(&self, host: &str) -> RemoteResult<Vec<VolumeInfo>>;
}

/// Remote command execution, with optional persistent sessions.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Opens a persistent session against `host`.
    async fn connect(&self, host: &str) -> RemoteResult<SessionHandle>;
    /// Runs `command` and returns its standard output.
    async fn execute(&self, target: ExecTarget<'_>, command: &str) -> RemoteResult<String>;
    /// Releases a session. The handle must not be reused afterwards.
    async fn disconnect(&self, session: SessionHandle);
}

/// Typed access to a remote registry, funnelled through the execution channel.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Reads the value at `path`\`name`. `Ok(None)` means the value does not exist.
    async fn get_value(
        &self,
        target: ExecTarget<'_>,
        path: &str,
        name: &str,
    ) -> RemoteResult<Option<RegistryData>>;

    async fn set_value(
        &self,
        target: ExecTarget<'_>,
        path: &str,
        name: &str,
        value: &RegistryData,
    ) -> RemoteResult<()>;
}
