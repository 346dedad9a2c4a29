/// Gating flags set once per record by the connectivity prober.
///
/// Downstream stages read these instead of inferring state from field presence:
/// inventory-derived stages gate on `management`, remote-execution-derived stages
/// gate on `remote_exec`, and both require `ping`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivityStatus {
    /// Reachability probe succeeded.
    pub ping: bool,
    /// Management/inventory channel answered (OS facts query).
    pub management: bool,
    /// Remote command execution is available (session established or no-op ran).
    pub remote_exec: bool,
}

impl ConnectivityStatus {
    pub fn unreachable() -> Self {
        Self::default()
    }
}
