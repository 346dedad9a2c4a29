//! # Probe Pipeline
//!
//! Orchestrates the per-host stage sequence and the bounded batch runner.
//!
//! Stage ordering is a DAG: connectivity first, then the independent enrichment
//! stages, then the registry mutation (if requested), then volume expansion (the
//! only stage that changes cardinality), then session release. Hosts are processed
//! concurrently up to a bounded pool size; output preserves input order.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use fleetprobe_common::config::PipelineConfig;
use fleetprobe_common::connectivity::ConnectivityStatus;
use fleetprobe_common::error::{RemoteError, RemoteResult};
use fleetprobe_common::record::{Field, TargetRecord};
use fleetprobe_common::registry::RegistryMutation;

use crate::ports::{InventorySource, ReachabilityProbe, RegistryStore, RemoteTransport};
use crate::session::HostContext;

/// Invoked after each host finishes, with the number of hosts completed so far.
pub type ProgressFn = Box<dyn Fn(usize) + Send + Sync>;

/// Stage-specific gate, combined with reachability by [`Gate::is_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Inventory-derived fields (OS, memory, model, processors, volumes).
    Inventory,
    /// Remote-execution-derived fields (timezone, locale, registry).
    RemoteExec,
}

impl Gate {
    pub fn is_open(self, conn: ConnectivityStatus) -> bool {
        conn.ping
            && match self {
                Gate::Inventory => conn.management,
                Gate::RemoteExec => conn.remote_exec,
            }
    }
}

/// The probe pipeline service. Owns the collaborator ports and the configuration;
/// cheap to clone (ports are shared).
#[derive(Clone)]
pub struct ProbePipeline {
    reachability: Arc<dyn ReachabilityProbe>,
    inventory: Arc<dyn InventorySource>,
    transport: Arc<dyn RemoteTransport>,
    registry: Arc<dyn RegistryStore>,
    cfg: PipelineConfig,
    mutation: Option<RegistryMutation>,
}

impl ProbePipeline {
    pub fn new(
        reachability: Arc<dyn ReachabilityProbe>,
        inventory: Arc<dyn InventorySource>,
        transport: Arc<dyn RemoteTransport>,
        registry: Arc<dyn RegistryStore>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            reachability,
            inventory,
            transport,
            registry,
            cfg,
            mutation: None,
        }
    }

    /// Attaches a registry mutation to run against every record that passes the
    /// remote-execution gate.
    pub fn with_mutation(mut self, mutation: RegistryMutation) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    pub(crate) fn reachability(&self) -> &dyn ReachabilityProbe {
        self.reachability.as_ref()
    }

    pub(crate) fn inventory(&self) -> &dyn InventorySource {
        self.inventory.as_ref()
    }

    pub(crate) fn transport(&self) -> &dyn RemoteTransport {
        self.transport.as_ref()
    }

    pub(crate) fn registry(&self) -> &dyn RegistryStore {
        self.registry.as_ref()
    }

    /// Conditional stage executor shared by every enrichment stage.
    ///
    /// The body runs iff `(ping AND stage gate) OR no_error_check`. A closed gate
    /// yields [`Field::NoTry`] without the attempt future ever being polled, so no
    /// remote call happens. A failed attempt (including a forced one under the
    /// override) degrades to [`Field::Blank`].
    pub(crate) async fn gated<T, F>(
        &self,
        conn: ConnectivityStatus,
        gate: Gate,
        stage: &str,
        attempt: F,
    ) -> Field<T>
    where
        F: Future<Output = RemoteResult<T>> + Send,
    {
        if !gate.is_open(conn) && !self.cfg.no_error_check {
            debug!(stage, "gate unmet, writing sentinel");
            return Field::NoTry;
        }
        match self.bounded(attempt).await {
            Ok(value) => Field::Value(value),
            Err(err) => {
                warn!(stage, %err, "remote call failed, field left blank");
                Field::Blank
            }
        }
    }

    /// Applies the per-call timeout so one stalled host cannot hold the batch.
    pub(crate) async fn bounded<T, F>(&self, fut: F) -> RemoteResult<T>
    where
        F: Future<Output = RemoteResult<T>> + Send,
    {
        match tokio::time::timeout(self.cfg.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout),
        }
    }

    /// Runs the full stage sequence for one host. Never fails: every remote error
    /// has already degraded to sentinel/blank state by the time it returns.
    pub async fn process_host(&self, record: TargetRecord) -> Vec<TargetRecord> {
        let mut ctx = HostContext::new(record);

        self.probe_connectivity(&mut ctx).await;
        self.enrich_os_version(&mut ctx).await;
        self.enrich_time_zone(&mut ctx).await;
        self.enrich_culture(&mut ctx).await;
        self.enrich_total_memory(&mut ctx).await;
        self.enrich_machine_model(&mut ctx).await;
        self.enrich_processors(&mut ctx).await;

        if let Some(mutation) = self.mutation.clone() {
            self.mutate_registry(&mut ctx, &mutation).await;
        }

        let rows = self.expand_volumes(&mut ctx).await;
        self.release_session(&mut ctx).await;
        rows
    }

    /// Probes and enriches a batch of records with bounded concurrency.
    ///
    /// Records keep their input order in the output; a host's expansion rows stay
    /// contiguous. One host failing (or its task panicking) never disturbs the
    /// others.
    pub async fn run(
        &self,
        records: Vec<TargetRecord>,
        progress: Option<ProgressFn>,
    ) -> Vec<TargetRecord> {
        let pool = Arc::new(Semaphore::new(self.cfg.max_in_flight.max(1)));
        let progress: Option<Arc<ProgressFn>> = progress.map(Arc::new);
        let completed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(records.len());
        for record in records {
            let pipeline = self.clone();
            let pool = pool.clone();
            let completed = completed.clone();
            let progress = progress.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = pool.acquire_owned().await else {
                    return Vec::new();
                };
                let rows = pipeline.process_host(record).await;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = progress.as_deref() {
                    cb(done);
                }
                rows
            }));
        }

        let mut output = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(rows) => output.extend(rows),
                Err(err) => error!(%err, "host task failed"),
            }
        }
        output
    }
}
