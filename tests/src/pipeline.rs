#![cfg(test)]

use std::sync::atomic::Ordering;
use std::time::Duration;

use fleetprobe_common::config::PipelineConfig;
use fleetprobe_common::record::{Field, TargetRecord};

use crate::fakes::{harness, FakeInventory, FakeProbe, FakeRegistry, FakeTransport};

fn cfg() -> PipelineConfig {
    PipelineConfig {
        call_timeout: Duration::from_secs(2),
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn unreachable_host_is_fully_sentineled() {
    let h = harness(
        FakeProbe::down(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H2")).await;

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(!row.connectivity.ping);
    assert!(!row.connectivity.management);
    assert!(!row.connectivity.remote_exec);
    assert!(row.boot_time.is_no_try());
    assert!(row.os_version.is_no_try());
    assert!(row.time_zone.is_no_try());
    assert!(row.culture.is_no_try());
    assert!(row.total_memory.is_no_try());
    assert!(row.machine_model.is_no_try());
    assert!(row.total_procs.is_no_try());
    assert!(row.volume.is_no_try());

    // One reachability attempt, zero remote calls of any kind.
    assert_eq!(h.probe.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.inventory.calls.total(), 0);
    assert_eq!(h.transport.connects.load(Ordering::SeqCst), 0);
    assert_eq!(h.transport.executes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn probing_unreachable_host_is_idempotent() {
    let h = harness(
        FakeProbe::down(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    let first = h.pipeline.process_host(TargetRecord::new("H2")).await;
    let second = h.pipeline.process_host(TargetRecord::new("H2")).await;

    assert!(!first[0].connectivity.ping);
    assert!(!second[0].connectivity.ping);
    assert_eq!(h.probe.calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.inventory.calls.total(), 0);
    assert_eq!(h.transport.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn management_failure_gates_inventory_fields_only() {
    let h = harness(
        FakeProbe::up(),
        FakeInventory::unavailable(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;
    let row = &rows[0];

    assert!(row.connectivity.ping);
    assert!(!row.connectivity.management);
    assert!(row.connectivity.remote_exec);

    // Inventory-gated fields are sentineled...
    assert!(row.boot_time.is_no_try());
    assert!(row.os_version.is_no_try());
    assert!(row.total_memory.is_no_try());
    assert!(row.machine_model.is_no_try());
    assert!(row.total_procs.is_no_try());
    assert!(row.volume.is_no_try());
    // ...while execution-gated fields still resolve.
    assert_eq!(row.time_zone, Field::Value("UTC".to_string()));
    assert_eq!(row.culture, Field::Value("UTC".to_string()));

    // Only the prober touched the inventory channel.
    assert_eq!(h.inventory.calls.os_facts.load(Ordering::SeqCst), 1);
    assert_eq!(h.inventory.calls.total(), 1);
}

#[tokio::test]
async fn healthy_host_resolves_all_fields() {
    let h = harness(
        FakeProbe::up(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;
    let row = &rows[0];

    assert!(row.connectivity.ping && row.connectivity.management && row.connectivity.remote_exec);
    assert!(row.boot_time.is_value());
    assert_eq!(row.os_version, Field::Value("2012 R2".to_string()));
    assert_eq!(row.total_memory, Field::Value("16 GB".to_string()));
    assert_eq!(row.machine_model, Field::Value("PowerEdge R740".to_string()));
    assert_eq!(row.total_procs, Field::Value(1));
    assert_eq!(
        row.proc_name,
        Field::Value("Intel(R) Xeon(R) Gold 6230".to_string())
    );
    assert_eq!(row.cores, Field::Value(20));
    assert_eq!(row.data_width, Field::Value(64));
    assert_eq!(row.volume, Field::Value("C:".to_string()));
    assert_eq!(row.capacity_gb, Field::Value(100));
    assert_eq!(row.pct_free, Field::Value("50.0".to_string()));
}

#[tokio::test]
async fn session_variant_connects_once_and_releases_once() {
    let h = harness(
        FakeProbe::up(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    h.pipeline.process_host(TargetRecord::new("H1")).await;

    // Timezone and culture both reuse the session established by the prober.
    assert_eq!(h.transport.connects.load(Ordering::SeqCst), 1);
    assert_eq!(h.transport.executes.load(Ordering::SeqCst), 2);
    assert_eq!(h.transport.disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(h.transport.leaked_sessions(), 0);
}

#[tokio::test]
async fn per_call_variant_never_connects() {
    let h = harness(
        FakeProbe::up(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        PipelineConfig {
            use_sessions: false,
            ..cfg()
        },
    );

    h.pipeline.process_host(TargetRecord::new("H1")).await;

    // No-op check plus timezone plus culture, all ad-hoc.
    assert_eq!(h.transport.connects.load(Ordering::SeqCst), 0);
    assert_eq!(h.transport.executes.load(Ordering::SeqCst), 3);
    assert_eq!(h.transport.disconnects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_session_establishment_gates_execution_fields() {
    let h = harness(
        FakeProbe::up(),
        FakeInventory::healthy(),
        FakeTransport::refusing(),
        FakeRegistry::empty(),
        cfg(),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;
    let row = &rows[0];

    assert!(row.connectivity.ping);
    assert!(row.connectivity.management);
    assert!(!row.connectivity.remote_exec);
    assert!(row.time_zone.is_no_try());
    assert!(row.culture.is_no_try());
    // Inventory fields are unaffected by the execution channel.
    assert_eq!(row.os_version, Field::Value("2012 R2".to_string()));
    assert_eq!(h.transport.executes.load(Ordering::SeqCst), 0);
    assert_eq!(h.transport.disconnects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn override_forces_attempts_and_failures_go_blank() {
    let mut inventory = FakeInventory::unavailable();
    inventory.facts = Err(fleetprobe_common::error::RemoteError::Unreachable);
    let h = harness(
        FakeProbe::down(),
        inventory,
        FakeTransport::refusing(),
        FakeRegistry::empty(),
        PipelineConfig {
            no_error_check: true,
            ..cfg()
        },
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H3")).await;
    let row = &rows[0];

    assert!(!row.connectivity.ping);
    // Forced attempts were made and degraded to blank, not the sentinel.
    assert_eq!(row.os_version, Field::Blank);
    assert_eq!(row.time_zone, Field::Blank);
    assert_eq!(row.total_memory, Field::Blank);
    assert_eq!(row.volume, Field::Blank);
    assert!(h.inventory.calls.total() > 0);
}

#[tokio::test]
async fn stalled_remote_call_times_out_to_blank() {
    let mut transport = FakeTransport::healthy();
    transport.delay = Some(Duration::from_millis(200));
    let h = harness(
        FakeProbe::up(),
        FakeInventory::healthy(),
        transport,
        FakeRegistry::empty(),
        PipelineConfig {
            use_sessions: false,
            call_timeout: Duration::from_millis(20),
            ..cfg()
        },
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;
    let row = &rows[0];

    // The no-op execution check timed out, so the channel reads as down and the
    // batch kept moving.
    assert!(!row.connectivity.remote_exec);
    assert!(row.time_zone.is_no_try());
    assert_eq!(row.os_version, Field::Value("2012 R2".to_string()));
}

#[tokio::test]
async fn batch_preserves_input_order() {
    let h = harness(
        FakeProbe::down(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        PipelineConfig {
            max_in_flight: 4,
            ..cfg()
        },
    );

    let records = (1..=9)
        .map(|i| TargetRecord::new(format!("H{i}")))
        .collect();
    let rows = h.pipeline.run(records, None).await;

    let names: Vec<&str> = rows
        .iter()
        .map(|row| row.computer_name.as_str())
        .collect();
    let expected: Vec<String> = (1..=9).map(|i| format!("H{i}")).collect();
    assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn batch_reports_progress() {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    let h = harness(
        FakeProbe::down(),
        FakeInventory::healthy(),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(),
    );

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_ref = seen.clone();
    let records = (1..=5)
        .map(|i| TargetRecord::new(format!("H{i}")))
        .collect();
    h.pipeline
        .run(
            records,
            Some(Box::new(move |done| {
                seen_ref.fetch_max(done, Ordering::SeqCst);
            })),
        )
        .await;

    assert_eq!(seen.load(Ordering::SeqCst), 5);
}
