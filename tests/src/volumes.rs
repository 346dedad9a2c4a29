#![cfg(test)]

use std::time::Duration;

use fleetprobe_common::config::PipelineConfig;
use fleetprobe_common::record::{DriveType, Field, TargetRecord};

use crate::fakes::{
    cdrom_volume, fixed_volume, harness, FakeInventory, FakeProbe, FakeRegistry, FakeTransport,
};

fn cfg(report_mode: bool) -> PipelineConfig {
    PipelineConfig {
        report_mode,
        call_timeout: Duration::from_secs(2),
        ..PipelineConfig::default()
    }
}

fn inventory_with_volumes(volumes: Vec<fleetprobe_core::ports::VolumeInfo>) -> FakeInventory {
    let mut inventory = FakeInventory::healthy();
    inventory.volumes = Ok(volumes);
    inventory
}

#[tokio::test]
async fn single_volume_host_emits_value_row_and_separator() {
    let h = harness(
        FakeProbe::up(),
        inventory_with_volumes(vec![fixed_volume("C:", 100, 50.0)]),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(false),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].volume, Field::Value("C:".to_string()));
    assert!(rows[1].is_separator());
}

#[tokio::test]
async fn report_mode_three_volumes_shape() {
    // C: 100GB/50% fixed, D: 200GB/10% fixed, E: CD-ROM.
    let h = harness(
        FakeProbe::up(),
        inventory_with_volumes(vec![
            fixed_volume("C:", 100, 50.0),
            fixed_volume("D:", 200, 10.0),
            cdrom_volume("E:"),
        ]),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(true),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;

    // Three value rows plus the documented trailing blank rows.
    assert_eq!(rows.len(), 5);

    // First row keeps the parent's identity and columns.
    assert_eq!(rows[0].computer_name, "H1");
    assert_eq!(rows[0].volume, Field::Value("C:".to_string()));
    assert_eq!(rows[0].pct_free, Field::Value("50.0".to_string()));

    // Expansion rows are minimal: no inherited identity or enrichment columns.
    assert!(rows[1].computer_name.is_empty());
    assert_eq!(rows[1].os_version, Field::Unset);
    assert_eq!(rows[1].volume, Field::Value("D:".to_string()));
    assert_eq!(rows[1].pct_free, Field::Value("10.0".to_string()));

    // Non-fixed drives carry no free-space percentage.
    assert_eq!(rows[2].drive_type, Field::Value(DriveType::CdRom));
    assert_eq!(rows[2].pct_free, Field::Blank);

    assert!(rows[3].is_separator());
    assert!(rows[4].is_separator());
}

#[tokio::test]
async fn default_mode_expansion_rows_inherit_parent_columns() {
    let h = harness(
        FakeProbe::up(),
        inventory_with_volumes(vec![
            fixed_volume("C:", 100, 50.0),
            fixed_volume("D:", 200, 10.0),
        ]),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(false),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].computer_name, "H1");
    assert_eq!(rows[1].os_version, Field::Value("2012 R2".to_string()));
    assert_eq!(rows[1].volume, Field::Value("D:".to_string()));
    assert!(rows[2].is_separator());
}

#[tokio::test]
async fn zero_volumes_still_pass_the_record_through() {
    let h = harness(
        FakeProbe::up(),
        inventory_with_volumes(Vec::new()),
        FakeTransport::healthy(),
        FakeRegistry::empty(),
        cfg(false),
    );

    let rows = h.pipeline.process_host(TargetRecord::new("H1")).await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].computer_name, "H1");
    assert_eq!(rows[0].volume, Field::Blank);
}
