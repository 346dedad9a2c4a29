//! # Volume Expansion Stage
//!
//! The only stage that changes cardinality: one input record becomes one row per
//! discovered volume. The first volume's facts overwrite the parent record; rows for
//! the remaining volumes are either full copies of that parent (default) or minimal
//! uninherited rows (report mode). The trailing blank/separator rows mirror the
//! historical interactive-table output shape and sit behind
//! `PipelineConfig::trailing_separators`.

use fleetprobe_common::record::{DriveType, Field, TargetRecord};

use crate::pipeline::{Gate, ProbePipeline};
use crate::ports::VolumeInfo;
use crate::session::HostContext;

const BYTES_PER_GB: f64 = 1_073_741_824.0;

impl ProbePipeline {
    /// Queries the host's volumes and expands the context's record into output
    /// rows. With the gate unmet this emits exactly one sentineled record.
    pub async fn expand_volumes(&self, ctx: &mut HostContext) -> Vec<TargetRecord> {
        let conn = ctx.record.connectivity;
        let host = ctx.record.computer_name.clone();
        let outcome = self
            .gated(conn, Gate::Inventory, "volumes", self.inventory().volumes(&host))
            .await;

        let parent = std::mem::take(&mut ctx.record);
        let cfg = self.config();
        match outcome {
            Field::Value(volumes) => {
                expand(parent, &volumes, cfg.report_mode, cfg.trailing_separators)
            }
            Field::NoTry => vec![mark_volume_fields(parent, true)],
            _ => vec![mark_volume_fields(parent, false)],
        }
    }
}

fn expand(
    mut parent: TargetRecord,
    volumes: &[VolumeInfo],
    report_mode: bool,
    trailing_separators: bool,
) -> Vec<TargetRecord> {
    let Some(first) = volumes.first() else {
        // Gate was open but nothing came back; the record still passes through.
        return vec![mark_volume_fields(parent, false)];
    };

    apply_volume(&mut parent, first);
    let mut rows = vec![parent.clone()];

    if volumes.len() == 1 {
        // Single-volume hosts keep the separator row so both branches share one
        // output shape.
        if trailing_separators {
            rows.push(TargetRecord::empty());
        }
        return rows;
    }

    for volume in &volumes[1..] {
        let mut row = if report_mode {
            TargetRecord::empty()
        } else {
            parent.clone()
        };
        apply_volume(&mut row, volume);
        rows.push(row);
    }

    if trailing_separators {
        if report_mode {
            rows.push(blank_volume_row());
        }
        rows.push(TargetRecord::empty());
    }
    rows
}

fn apply_volume(record: &mut TargetRecord, volume: &VolumeInfo) {
    let drive_type = DriveType::from_code(volume.drive_type);
    record.volume = Field::Value(volume.label.clone());
    record.drive_type = Field::Value(drive_type);
    record.capacity_gb = Field::Value((volume.capacity_bytes as f64 / BYTES_PER_GB).round() as u64);
    // Free-space percentage is only meaningful for fixed disks.
    record.pct_free = if drive_type == DriveType::Fixed && volume.capacity_bytes > 0 {
        let pct = volume.free_bytes as f64 / volume.capacity_bytes as f64 * 100.0;
        Field::Value(format!("{pct:.1}"))
    } else {
        Field::Blank
    };
}

fn mark_volume_fields(mut record: TargetRecord, no_try: bool) -> TargetRecord {
    if no_try {
        record.volume = Field::NoTry;
        record.drive_type = Field::NoTry;
        record.capacity_gb = Field::NoTry;
        record.pct_free = Field::NoTry;
    } else {
        record.volume = Field::Blank;
        record.drive_type = Field::Blank;
        record.capacity_gb = Field::Blank;
        record.pct_free = Field::Blank;
    }
    record
}

fn blank_volume_row() -> TargetRecord {
    let mut row = TargetRecord::empty();
    row.volume = Field::Blank;
    row.drive_type = Field::Blank;
    row.capacity_gb = Field::Blank;
    row.pct_free = Field::Blank;
    row
}
