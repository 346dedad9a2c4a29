//! Tabular rendering and delimited export of the record set.
//!
//! The core only guarantees a fully-populated-or-sentineled field set per record;
//! everything visual lives here.

use std::io::Write;
use std::path::Path;

use colored::*;
use unicode_width::UnicodeWidthStr;

use fleetprobe_common::record::{SENTINEL, TargetRecord};

type Column = (&'static str, fn(&TargetRecord) -> String);

const PROBE_COLUMNS: &[Column] = &[
    ("ComputerName", |r| r.computer_name.clone()),
    ("Ping", |r| bool_cell(r.connectivity.ping)),
    ("WMI", |r| bool_cell(r.connectivity.management)),
    ("PSRemote", |r| bool_cell(r.connectivity.remote_exec)),
    ("BootTime", |r| {
        r.boot_time
            .value()
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| r.boot_time.to_string())
    }),
    ("OSVersion", |r| r.os_version.to_string()),
    ("TotalMemory", |r| r.total_memory.to_string()),
    ("MachineModel", |r| r.machine_model.to_string()),
    ("TotalProcs", |r| r.total_procs.to_string()),
    ("Volumes", |r| r.volume.to_string()),
    ("DriveType", |r| r.drive_type.to_string()),
    ("Capacity", |r| r.capacity_gb.to_string()),
    ("PctFree", |r| r.pct_free.to_string()),
];

const REGISTRY_COLUMNS: &[Column] = &[
    ("ComputerName", |r| r.computer_name.clone()),
    ("Ping", |r| bool_cell(r.connectivity.ping)),
    ("PSRemote", |r| bool_cell(r.connectivity.remote_exec)),
    ("Path", |r| r.reg_path.to_string()),
    ("Name", |r| r.reg_name.to_string()),
    ("OriginalType", |r| r.original_kind.to_string()),
    ("OriginalValue", |r| r.original_value.to_string()),
    ("Result", |r| r.reg_result.to_string()),
];

/// Every field the pipeline can populate, for the delimited export.
const ALL_COLUMNS: &[Column] = &[
    ("ComputerName", |r| r.computer_name.clone()),
    ("Role", |r| r.role.clone().unwrap_or_default()),
    ("Location", |r| r.location.clone().unwrap_or_default()),
    ("Ping", |r| bool_cell(r.connectivity.ping)),
    ("WMI", |r| bool_cell(r.connectivity.management)),
    ("PSRemote", |r| bool_cell(r.connectivity.remote_exec)),
    ("BootTime", |r| {
        r.boot_time
            .value()
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| r.boot_time.to_string())
    }),
    ("OSVersion", |r| r.os_version.to_string()),
    ("TimeZone", |r| r.time_zone.to_string()),
    ("Culture", |r| r.culture.to_string()),
    ("TotalMemory", |r| r.total_memory.to_string()),
    ("MachineModel", |r| r.machine_model.to_string()),
    ("TotalProcs", |r| r.total_procs.to_string()),
    ("ProcName", |r| r.proc_name.to_string()),
    ("Cores", |r| r.cores.to_string()),
    ("DataWidth", |r| r.data_width.to_string()),
    ("Volumes", |r| r.volume.to_string()),
    ("DriveType", |r| r.drive_type.to_string()),
    ("Capacity", |r| r.capacity_gb.to_string()),
    ("PctFree", |r| r.pct_free.to_string()),
    ("Path", |r| r.reg_path.to_string()),
    ("Name", |r| r.reg_name.to_string()),
    ("OriginalType", |r| r.original_kind.to_string()),
    ("OriginalValue", |r| r.original_value.to_string()),
    ("Result", |r| r.reg_result.to_string()),
];

pub fn print_probe_table(rows: &[TargetRecord]) {
    print_table(PROBE_COLUMNS, rows);
}

pub fn print_registry_table(rows: &[TargetRecord]) {
    print_table(REGISTRY_COLUMNS, rows);
}

/// Writes the full record set as tab-separated rows with a header line.
pub fn write_delimited(path: &Path, rows: &[TargetRecord]) -> std::io::Result<()> {
    let mut out = std::fs::File::create(path)?;
    let header: Vec<&str> = ALL_COLUMNS.iter().map(|(name, _)| *name).collect();
    writeln!(out, "{}", header.join("\t"))?;
    for row in rows {
        writeln!(out, "{}", grid_row(ALL_COLUMNS, row).join("\t"))?;
    }
    Ok(())
}

/// Cells for one record. Separator rows from volume expansion stay fully empty
/// instead of picking up default connectivity flags.
fn grid_row(columns: &[Column], row: &TargetRecord) -> Vec<String> {
    if row.is_separator() {
        return vec![String::new(); columns.len()];
    }
    columns.iter().map(|(_, cell)| cell(row)).collect()
}

fn print_table(columns: &[Column], rows: &[TargetRecord]) {
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|(name, _)| UnicodeWidthStr::width(*name))
        .collect();
    let grid: Vec<Vec<String>> = rows.iter().map(|row| grid_row(columns, row)).collect();
    for cells in &grid {
        for (idx, cell) in cells.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|((name, _), &width)| format!("{name:<width$}"))
        .collect();
    println!("{}", header.join("  ").bold());

    for cells in &grid {
        if cells.iter().all(|cell| cell.is_empty()) {
            // Separator rows from volume expansion render as blank lines.
            println!();
            continue;
        }
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let padded = format!("{cell:<width$}");
                stylize(cell, padded)
            })
            .collect();
        println!("{}", line.join("  "));
    }
}

fn stylize(cell: &str, padded: String) -> String {
    match cell {
        _ if cell == SENTINEL => padded.yellow().dimmed().to_string(),
        "False" | "Error" => padded.red().to_string(),
        "True" | "Success" => padded.green().to_string(),
        _ => padded,
    }
}

fn bool_cell(value: bool) -> String {
    if value { "True".into() } else { "False".into() }
}
