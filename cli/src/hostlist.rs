//! Host list loading: plain text, one host per line, `#` comments and blank lines
//! skipped. A line may carry provenance columns: `host,role,location`.

use std::path::Path;

use anyhow::{Context, bail};

use fleetprobe_common::record::TargetRecord;

pub fn load(path: &Path) -> anyhow::Result<Vec<TargetRecord>> {
    let contents = std::fs::read_to_string(path).context("host list not readable")?;
    let records: Vec<TargetRecord> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_line)
        .collect();
    if records.is_empty() {
        bail!("host list {} contains no hosts", path.display());
    }
    Ok(records)
}

fn parse_line(line: &str) -> TargetRecord {
    let mut columns = line.split(',').map(str::trim);
    let name = columns.next().unwrap_or_default();
    let role = columns.next().filter(|s| !s.is_empty()).map(str::to_string);
    let location = columns.next().filter(|s| !s.is_empty()).map(str::to_string);
    TargetRecord::with_provenance(name, role, location)
}
