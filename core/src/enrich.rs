//! # Enrichment Stages
//!
//! Independent field-producing stages. Each runs behind the shared conditional
//! executor, performs at most one remote call (reusing the attached session for
//! execution-channel stages), and maps the raw result onto its own fields.

use fleetprobe_common::record::Field;

use crate::pipeline::{Gate, ProbePipeline};
use crate::session::HostContext;

const TIME_ZONE_COMMAND: &str = "(Get-TimeZone).Id";
const CULTURE_COMMAND: &str = "(Get-Culture).Name";

const BYTES_PER_GB: f64 = 1_073_741_824.0;

impl ProbePipeline {
    /// Normalized OS version from the free-text caption, e.g.
    /// `"Microsoft Windows Server 2012 R2 Standard"` becomes `"2012 R2"`.
    pub async fn enrich_os_version(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let host = ctx.record.computer_name.clone();
        ctx.record.os_version = self
            .gated(conn, Gate::Inventory, "os-version", async {
                self.inventory()
                    .os_facts(&host)
                    .await
                    .map(|facts| normalize_caption(&facts.caption))
            })
            .await;
    }

    /// Configured timezone identifier, read over the execution channel.
    pub async fn enrich_time_zone(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let field = self
            .gated(conn, Gate::RemoteExec, "time-zone", async {
                self.transport()
                    .execute(ctx.exec_target(), TIME_ZONE_COMMAND)
                    .await
                    .map(|out| out.trim().to_string())
            })
            .await;
        ctx.record.time_zone = field;
    }

    /// Active locale name, read over the execution channel.
    pub async fn enrich_culture(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let field = self
            .gated(conn, Gate::RemoteExec, "culture", async {
                self.transport()
                    .execute(ctx.exec_target(), CULTURE_COMMAND)
                    .await
                    .map(|out| out.trim().to_string())
            })
            .await;
        ctx.record.culture = field;
    }

    /// Sum of physical memory module capacities, formatted as gigabytes.
    pub async fn enrich_total_memory(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let host = ctx.record.computer_name.clone();
        ctx.record.total_memory = self
            .gated(conn, Gate::Inventory, "total-memory", async {
                self.inventory()
                    .memory_modules(&host)
                    .await
                    .map(|modules| format_total_memory(&modules))
            })
            .await;
    }

    /// System enclosure/model string.
    pub async fn enrich_machine_model(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let host = ctx.record.computer_name.clone();
        ctx.record.machine_model = self
            .gated(conn, Gate::Inventory, "machine-model", async {
                self.inventory()
                    .machine_model(&host)
                    .await
                    .map(|model| model.trim().to_string())
            })
            .await;
    }

    /// Processor inventory. The port always returns a sequence, so the count is
    /// its length and name/cores/data-width come from the first entry.
    pub async fn enrich_processors(&self, ctx: &mut HostContext) {
        let conn = ctx.record.connectivity;
        let host = ctx.record.computer_name.clone();
        let outcome = self
            .gated(conn, Gate::Inventory, "processors", self.inventory().processors(&host))
            .await;

        let record = &mut ctx.record;
        match outcome {
            Field::Value(procs) if !procs.is_empty() => {
                record.total_procs = Field::Value(procs.len() as u32);
                let first = &procs[0];
                record.proc_name = Field::Value(first.name.clone());
                record.cores = Field::Value(first.cores);
                record.data_width = Field::Value(first.data_width);
            }
            Field::NoTry => {
                record.total_procs = Field::NoTry;
                record.proc_name = Field::NoTry;
                record.cores = Field::NoTry;
                record.data_width = Field::NoTry;
            }
            _ => {
                record.total_procs = Field::Blank;
                record.proc_name = Field::Blank;
                record.cores = Field::Blank;
                record.data_width = Field::Blank;
            }
        }
    }
}

/// Reduces a free-text OS caption to `"<version> <suffix>"`: the first token that
/// parses as an integer is the version, and an `R2` marker anywhere in the caption
/// is the suffix. Captions with no numeric token pass through trimmed.
pub fn normalize_caption(caption: &str) -> String {
    let tokens: Vec<&str> = caption.split_whitespace().collect();
    let version = tokens.iter().find_map(|token| token.parse::<u32>().ok());
    let r2 = tokens.iter().any(|token| token.eq_ignore_ascii_case("r2"));
    match (version, r2) {
        (Some(version), true) => format!("{version} R2"),
        (Some(version), false) => version.to_string(),
        (None, _) => caption.trim().to_string(),
    }
}

fn format_total_memory(modules: &[u64]) -> String {
    let total: u64 = modules.iter().sum();
    let gb = total as f64 / BYTES_PER_GB;
    let rounded = (gb * 100.0).round() / 100.0;
    format!("{rounded} GB")
}
