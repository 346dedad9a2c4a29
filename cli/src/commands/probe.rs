use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;

use fleetprobe_common::config::PipelineConfig;
use fleetprobe_common::record::TargetRecord;
use fleetprobe_common::success;
use fleetprobe_core::ProbePipeline;

use crate::adapters::inventory::CommandInventory;
use crate::adapters::ping::SystemPing;
use crate::adapters::registry::CommandRegistry;
use crate::adapters::ssh::OpenSshTransport;
use crate::commands::{CommonArgs, ProbeArgs};
use crate::hostlist;
use crate::terminal::{progress, table};

pub async fn run(args: ProbeArgs) -> anyhow::Result<()> {
    let records = hostlist::load(&args.common.list)
        .with_context(|| format!("reading host list {}", args.common.list.display()))?;
    let pipeline = build_pipeline(&args.common, args.report);

    let start = Instant::now();
    let rows = run_with_progress(&pipeline, records).await;

    table::print_probe_table(&rows);
    if let Some(path) = &args.common.output {
        table::write_delimited(path, &rows)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    print_summary(&rows, start.elapsed());
    Ok(())
}

/// Builds the pipeline against the shell-out adapters. Real deployments swap these
/// for their own port implementations.
pub fn build_pipeline(common: &CommonArgs, report_mode: bool) -> ProbePipeline {
    let cfg = PipelineConfig {
        no_error_check: common.no_error_check,
        use_sessions: !common.no_sessions,
        report_mode,
        trailing_separators: !common.no_separators,
        call_timeout: Duration::from_secs(common.timeout),
        max_in_flight: common.parallel,
    };

    let transport = Arc::new(OpenSshTransport::new());
    ProbePipeline::new(
        Arc::new(SystemPing::new(cfg.call_timeout)),
        Arc::new(CommandInventory::new(transport.clone())),
        transport.clone(),
        Arc::new(CommandRegistry::new(transport)),
        cfg,
    )
}

pub async fn run_with_progress(
    pipeline: &ProbePipeline,
    records: Vec<TargetRecord>,
) -> Vec<TargetRecord> {
    let bar = progress::host_bar(records.len());
    let bar_ref = bar.clone();
    let rows = pipeline
        .run(
            records,
            Some(Box::new(move |done| bar_ref.set_position(done as u64))),
        )
        .await;
    bar.finish_and_clear();
    rows
}

pub fn print_summary(rows: &[TargetRecord], total_time: Duration) {
    let hosts = rows
        .iter()
        .filter(|row| !row.computer_name.is_empty())
        .map(|row| row.computer_name.as_str())
        .collect::<std::collections::BTreeSet<_>>();
    let reachable = rows
        .iter()
        .filter(|row| !row.computer_name.is_empty() && row.connectivity.ping)
        .map(|row| row.computer_name.as_str())
        .collect::<std::collections::BTreeSet<_>>();

    let counts = format!("{} of {} hosts reachable", reachable.len(), hosts.len())
        .bold()
        .green();
    let elapsed = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    success!("{counts} in {elapsed}");
}
