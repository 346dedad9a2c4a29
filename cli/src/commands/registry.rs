use std::time::Instant;

use anyhow::Context;

use fleetprobe_common::registry::{RegistryData, RegistryMutation};

use crate::commands::RegistryArgs;
use crate::commands::probe::{build_pipeline, print_summary, run_with_progress};
use crate::hostlist;
use crate::terminal::table;

pub async fn run(args: RegistryArgs) -> anyhow::Result<()> {
    let value = RegistryData::parse(&args.kind, &args.value)
        .map_err(anyhow::Error::msg)
        .context("parsing --value")?;
    let mutation = RegistryMutation {
        path: args.path.clone(),
        name: args.name.clone(),
        value,
    };

    let records = hostlist::load(&args.common.list)
        .with_context(|| format!("reading host list {}", args.common.list.display()))?;
    let pipeline = build_pipeline(&args.common, false).with_mutation(mutation);

    let start = Instant::now();
    let rows = run_with_progress(&pipeline, records).await;

    table::print_registry_table(&rows);
    if let Some(path) = &args.common.output {
        table::write_delimited(path, &rows)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    print_summary(&rows, start.elapsed());
    Ok(())
}
