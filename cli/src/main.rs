mod adapters;
mod commands;
mod hostlist;
mod terminal;

use commands::{CommandLine, Commands, probe, registry};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    match commands.command {
        Commands::Probe(args) => {
            print::header("probing fleet");
            probe::run(args).await
        }
        Commands::Registry(args) => {
            print::header("registry change with rollback capture");
            registry::run(args).await
        }
    }
}
