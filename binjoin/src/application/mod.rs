pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use binjoin_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Combine {
            inputs,
            drops,
            moves,
            output,
        } => handlers::handle_combine(inputs, drops, moves, output).map(|_| ()),
        Commands::Pair {
            document,
            archive,
            output,
        } => handlers::handle_pair(document, archive, output).map(|_| ()),
        Commands::Inspect { file } => handlers::handle_inspect(file),
        Commands::Strip { file, out } => handlers::handle_strip(file, out),
    }
}
