//! Command-line front end: reads JSON Lines records, masks them and writes
//! JSON Lines results. Logs go to stderr; stdout carries only JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use command::{run_mask, run_pairs, MaskArgs, PairsArgs};
use deid_protocol::{masked_record_schema, serialize_json};

mod command;
mod io;

#[derive(Parser)]
#[command(name = "deid")]
#[command(about = "De-identify free text with stable placeholder tokens", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask a JSON Lines batch of records
    Mask(MaskArgs),

    /// Show candidate pairs and canonical ids for a set of strings
    Pairs(PairsArgs),

    /// Print the JSON schema of one output record
    Schema,
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Mask(args) => run_mask(&args),
        Commands::Pairs(args) => run_pairs(&args),
        Commands::Schema => {
            println!("{}", serialize_json(&masked_record_schema()?, true)?);
            Ok(())
        }
    }
}
