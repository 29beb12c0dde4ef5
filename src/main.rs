mod cli;

use std::io;

use clap::Parser;
use env_logger::Env;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::run(&args.command, &mut out)
}
