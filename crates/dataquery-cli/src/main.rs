use std::process::ExitCode;

use clap::Parser;
use dataquery_cli::{run, Cli, RealStdin};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // DQ_LOG takes precedence over -v.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DQ_LOG").unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli, &RealStdin) {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
