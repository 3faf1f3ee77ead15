//! `primer <BOUND>`: write every prime up to BOUND to stdout as 64-bit
//! little-endian integers.

use std::fs::File;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use primer::cli::Cli;
use primer::{stream_primes, Error, LittleEndianSink};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout carries the binary stream, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("primer=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
            let _ = err.print();
            return code;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_broken_pipe() => {
            debug!("consumer closed the stream");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("primer: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> primer::Result<()> {
    let bound = cli.bound()?;
    let config = cli.sweep_config()?;

    let stats = match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| Error::CreateOutput {
                path: path.clone(),
                source,
            })?;
            stream_primes(bound, &config, &mut LittleEndianSink::new(file))?
        }
        None => stream_primes(bound, &config, &mut LittleEndianSink::new(io::stdout().lock()))?,
    };
    debug!(emitted = stats.emitted, "done");
    Ok(())
}
