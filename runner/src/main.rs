use clap::Parser;
use resp_sweep::{
    config::{CommandOverrides, ConfigErrors, MetricsStream, SweepConfig},
    executors::{command::PopulateCommand, local::LocalExecutor, ConnectionSettings},
    sink::{BatchedSink, ResultSink, StreamSink},
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Sweep a key-value store population command over a parameter matrix and report memory usage
#[derive(Parser, Debug)]
#[command(name = "resp-sweep", version, about)]
struct Cli {
    /// Server address (host:port)
    #[arg(short, long, default_value = "localhost:6379")]
    addr: String,

    /// Authentication password
    #[arg(short, long, default_value = "")]
    password: String,

    /// Label of the benchmarked server implementation, attached to every record
    #[arg(short, long)]
    target: Option<String>,

    /// Sweep configuration (yaml), defaults to the embedded sweep
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Collect each group and write it as one document instead of streaming lines
    #[arg(long)]
    batch: bool,

    /// Population command, overrides command.exec
    #[arg(long)]
    exec: Option<PathBuf>,

    /// Subcommand of the population command, overrides command.subcommand
    #[arg(long)]
    subcommand: Option<String>,

    /// Stream carrying the memory report, overrides command.metrics_stream
    #[arg(long, value_enum)]
    metrics_stream: Option<MetricsStream>,
}

impl Cli {
    /// read the sweep once and apply command line overrides
    fn sweep(&self) -> Result<SweepConfig, ConfigErrors> {
        let mut sweep = match self.config {
            Some(ref path) => SweepConfig::load(path)?,
            None => SweepConfig::embedded()?,
        };

        sweep.command.apply(CommandOverrides {
            exec: self.exec.clone(),
            subcommand: self.subcommand.clone(),
            metrics_stream: self.metrics_stream,
        });

        sweep.preflight_checks()?;

        Ok(sweep)
    }

    fn connection(&self) -> ConnectionSettings {
        ConnectionSettings {
            addr: self.addr.clone(),
            password: self.password.clone(),
            target: self.target.clone(),
        }
    }

    fn writer(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self.output {
            Some(ref path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout().lock()),
        })
    }
}

fn main() -> ExitCode {
    // stdout carries the records, keep logs on stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let sweep = match cli.sweep() {
        Ok(sweep) => sweep,
        Err(e) => {
            error!("Failed to load sweep configuration: {e}");

            return ExitCode::FAILURE;
        }
    };

    let writer = match cli.writer() {
        Ok(writer) => writer,
        Err(e) => {
            error!(output = ?cli.output, "Failed to open output: {e}");

            return ExitCode::FAILURE;
        }
    };

    let invoker = PopulateCommand::new(&sweep.command, cli.connection());
    let executor = LocalExecutor::load(sweep.groups, invoker);

    let mut sink: Box<dyn ResultSink> = if cli.batch {
        Box::new(BatchedSink::new(writer))
    } else {
        Box::new(StreamSink::new(writer))
    };

    match executor.execute(sink.as_mut()) {
        Ok(summary) => {
            info!(
                emitted = summary.emitted,
                skipped = summary.skipped,
                "Sweep finished"
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Sweep aborted: {e}");

            ExitCode::FAILURE
        }
    }
}
