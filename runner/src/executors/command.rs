use super::{ConnectionSettings, Invoker};
use crate::{
    config::{CommandConfig, MetricsStream},
    ingest::RunOutput,
    matrix::ParameterRecord,
    record::ResultRecord,
};
use std::{
    path::PathBuf,
    process::{Command, Stdio},
    time::Instant,
};
use tracing::{debug, error, trace};

/// Invokes the population command once per parameter record, synchronously and without retries
#[derive(Debug, Clone)]
pub struct PopulateCommand {
    exec: PathBuf,
    subcommand: String,
    metrics_stream: MetricsStream,
    connection: ConnectionSettings,
}

impl PopulateCommand {
    pub fn new(config: &CommandConfig, connection: ConnectionSettings) -> Self {
        Self {
            exec: config.exec.clone(),
            subcommand: config.subcommand.clone(),
            metrics_stream: config.metrics_stream,
            connection,
        }
    }

    /// full argument list after the executable
    pub fn arguments(&self, parameters: &ParameterRecord) -> Vec<String> {
        let mut args = vec![
            self.subcommand.clone(),
            // flush the database so every run starts from an empty keyspace
            "-e".to_owned(),
            "-a".to_owned(),
            self.connection.addr.clone(),
            "-p".to_owned(),
            self.connection.password.clone(),
        ];

        args.extend(
            parameters
                .fields()
                .into_iter()
                .map(|(name, value)| format!("--{}={value}", name.replace('_', "-"))),
        );

        args
    }

    /// spawn the command and wait for it, `Err` only if it could not be run at all
    fn run(&self, args: &[String]) -> std::io::Result<RunOutput> {
        let start = Instant::now();
        let output = Command::new(&self.exec)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(RunOutput {
            runtime: start.elapsed().as_nanos(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}

impl Invoker for PopulateCommand {
    #[tracing::instrument(level = "debug", skip(self))]
    fn invoke(&self, parameters: &ParameterRecord) -> Option<ResultRecord> {
        let args = self.arguments(parameters);

        let output = match self.run(&args) {
            Ok(output) => output,
            Err(e) => {
                error!(
                    exec = ?self.exec,
                    args = ?args,
                    "Failed to spawn population command: {e}"
                );

                return None;
            }
        };

        debug!(
            "Finished in {} ns | status: {:?}",
            output.runtime, output.status
        );
        trace!(stdout = output.stdout, stderr = output.stderr, "Output");

        if output.status != Some(0) {
            // `None` status means the child was killed by a signal
            error!(
                exec = ?self.exec,
                args = ?args,
                status = ?output.status,
                stderr = output.stderr.trim(),
                "Population command failed, skipping combination"
            );

            return None;
        }

        let metrics = output.ingest(self.metrics_stream);
        if metrics.is_empty() {
            debug!(stream = ?self.metrics_stream, "No memory metrics found in output");
        }

        Some(ResultRecord::new(
            parameters.clone(),
            metrics,
            self.connection.target.clone(),
        ))
    }
}
