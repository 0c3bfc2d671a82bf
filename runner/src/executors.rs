pub mod command;
pub mod local;

use crate::{matrix::ParameterRecord, record::ResultRecord, sink::SinkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to hand results to the sink: {0}")]
    Sink(#[from] SinkError),
}

/// Where and as whom the population command connects, plus the label attached to its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub addr: String,
    pub password: String,
    pub target: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            addr: "localhost:6379".to_owned(),
            password: String::new(),
            target: None,
        }
    }
}

/// Runs a single point of the sweep
/// `None` means the run failed, was already reported and should be skipped
pub trait Invoker {
    fn invoke(&self, parameters: &ParameterRecord) -> Option<ResultRecord>;
}
