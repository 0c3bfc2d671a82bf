pub mod memory;

use crate::config::MetricsStream;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single extracted metric, numeric when the reported token parses as an integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Text(String),
}

impl From<&str> for MetricValue {
    fn from(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(value) => Self::Integer(value),
            Err(_) => Self::Text(token.to_owned()),
        }
    }
}

/// canonical metric name -> value
pub type TestMetrics = BTreeMap<String, MetricValue>;

#[derive(Debug, Clone, Default)]
/// container for information extracted from running the population command
/// supposed to be interpreted by ingestors
pub struct RunOutput {
    pub runtime: u128,
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
}

impl RunOutput {
    fn parse(text: &str) -> TestMetrics {
        memory::parse_memory(text.split_whitespace().collect::<Vec<_>>().as_slice())
    }

    /// each stream is scanned on its own, a label never takes its value from the other stream
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn ingest(&self, stream: MetricsStream) -> TestMetrics {
        match stream {
            MetricsStream::Stderr => Self::parse(&self.stderr),
            MetricsStream::Stdout => Self::parse(&self.stdout),
            MetricsStream::Both => {
                let mut metrics = Self::parse(&self.stdout);
                metrics.extend(Self::parse(&self.stderr));
                metrics
            }
        }
    }
}
