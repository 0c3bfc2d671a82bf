use crate::{ingest::TestMetrics, matrix::ParameterRecord};
use serde::Serialize;

/// Parameters of one successful run merged with the metrics it reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub parameters: ParameterRecord,
    #[serde(flatten)]
    pub metrics: TestMetrics,
    // label of the benchmarked server implementation, never passed to the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ResultRecord {
    pub fn new(parameters: ParameterRecord, metrics: TestMetrics, target: Option<String>) -> Self {
        Self {
            parameters,
            metrics,
            target,
        }
    }
}
