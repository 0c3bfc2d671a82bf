pub mod batched;
pub mod stream;

use crate::record::ResultRecord;
use thiserror::Error;

pub use batched::BatchedSink;
pub use stream::StreamSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Consumer of the records produced by a sweep
pub trait ResultSink {
    fn store(&mut self, record: ResultRecord) -> Result<(), SinkError>;

    /// called once every combination of a group has been processed
    fn finish_group(&mut self, _group: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
