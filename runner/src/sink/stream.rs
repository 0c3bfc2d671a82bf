use super::{ResultSink, SinkError};
use crate::record::ResultRecord;
use std::io::Write;
use tracing::trace;

/// Writes every record as one JSON object per line as soon as it arrives
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    writer: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for StreamSink<W> {
    fn store(&mut self, record: ResultRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        // downstream consumers read line by line while the sweep is still running
        self.writer.flush()?;

        trace!(record = ?record, "Emitted record");

        Ok(())
    }
}
