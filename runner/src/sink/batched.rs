use super::{ResultSink, SinkError};
use crate::record::ResultRecord;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GroupDocument<'a> {
    group: &'a str,
    records: &'a [ResultRecord],
}

/// Buffers the records of a group and writes them as one JSON document once the group is done
/// The documents are the input of the plotting front-end
#[derive(Debug)]
pub struct BatchedSink<W: Write> {
    writer: W,
    buffer: Vec<ResultRecord>,
}

impl<W: Write> BatchedSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for BatchedSink<W> {
    fn store(&mut self, record: ResultRecord) -> Result<(), SinkError> {
        self.buffer.push(record);

        Ok(())
    }

    fn finish_group(&mut self, group: &str) -> Result<(), SinkError> {
        serde_json::to_writer(
            &mut self.writer,
            &GroupDocument {
                group,
                records: &self.buffer,
            },
        )?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        debug!(group = group, records = self.buffer.len(), "Handed group to plotting");
        self.buffer.clear();

        Ok(())
    }
}
