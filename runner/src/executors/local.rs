use super::{ExecutorError, Invoker};
use crate::{config::TestGroup, matrix, sink::ResultSink};
use tracing::{debug, info, instrument};

/// Counters over a whole sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub emitted: usize,
    pub skipped: usize,
}

/// Executor that runs every combination one after another on the current thread
pub struct LocalExecutor<I> {
    groups: Vec<TestGroup>,
    invoker: I,
}

impl<I: Invoker> LocalExecutor<I> {
    pub fn load(groups: Vec<TestGroup>, invoker: I) -> Self {
        Self { groups, invoker }
    }

    /// run all groups in declaration order, handing successful records to `sink`
    #[instrument(skip_all, level = "info")]
    pub fn execute(&self, sink: &mut dyn ResultSink) -> Result<RunSummary, ExecutorError> {
        let mut summary = RunSummary::default();

        for (position, group) in self.groups.iter().enumerate() {
            let label = group.label(position);
            let combinations = matrix::expand(group);
            let total = combinations.len();

            info!(group = %label, "Starting group with {total} combinations");

            for (processed, parameters) in combinations.iter().enumerate() {
                debug!(group = %label, parameters = ?parameters, "Processing");

                match self.invoker.invoke(parameters) {
                    Some(record) => {
                        sink.store(record)?;
                        summary.emitted += 1;
                    }
                    // already reported by the invoker
                    None => summary.skipped += 1,
                }

                info!(group = %label, "Done with {}/{total}", processed + 1);
            }

            sink.finish_group(&label)?;
        }

        info!(
            emitted = summary.emitted,
            skipped = summary.skipped,
            "Done with processing"
        );

        Ok(summary)
    }
}
