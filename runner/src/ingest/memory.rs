//! Tolerant scanner for the memory report of the population command
//!
//! The report is free text (e.g. `used_memory: 1234, total_system_memory: 5678, maxmemory: 0`),
//! so this only looks for known labels and takes the token right after them. Anything
//! else in the output is ignored and a label seen twice keeps its last value.

use super::{MetricValue, TestMetrics};

/// label token -> canonical metric name
pub const MEMORY_LABELS: [(&str, &str); 3] = [
    ("used_memory:", "used_memory"),
    ("total_system_memory:", "total_system_memory"),
    ("maxmemory:", "maxmemory"),
];

fn canonical_name(token: &str) -> Option<&'static str> {
    MEMORY_LABELS
        .iter()
        .find(|(label, _)| *label == token)
        .map(|(_, name)| *name)
}

pub fn parse_memory<S: AsRef<str>>(tokens: &[S]) -> TestMetrics {
    let mut metrics = TestMetrics::new();

    for (position, token) in tokens.iter().enumerate() {
        let Some(name) = canonical_name(token.as_ref()) else {
            continue;
        };

        // a label as the last token has no value
        if let Some(value) = tokens.get(position + 1) {
            let value = value.as_ref();
            let value = value.strip_suffix(',').unwrap_or(value);

            metrics.insert(name.to_owned(), MetricValue::from(value));
        }
    }

    metrics
}
