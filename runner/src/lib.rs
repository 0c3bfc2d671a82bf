pub mod config;
pub mod executors;
pub mod ingest;
pub mod matrix;
pub mod record;
pub mod sink;
