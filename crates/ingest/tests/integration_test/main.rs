/// Integration tests for document ingestion covering the worked scenarios,
/// cross-component properties, and job file I/O.

mod helpers;
mod properties;
mod scenarios;
mod worker_io;
