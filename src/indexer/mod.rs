//! Indexing stage of the pipeline
//!
//! Runs on the coordinator task and is the only writer to the backend.

mod sink;

pub use sink::IndexingSink;
