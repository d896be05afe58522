/// Batch runtime module - Gateway

mod runner;

pub use runner::{ActionReport, BatchReport, BatchRunner, RunMetadata};
