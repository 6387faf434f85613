pub mod result_processor;

pub use result_processor::{LineResult, ProcessStats, ResultProcessor};
