pub mod primenet_client;

pub use primenet_client::{
    EndBit, PrimeNetClient, ResultSubmitter, ResultType, SubmissionRequest, SubmissionResult,
    SubmitOptions,
};
