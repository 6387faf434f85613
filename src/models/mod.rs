pub mod assignment;
pub mod outcome;

pub use assignment::{AssignmentRecord, AssignmentRegistry};
pub use outcome::{Factor, FactorFound, NoFactorFound, ResultOutcome};
