//! Parsing: token classification and the state machine driving assignments.

mod classifier;
mod machine;

pub use machine::Parser;
