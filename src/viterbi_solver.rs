use std::fmt::Debug;

use crate::error::Result;

pub mod hmm;
pub mod utils;
pub mod viterbi;

/// Common interface of a decoder that produces a state path.
pub trait Solver<S: Debug> {
    fn solve(&mut self) -> Result<Vec<S>, S>;
    /// Probability of the solution, once solved.
    fn get_objective(&self) -> Option<f64>;
    fn get_name(&self) -> String;
}
