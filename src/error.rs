//! Error type shared by model validation, decoding and model loading.

use std::fmt::Debug;

use thiserror::Error;

/// Everything that can go wrong while building a decoding session or running it.
///
/// The type is generic over the state identity so that row errors can name
/// the offending state.
#[derive(Debug, Error)]
pub enum ViterbiError<S: Debug> {
    #[error("empty states enum, or no explicit initial distribution provided")]
    EmptyStateSpace,

    #[error("empty observations enum, or no explicit observations provided")]
    EmptyObservationSequence,

    #[error("the sum of initial distributions should be 1.0, was {sum}")]
    MalformedInitialDistribution { sum: f64 },

    #[error("at least one transition probability should be provided, 0 given")]
    MissingTransitions,

    #[error("sum of transition probabilities for each state should be one, was {sum} for state {state:?}")]
    MalformedTransitionRow { state: S, sum: f64 },

    #[error("at least one emission probability should be provided, 0 given")]
    MissingEmissions,

    #[error("sum of emission probabilities for each state should be one, was {sum} for state {state:?}")]
    MalformedEmissionRow { state: S, sum: f64 },

    /// The observation at this position is not part of the model's declared
    /// observation universe.
    #[error("observation #{position} is not declared by the model")]
    UnknownObservation { position: usize },

    #[error("every step has already been computed")]
    AlreadyComplete,

    #[error("backtrace requested after {computed} of {total} steps")]
    Incomplete { computed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, S> = std::result::Result<T, ViterbiError<S>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_errors_name_the_state() {
        let err: ViterbiError<&str> = ViterbiError::MalformedTransitionRow { state: "STATE0", sum: 1.1 };
        assert_eq!(
            err.to_string(),
            "sum of transition probabilities for each state should be one, was 1.1 for state \"STATE0\""
        );
    }

    #[test]
    fn incomplete_reports_progress() {
        let err: ViterbiError<u8> = ViterbiError::Incomplete { computed: 1, total: 3 };
        assert_eq!(err.to_string(), "backtrace requested after 1 of 3 steps");
    }
}
