//! Most-likely hidden state decoding for Hidden Markov Models.
//!
//! Build a model with [`HMM::builder`], bind it to an observation sequence
//! with [`Viterbi::new`], then either step through the trellis with
//! [`Viterbi::advance`] and [`Viterbi::finish`] or decode in one go with
//! [`Viterbi::calculate`].
//!
//! ```
//! use viterbi_machine::{HMM, Viterbi};
//!
//! let hmm = HMM::builder()
//!     .with_initial("Rainy", 0.6)
//!     .with_initial("Sunny", 0.4)
//!     .with_transition("Rainy", "Rainy", 0.7)
//!     .with_transition("Rainy", "Sunny", 0.3)
//!     .with_transition("Sunny", "Rainy", 0.4)
//!     .with_transition("Sunny", "Sunny", 0.6)
//!     .with_emission("Rainy", "walk", 0.1)
//!     .with_emission("Rainy", "shop", 0.4)
//!     .with_emission("Rainy", "clean", 0.5)
//!     .with_emission("Sunny", "walk", 0.6)
//!     .with_emission("Sunny", "shop", 0.3)
//!     .with_emission("Sunny", "clean", 0.1)
//!     .build();
//!
//! let mut machine = Viterbi::new(&hmm, vec!["walk", "shop", "clean"]).unwrap();
//! assert_eq!(machine.calculate().unwrap(), vec!["Sunny", "Rainy", "Rainy"]);
//! ```

pub mod error;
pub mod utils;
pub mod viterbi_solver;

pub use error::{Result, ViterbiError};
pub use viterbi_solver::hmm::{HMMBuilder, ModelDescription, Symbol, HMM};
pub use viterbi_solver::viterbi::Viterbi;
pub use viterbi_solver::Solver;
