use ndarray::Array2;
use tracing::{debug, trace};

use super::hmm::{Symbol, HMM};
use super::utils::strict_argmax;
use super::Solver;
use crate::error::{Result, ViterbiError};

/// A decoding session binding one model to one observation sequence.
///
/// Step 0 is computed at construction. Each call to [`Viterbi::advance`]
/// computes one more step; once every step is computed, [`Viterbi::finish`]
/// walks the backpointers and returns the most likely state path.
pub struct Viterbi<'a, S, O> {
    hmm: &'a HMM<S, O>,
    sequence: Vec<O>,
    // dense copy of the transition table, [state_from, state_to]
    transitions: Array2<f64>,
    // [state, t]
    viterbi_array: Array2<f64>,
    viterbi_bt: Array2<Option<usize>>,
    cursor: usize,
}

impl<'a, S: Symbol, O: Symbol> Viterbi<'a, S, O> {

    /// Validates `hmm` against `sequence` and initializes step 0.
    pub fn new<I>(hmm: &'a HMM<S, O>, sequence: I) -> Result<Self, S>
    where
        I: IntoIterator<Item = O>,
    {
        let sequence: Vec<O> = sequence.into_iter().collect();
        if let Err(error) = hmm.check(&sequence) {
            debug!(%error, "model rejected");
            return Err(error);
        }

        let nstates = hmm.nstates();
        let transitions = Array2::from_shape_fn((nstates, nstates), |(from, to)| {
            hmm.transition_prob(hmm.state_at(from), hmm.state_at(to))
        });
        let mut viterbi_array: Array2<f64> = Array2::zeros((nstates, sequence.len()));
        let viterbi_bt: Array2<Option<usize>> = Array2::from_elem((nstates, sequence.len()), None);

        for (idx, state) in hmm.states().iter().enumerate() {
            viterbi_array[[idx, 0]] = hmm.init_prob(state) * hmm.emit_prob(state, &sequence[0]);
        }

        debug!(states = nstates, steps = sequence.len(), "viterbi machine initialized");
        Ok(Self { hmm, sequence, transitions, viterbi_array, viterbi_bt, cursor: 1 })
    }

    /// Index of the next step to compute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == self.sequence.len()
    }

    /// Best probability of reaching `state` at step `t`, if that step is computed.
    pub fn probability(&self, state: &S, t: usize) -> Option<f64> {
        if t >= self.cursor {
            return None;
        }
        self.hmm.index_of(state).map(|idx| self.viterbi_array[[idx, t]])
    }

    /// Predecessor recorded for `state` at step `t`.
    ///
    /// Always `None` at step 0, and `None` when every incoming path had
    /// probability zero.
    pub fn predecessor(&self, state: &S, t: usize) -> Option<&S> {
        if t >= self.cursor {
            return None;
        }
        let idx = self.hmm.index_of(state)?;
        self.viterbi_bt[[idx, t]].map(|prev| self.hmm.state_at(prev))
    }

    /// Computes the next step of the trellis.
    pub fn advance(&mut self) -> Result<(), S> {
        if self.is_complete() {
            return Err(ViterbiError::AlreadyComplete);
        }
        let t = self.cursor;
        let obs = &self.sequence[t];

        for state_to in 0..self.hmm.nstates() {
            let previous = self.viterbi_array.column(t - 1);
            let incoming = self.transitions.column(state_to);
            let candidates = previous.iter().zip(incoming.iter()).map(|(p, a)| p * a).enumerate();
            let (state_from, best) = strict_argmax(candidates, 0.0, None);

            let emit_prob = self.hmm.emit_prob(self.hmm.state_at(state_to), obs);
            self.viterbi_array[[state_to, t]] = best * emit_prob;
            self.viterbi_bt[[state_to, t]] = state_from;
        }

        self.cursor += 1;
        trace!(step = t, "trellis step computed");
        Ok(())
    }

    // Best state of column t, first state wins ties.
    fn best_at(&self, t: usize) -> (usize, f64) {
        let column = self.viterbi_array.column(t);
        let candidates = column.iter().copied().enumerate().skip(1);
        let (state, prob) = strict_argmax(candidates, column[0], Some(0));
        (state.unwrap_or(0), prob)
    }

    fn check_complete(&self) -> Result<(), S> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ViterbiError::Incomplete { computed: self.cursor, total: self.sequence.len() })
        }
    }

    /// Probability of the decoded path.
    pub fn path_probability(&self) -> Result<f64, S> {
        self.check_complete()?;
        Ok(self.best_at(self.sequence.len() - 1).1)
    }

    /// Reconstructs the most likely state path. Only reads the tables, so it
    /// can be called any number of times once the machine is complete.
    pub fn finish(&self) -> Result<Vec<S>, S> {
        self.check_complete()?;
        let last = self.sequence.len() - 1;
        let (mut end_state, prob) = self.best_at(last);

        let mut predicted = vec![end_state; self.sequence.len()];
        for t in (0..last).rev() {
            end_state = match self.viterbi_bt[[end_state, t + 1]] {
                Some(prev) => prev,
                // nothing reached step t + 1, resume from the best state at t
                None => self.best_at(t).0,
            };
            predicted[t] = end_state;
        }

        debug!(probability = prob, steps = predicted.len(), "backtrace done");
        Ok(predicted.into_iter().map(|idx| self.hmm.state_at(idx).clone()).collect())
    }

    /// Advances until every step is computed, then backtraces.
    pub fn calculate(&mut self) -> Result<Vec<S>, S> {
        while !self.is_complete() {
            self.advance()?;
        }
        self.finish()
    }
}

impl<'a, S: Symbol, O: Symbol> Solver<S> for Viterbi<'a, S, O> {

    fn solve(&mut self) -> Result<Vec<S>, S> {
        self.calculate()
    }

    fn get_objective(&self) -> Option<f64> {
        self.path_probability().ok()
    }

    fn get_name(&self) -> String {
        String::from("viterbi")
    }
}
