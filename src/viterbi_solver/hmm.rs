use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::utils::{approx_eq, SparseTable};
use crate::error::{Result, ViterbiError};

/// Bounds every state and observation identity has to satisfy.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}

/// A frozen Hidden Markov Model over symbolic states `S` and observations `O`.
///
/// The state universe is the key set of the initial distribution, in the order
/// the states were first declared. That order is the tie-break precedence used
/// by the decoder. Transition and emission tables are sparse: undeclared
/// entries read as 0.0.
#[derive(Debug, Clone)]
pub struct HMM<S, O> {
    states: Vec<S>,
    state_index: HashMap<S, usize>,
    pi: Vec<f64>,
    a: SparseTable<S, S>,
    b: SparseTable<S, O>,
    observations: Vec<O>,
    known_observations: HashSet<O>,
}

impl<S: Symbol, O: Symbol> HMM<S, O> {

    pub fn builder() -> HMMBuilder<S, O> {
        HMMBuilder::new()
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn nstates(&self) -> usize {
        self.states.len()
    }

    /// Declared observation universe, in order of first appearance.
    pub fn observations(&self) -> &[O] {
        &self.observations
    }

    pub fn nobs(&self) -> usize {
        self.observations.len()
    }

    pub fn knows_observation(&self, obs: &O) -> bool {
        self.known_observations.contains(obs)
    }

    pub(crate) fn state_at(&self, idx: usize) -> &S {
        &self.states[idx]
    }

    pub(crate) fn index_of(&self, state: &S) -> Option<usize> {
        self.state_index.get(state).copied()
    }

    pub fn init_prob(&self, state: &S) -> f64 {
        self.index_of(state).map(|i| self.pi[i]).unwrap_or(0.0)
    }

    pub fn transition_prob(&self, state_from: &S, state_to: &S) -> f64 {
        self.a.prob(state_from, state_to)
    }

    pub fn emit_prob(&self, state: &S, obs: &O) -> f64 {
        self.b.prob(state, obs)
    }

    /// Number of declared transition entries, zero-valued ones included.
    pub fn transition_count(&self) -> usize {
        self.a.len()
    }

    pub fn emission_count(&self) -> usize {
        self.b.len()
    }

    /// Checks the model against an observation sequence before decoding.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    pub(crate) fn check(&self, sequence: &[O]) -> Result<(), S> {
        if self.states.is_empty() {
            return Err(ViterbiError::EmptyStateSpace);
        }
        if sequence.is_empty() {
            return Err(ViterbiError::EmptyObservationSequence);
        }

        let sum: f64 = self.pi.iter().sum();
        if !approx_eq(sum, 1.0) {
            return Err(ViterbiError::MalformedInitialDistribution { sum });
        }

        if self.transition_count() == 0 {
            return Err(ViterbiError::MissingTransitions);
        }
        for state in &self.states {
            let sum = self.a.row_sum(state);
            if !approx_eq(sum, 1.0) {
                return Err(ViterbiError::MalformedTransitionRow { state: state.clone(), sum });
            }
        }

        if self.emission_count() == 0 {
            return Err(ViterbiError::MissingEmissions);
        }
        for state in &self.states {
            let sum = self.b.row_sum(state);
            if !approx_eq(sum, 1.0) {
                return Err(ViterbiError::MalformedEmissionRow { state: state.clone(), sum });
            }
        }

        if let Some(position) = sequence.iter().position(|o| !self.knows_observation(o)) {
            return Err(ViterbiError::UnknownObservation { position });
        }
        Ok(())
    }

    /// Flattens the model into a serializable description. Entries come out in
    /// declaration order.
    pub fn describe(&self) -> ModelDescription<S, O> {
        let initial = self.states.iter().cloned().zip(self.pi.iter().copied()).collect();
        let transitions = self.a.iter().map(|(from, to, p)| (from.clone(), to.clone(), p)).collect();
        let emissions = self.b.iter().map(|(state, obs, p)| (state.clone(), obs.clone(), p)).collect();
        ModelDescription { initial, transitions, emissions, observations: self.observations.clone() }
    }
}

/// Accumulates initial, transition and emission entries before freezing them
/// into an [`HMM`]. Redeclaring an entry overwrites its probability.
#[derive(Debug, Clone)]
pub struct HMMBuilder<S, O> {
    states: Vec<S>,
    pi: HashMap<S, f64>,
    a: SparseTable<S, S>,
    b: SparseTable<S, O>,
    observations: Vec<O>,
}

impl<S: Symbol, O: Symbol> HMMBuilder<S, O> {

    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            pi: HashMap::new(),
            a: SparseTable::new(),
            b: SparseTable::new(),
            observations: Vec::new(),
        }
    }

    pub fn with_initial(mut self, state: S, prob: f64) -> Self {
        if !self.pi.contains_key(&state) {
            self.states.push(state.clone());
        }
        self.pi.insert(state, prob);
        self
    }

    pub fn with_initial_distribution<I>(self, distribution: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
    {
        distribution.into_iter().fold(self, |builder, (state, prob)| builder.with_initial(state, prob))
    }

    pub fn with_transition(mut self, state_from: S, state_to: S, prob: f64) -> Self {
        self.a.insert(state_from, state_to, prob);
        self
    }

    pub fn with_emission(mut self, state: S, obs: O, prob: f64) -> Self {
        self.observations.push(obs.clone());
        self.b.insert(state, obs, prob);
        self
    }

    /// Declares observation symbols the model can be asked to decode, whether
    /// or not any state emits them.
    pub fn with_observations<I>(mut self, observations: I) -> Self
    where
        I: IntoIterator<Item = O>,
    {
        self.observations.extend(observations);
        self
    }

    pub fn build(self) -> HMM<S, O> {
        let state_index: HashMap<S, usize> = self.states.iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let pi = self.states.iter().map(|s| self.pi[s]).collect();

        let mut known_observations = HashSet::new();
        let mut observations = Vec::new();
        for obs in self.observations {
            if known_observations.insert(obs.clone()) {
                observations.push(obs);
            }
        }

        HMM { states: self.states, state_index, pi, a: self.a, b: self.b, observations, known_observations }
    }
}

impl<S: Symbol, O: Symbol> Default for HMMBuilder<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat, serializable form of an [`HMM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>, O: Deserialize<'de>"))]
pub struct ModelDescription<S, O> {
    pub initial: Vec<(S, f64)>,
    #[serde(default)]
    pub transitions: Vec<(S, S, f64)>,
    #[serde(default)]
    pub emissions: Vec<(S, O, f64)>,
    #[serde(default)]
    pub observations: Vec<O>,
}

impl<S: Symbol, O: Symbol> From<ModelDescription<S, O>> for HMM<S, O> {
    fn from(desc: ModelDescription<S, O>) -> Self {
        let mut builder = HMMBuilder::new()
            .with_initial_distribution(desc.initial)
            .with_observations(desc.observations);
        for (from, to, p) in desc.transitions {
            builder = builder.with_transition(from, to, p);
        }
        for (state, obs, p) in desc.emissions {
            builder = builder.with_emission(state, obs, p);
        }
        builder.build()
    }
}
