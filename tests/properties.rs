use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use viterbi_machine::{Viterbi, HMM};

// Random model with every row drawn uniformly and normalized.
fn random_hmm(nstates: usize, nobs: usize, seed: u64) -> HMM<usize, usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = HMM::builder();

    let pi: Vec<f64> = (0..nstates).map(|_| rng.gen::<f64>() + 1e-3).collect();
    let s: f64 = pi.iter().sum();
    for (state, p) in pi.into_iter().enumerate() {
        builder = builder.with_initial(state, p / s);
    }

    for from in 0..nstates {
        let row: Vec<f64> = (0..nstates).map(|_| rng.gen::<f64>() + 1e-3).collect();
        let s: f64 = row.iter().sum();
        for (to, p) in row.into_iter().enumerate() {
            builder = builder.with_transition(from, to, p / s);
        }
        let row: Vec<f64> = (0..nobs).map(|_| rng.gen::<f64>() + 1e-3).collect();
        let s: f64 = row.iter().sum();
        for (obs, p) in row.into_iter().enumerate() {
            builder = builder.with_emission(from, obs, p / s);
        }
    }
    builder.build()
}

fn path_prob(hmm: &HMM<usize, usize>, path: &[usize], sequence: &[usize]) -> f64 {
    let mut p = hmm.init_prob(&path[0]) * hmm.emit_prob(&path[0], &sequence[0]);
    for t in 1..path.len() {
        p *= hmm.transition_prob(&path[t - 1], &path[t]) * hmm.emit_prob(&path[t], &sequence[t]);
    }
    p
}

fn exhaustive_best(hmm: &HMM<usize, usize>, sequence: &[usize]) -> f64 {
    let nstates = hmm.nstates();
    let total = nstates.pow(sequence.len() as u32);
    let mut best = 0.0f64;
    let mut path = vec![0; sequence.len()];
    for code in 0..total {
        let mut c = code;
        for slot in path.iter_mut() {
            *slot = c % nstates;
            c /= nstates;
        }
        best = best.max(path_prob(hmm, &path, sequence));
    }
    best
}

fn model_and_sequence() -> impl Strategy<Value = (usize, usize, u64, Vec<usize>)> {
    (1usize..=3, 1usize..=3, any::<u64>()).prop_flat_map(|(nstates, nobs, seed)| {
        (Just(nstates), Just(nobs), Just(seed), proptest::collection::vec(0..nobs, 1..=5))
    })
}

proptest! {
    #[test]
    fn path_length_matches_sequence((nstates, nobs, seed, sequence) in model_and_sequence()) {
        let hmm = random_hmm(nstates, nobs, seed);
        let path = Viterbi::new(&hmm, sequence.clone()).unwrap().calculate().unwrap();
        prop_assert_eq!(path.len(), sequence.len());
        prop_assert!(path.iter().all(|s| *s < nstates));
    }

    #[test]
    fn decoding_is_deterministic((nstates, nobs, seed, sequence) in model_and_sequence()) {
        let hmm = random_hmm(nstates, nobs, seed);
        let first = Viterbi::new(&hmm, sequence.clone()).unwrap().calculate().unwrap();
        let again = random_hmm(nstates, nobs, seed);
        let second = Viterbi::new(&again, sequence).unwrap().calculate().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decoded_path_is_optimal((nstates, nobs, seed, sequence) in model_and_sequence()) {
        let hmm = random_hmm(nstates, nobs, seed);
        let mut machine = Viterbi::new(&hmm, sequence.clone()).unwrap();
        let path = machine.calculate().unwrap();
        let best = exhaustive_best(&hmm, &sequence);
        let found = path_prob(&hmm, &path, &sequence);
        prop_assert!((found - best).abs() <= 1e-9 * best, "found {} best {}", found, best);
        prop_assert!((machine.path_probability().unwrap() - best).abs() <= 1e-9 * best);
    }
}
