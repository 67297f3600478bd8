use std::collections::HashMap;
use std::hash::Hash;

/// Absolute tolerance used when checking that a distribution sums to one.
pub const TOLERANCE: f64 = 1e-7;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// Sparse probability row. Absent keys read as 0.0; keys are kept in the order
/// they were first declared.
#[derive(Debug, Clone)]
pub struct SparseRow<K> {
    keys: Vec<K>,
    probs: HashMap<K, f64>,
}

impl<K: Clone + Eq + Hash> SparseRow<K> {

    pub fn new() -> Self {
        Self { keys: Vec::new(), probs: HashMap::new() }
    }

    /// Sets the probability of `key`. Redeclaring overwrites the value but
    /// keeps the first position.
    pub fn insert(&mut self, key: K, prob: f64) {
        match self.probs.get_mut(&key) {
            Some(p) => *p = prob,
            None => {
                self.keys.push(key.clone());
                self.probs.insert(key, prob);
            }
        }
    }

    pub fn prob(&self, key: &K) -> f64 {
        self.probs.get(key).copied().unwrap_or(0.0)
    }

    /// Sum of the declared entries, accumulated in declaration order.
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.keys.iter().map(move |k| (k, self.probs[k]))
    }
}

impl<K: Clone + Eq + Hash> Default for SparseRow<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse `(row, column) -> probability` table made of [`SparseRow`]s, rows
/// kept in declaration order.
#[derive(Debug, Clone)]
pub struct SparseTable<R, C> {
    order: Vec<R>,
    rows: HashMap<R, SparseRow<C>>,
}

impl<R: Clone + Eq + Hash, C: Clone + Eq + Hash> SparseTable<R, C> {

    pub fn new() -> Self {
        Self { order: Vec::new(), rows: HashMap::new() }
    }

    pub fn insert(&mut self, row: R, col: C, prob: f64) {
        if !self.rows.contains_key(&row) {
            self.order.push(row.clone());
        }
        self.rows.entry(row).or_default().insert(col, prob);
    }

    pub fn prob(&self, row: &R, col: &C) -> f64 {
        self.rows.get(row).map(|r| r.prob(col)).unwrap_or(0.0)
    }

    /// Sum of a row. A row with no declared entries sums to 0.0.
    pub fn row_sum(&self, row: &R) -> f64 {
        self.rows.get(row).map(SparseRow::sum).unwrap_or(0.0)
    }

    /// Number of declared entries over all rows.
    pub fn len(&self) -> usize {
        self.rows.values().map(SparseRow::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R, &C, f64)> + '_ {
        self.order.iter().flat_map(move |r| self.rows[r].iter().map(move |(c, p)| (r, c, p)))
    }
}

impl<R: Clone + Eq + Hash, C: Clone + Eq + Hash> Default for SparseTable<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Running argmax over `(index, value)` candidates.
///
/// Starts from `(best, arg)` and only lets a candidate replace the current best
/// when it is strictly greater, so ties keep the earliest index and a floor of
/// 0.0 with no argument never selects a zero candidate.
pub fn strict_argmax<I>(candidates: I, mut best: f64, mut arg: Option<usize>) -> (Option<usize>, f64)
where
    I: IntoIterator<Item = (usize, f64)>,
{
    for (idx, value) in candidates {
        if value > best {
            best = value;
            arg = Some(idx);
        }
    }
    (arg, best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_is_absolute() {
        assert!(approx_eq(0.3333333 + 0.3333333 + 0.3333334, 1.0));
        assert!(approx_eq(0.1 + 0.2 + 0.7, 1.0));
        assert!(!approx_eq(1.1, 1.0));
        assert!(!approx_eq(1.0 + 2e-7, 1.0));
        assert!(!approx_eq(f64::NAN, 1.0));
    }

    #[test]
    fn missing_entries_default_to_zero() {
        let mut table = SparseTable::new();
        table.insert("a", "x", 0.25);
        assert_eq!(table.prob(&"a", &"x"), 0.25);
        assert_eq!(table.prob(&"a", &"y"), 0.0);
        assert_eq!(table.prob(&"b", &"x"), 0.0);
    }

    #[test]
    fn row_sum_of_missing_row_is_zero() {
        let mut table = SparseTable::new();
        table.insert(0u8, 1u8, 0.5);
        table.insert(0u8, 2u8, 0.5);
        assert_eq!(table.row_sum(&0), 1.0);
        assert_eq!(table.row_sum(&1), 0.0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn row_sum_follows_declaration_order() {
        let values = [1e16, 1.0, -1e16, 0.3, 1e-9, 0.7];
        let mut row = SparseRow::new();
        for (k, p) in values.iter().enumerate() {
            row.insert(k, *p);
        }
        let expected = values.iter().fold(-0.0, |acc, p| acc + p);
        for _ in 0..8 {
            assert_eq!(row.clone().sum().to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn redeclared_entry_keeps_position() {
        let mut table = SparseTable::new();
        table.insert('a', 'x', 0.1);
        table.insert('b', 'x', 1.0);
        table.insert('a', 'y', 0.9);
        table.insert('a', 'x', 0.2);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(&'a', &'x', 0.2), (&'a', &'y', 0.9), (&'b', &'x', 1.0)]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn strict_argmax_keeps_first_on_ties() {
        let (arg, best) = strict_argmax(vec![(0, 0.5), (1, 0.5), (2, 0.1)], 0.0, None);
        assert_eq!(arg, Some(0));
        assert_eq!(best, 0.5);
    }

    #[test]
    fn strict_argmax_zero_floor_selects_nothing() {
        let (arg, best) = strict_argmax(vec![(0, 0.0), (1, 0.0)], 0.0, None);
        assert_eq!(arg, None);
        assert_eq!(best, 0.0);
    }

    #[test]
    fn strict_argmax_seeded_with_first() {
        let (arg, best) = strict_argmax(vec![(1, 0.2), (2, 0.3)], 0.3, Some(0));
        assert_eq!(arg, Some(0));
        assert_eq!(best, 0.3);
    }
}
