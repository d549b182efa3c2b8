//! Test Catalog
//!
//! Four ways of summing the even numbers of a [`NumberSet`]. Each executable
//! checks its sum against the answer computed by [`setup`] and fails with
//! [`CaseError::WrongAnswer`] on a mismatch.

pub mod lazy;

use crate::error::{CaseError, SetupError};
use crate::suite::{Executable, TestCase};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Input sizes exercised by the default driver, one suite each
pub const DEFAULT_SIZES: [u64; 6] = [10, 100, 1_000, 10_000, 100_000, 1_000_000];

/// Input size used when no options are given
pub const DEFAULT_N: u64 = 1_000;

/// Options passed to [`setup`]; printed in the start banner as `{"N":..}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupOptions {
    /// Input size: the set holds `0..N`
    #[serde(rename = "N")]
    pub n: u64,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self { n: DEFAULT_N }
    }
}

/// Ordered set of numbers with a built-in visitor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberSet {
    items: BTreeSet<u64>,
}

impl NumberSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`; returns `false` if it was already present
    pub fn insert(&mut self, value: u64) -> bool {
        self.items.insert(value)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in ascending order
    pub fn iter(&self) -> std::iter::Copied<std::collections::btree_set::Iter<'_, u64>> {
        self.items.iter().copied()
    }

    /// Call `f` on every element in ascending order
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(u64),
    {
        for &value in &self.items {
            f(value);
        }
    }
}

impl<'a> IntoIterator for &'a NumberSet {
    type Item = u64;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, u64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<u64> for NumberSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Shared, read-only input for every executable of one suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupResult {
    /// The numbers `0..N`
    pub input: NumberSet,
    /// Sum of the even numbers in `input`
    pub answer: u64,
}

/// Sum of the even integers in `[0, n)`, or `None` if it overflows `u64`.
///
/// There are `k = ceil(n / 2)` such integers and they sum to `k * (k - 1)`.
pub fn expected_answer(n: u64) -> Option<u64> {
    let evens = n.div_ceil(2);
    evens.checked_mul(evens.saturating_sub(1))
}

/// Build the input set and its answer for `options`
pub fn setup(options: &SetupOptions) -> Result<SetupResult, SetupError> {
    let n = options.n;
    if expected_answer(n).is_none() {
        return Err(SetupError::InvalidOption {
            name: "N",
            reason: format!("sum of even numbers below {n} does not fit in u64"),
        });
    }

    let mut input = NumberSet::new();
    let mut answer = 0u64;
    for i in 0..n {
        input.insert(i);
        if i % 2 == 0 {
            answer += i;
        }
    }

    tracing::debug!(n, answer, "setup complete");
    Ok(SetupResult { input, answer })
}

/// The four strategies, in display order
pub fn catalog() -> Vec<TestCase<SetupResult>> {
    vec![
        TestCase::new("iterable", iterable),
        TestCase::new("forEach", for_each),
        TestCase::new("Convenient lazy iterator", convenient_lazy),
        TestCase::new("Straight lazy iterator", straight_lazy),
    ]
}

fn check(actual: u64, expected: u64) -> Result<(), CaseError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CaseError::WrongAnswer { expected, actual })
    }
}

/// Materialize into a `Vec`, then filter and visit
fn iterable(setup: Arc<SetupResult>) -> Executable {
    Box::new(move || {
        let mut sum = 0;
        setup
            .input
            .iter()
            .collect_vec()
            .into_iter()
            .filter(|i| i % 2 == 0)
            .for_each(|i| sum += i);
        check(sum, setup.answer)
    })
}

/// The set's own visitor
fn for_each(setup: Arc<SetupResult>) -> Executable {
    Box::new(move || {
        let mut sum = 0;
        setup.input.for_each(|i| {
            if i % 2 == 0 {
                sum += i;
            }
        });
        check(sum, setup.answer)
    })
}

/// Boxed lazy chain: `iter(..).filter(..).each(..)`
fn convenient_lazy(setup: Arc<SetupResult>) -> Executable {
    Box::new(move || {
        let mut sum = 0;
        lazy::iter(&setup.input)
            .filter(|i| i % 2 == 0)
            .each(|i| sum += i);
        check(sum, setup.answer)
    })
}

/// Protocol adapter with the standalone helpers
fn straight_lazy(setup: Arc<SetupResult>) -> Executable {
    Box::new(move || {
        let mut sum = 0;
        let cursor = lazy::Adapter::new(&setup.input);
        lazy::each(lazy::filter(cursor, |i| i % 2 == 0), |i| sum += i);
        check(sum, setup.answer)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_all(setup_result: SetupResult) -> Vec<(String, Result<(), CaseError>)> {
        let shared = Arc::new(setup_result);
        catalog()
            .iter()
            .map(|case| {
                let mut exec = case.bind(&shared);
                (case.name().to_string(), exec())
            })
            .collect()
    }

    #[test]
    fn test_catalog_names_in_order() {
        let names: Vec<_> = catalog().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "iterable",
                "forEach",
                "Convenient lazy iterator",
                "Straight lazy iterator"
            ]
        );
    }

    #[test]
    fn test_default_options() {
        assert_eq!(SetupOptions::default().n, 1_000);
        assert_eq!(
            serde_json::to_string(&SetupOptions { n: 10 }).unwrap(),
            r#"{"N":10}"#
        );
    }

    #[test]
    fn test_setup_n_10() {
        let result = setup(&SetupOptions { n: 10 }).unwrap();
        assert_eq!(result.answer, 20);
        assert_eq!(result.input.len(), 10);

        for (name, outcome) in run_all(result) {
            assert_eq!(outcome, Ok(()), "{name} should sum to 20");
        }
    }

    #[test]
    fn test_setup_n_4() {
        let result = setup(&SetupOptions { n: 4 }).unwrap();
        assert_eq!(result.input.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(result.answer, 2);
    }

    #[test]
    fn test_setup_n_0() {
        let result = setup(&SetupOptions { n: 0 }).unwrap();
        assert!(result.input.is_empty());
        assert_eq!(result.answer, 0);

        for (name, outcome) in run_all(result) {
            assert_eq!(outcome, Ok(()), "{name} should agree on empty input");
        }
    }

    #[test]
    fn test_setup_is_deterministic() {
        let options = SetupOptions { n: 1_234 };
        assert_eq!(setup(&options).unwrap(), setup(&options).unwrap());
    }

    #[test]
    fn test_expected_answer_closed_form() {
        assert_eq!(expected_answer(0), Some(0));
        assert_eq!(expected_answer(1), Some(0));
        assert_eq!(expected_answer(4), Some(2));
        assert_eq!(expected_answer(10), Some(20));
        assert_eq!(expected_answer(11), Some(30));
        for n in 0..200 {
            let brute: u64 = (0..n).filter(|i| i % 2 == 0).sum();
            assert_eq!(expected_answer(n), Some(brute));
        }
    }

    #[test]
    fn test_setup_rejects_overflowing_size() {
        let err = setup(&SetupOptions { n: u64::MAX }).unwrap_err();
        assert!(matches!(err, SetupError::InvalidOption { name: "N", .. }));
    }

    #[test]
    fn test_all_strategies_agree_across_default_sizes() {
        for n in DEFAULT_SIZES {
            let result = setup(&SetupOptions { n }).unwrap();
            assert_eq!(Some(result.answer), expected_answer(n));
            for (name, outcome) in run_all(result) {
                assert_eq!(outcome, Ok(()), "{name} disagrees at N = {n}");
            }
        }
    }

    #[test]
    fn test_wrong_answer_detected_by_every_strategy() {
        let mut result = setup(&SetupOptions { n: 10 }).unwrap();
        result.answer = 21;

        for (name, outcome) in run_all(result) {
            assert_eq!(
                outcome,
                Err(CaseError::WrongAnswer {
                    expected: 21,
                    actual: 20
                }),
                "{name} should report the mismatch"
            );
        }
    }

    #[test]
    fn test_number_set_visitor_order() {
        let set: NumberSet = [5, 1, 3, 1].into_iter().collect();
        let mut seen = Vec::new();
        set.for_each(|v| seen.push(v));
        assert_eq!(seen, vec![1, 3, 5]);
        assert_eq!(set.len(), 3);
    }
}
