// SPDX-License-Identifier: GPL-3.0-or-later

//! Recording of calls and their verification.

use super::double::Double;
use super::matchers::Matcher;
use crate::config;
use crate::value::Value;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// One observed call on a double.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    /// Position of the call among all calls on the double.
    pub index: usize,
    pub method: String,
    pub args: Vec<Value>,
}

/// The recorded calls of one double.
///
/// When the capacity is reached, the oldest records are discarded.
#[derive(Debug)]
pub(crate) struct Journal {
    enabled: bool,
    capacity: Option<usize>,
    records: VecDeque<Invocation>,
    next_index: usize,
}

impl Journal {
    pub(crate) fn new(config: &config::Recording) -> Self {
        Self { enabled: config.enabled, capacity: config.capacity, records: VecDeque::new(), next_index: 0 }
    }

    pub(crate) fn record(&mut self, method: &str, args: &[Value]) {
        let index = self.next_index;
        self.next_index += 1;
        if !self.enabled {
            return;
        }
        match self.capacity {
            // nothing fits, only the index advances
            Some(0) => return,
            Some(capacity) => {
                while self.records.len() >= capacity {
                    self.records.pop_front();
                }
            }
            None => {}
        }
        self.records.push_back(Invocation { index, method: method.to_string(), args: args.to_vec() });
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Invocation> {
        self.records.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.next_index = 0;
    }
}

/// An expected number of calls.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Times {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
    Never,
}

impl Times {
    pub fn once() -> Self {
        Times::Exactly(1)
    }

    pub fn accepts(self, count: usize) -> bool {
        match self {
            Times::Exactly(expected) => count == expected,
            Times::AtLeast(expected) => count >= expected,
            Times::AtMost(expected) => count <= expected,
            Times::Never => count == 0,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Times::Exactly(count) => write!(f, "exactly {count} time(s)"),
            Times::AtLeast(count) => write!(f, "at least {count} time(s)"),
            Times::AtMost(count) => write!(f, "at most {count} time(s)"),
            Times::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("Expected {type_name}::{method}{matcher} to be called {expected}, but it was called {actual} time(s)")]
    CountMismatch { type_name: String, method: String, matcher: String, expected: Times, actual: usize },
    #[error("Expected no interactions with {type_name}, but {count} call(s) were recorded")]
    UnexpectedInteractions { type_name: String, count: usize },
    #[error("Multiple verification failures: {errors:?}")]
    Multiple { errors: Vec<VerificationError> },
}

/// Collects verification failures, reporting a single one as itself.
#[derive(Default)]
struct VerificationCollector {
    errors: Vec<VerificationError>,
}

impl VerificationCollector {
    fn add_result(&mut self, result: Result<(), VerificationError>) {
        if let Err(error) = result {
            match error {
                VerificationError::Multiple { errors } => self.errors.extend(errors),
                single_error => self.errors.push(single_error),
            }
        }
    }

    fn finish(mut self) -> Result<(), VerificationError> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(VerificationError::Multiple { errors: self.errors }),
        }
    }
}

/// Verification of one method, obtained from `verify`.
#[must_use = "the verification only happens in `times`"]
pub struct Verifier<'a> {
    double: &'a Double,
    method: String,
    matcher: Matcher,
}

impl Verifier<'_> {
    /// Checks how many recorded calls of the method the matcher accepts.
    ///
    /// Matching runs on a copy of the records, so a predicate may call the
    /// double itself. Those calls are not counted.
    pub fn times(self, expected: Times) -> Result<(), VerificationError> {
        let records: Vec<Invocation> = self
            .double
            .journal()
            .borrow()
            .iter()
            .filter(|record| record.method == self.method)
            .cloned()
            .collect();
        let actual = records.iter().filter(|record| self.matcher.matches(&record.args)).count();
        count_matches(self.double, &self.method, &self.matcher, expected, actual)
    }
}

pub fn verify<'a>(double: &'a Double, method: &str, matcher: Matcher) -> Verifier<'a> {
    Verifier { double, method: method.to_string(), matcher }
}

pub fn verify_no_interactions(double: &Double) -> Result<(), VerificationError> {
    let count = double.journal().borrow().len();
    if count == 0 {
        Ok(())
    } else {
        Err(VerificationError::UnexpectedInteractions { type_name: double.type_name().to_string(), count })
    }
}

/// Checks every binding which was configured with an expected call count.
pub fn check_expectations(double: &Double) -> Result<(), VerificationError> {
    let mut collector = VerificationCollector::default();
    for binding in double.stubs().borrow().bindings() {
        if let Some(expected) = binding.expectation() {
            collector.add_result(count_matches(
                double,
                binding.method(),
                binding.matcher(),
                expected,
                binding.answered(),
            ));
        }
    }
    collector.finish()
}

fn count_matches(
    double: &Double,
    method: &str,
    matcher: &Matcher,
    expected: Times,
    actual: usize,
) -> Result<(), VerificationError> {
    if expected.accepts(actual) {
        Ok(())
    } else {
        Err(VerificationError::CountMismatch {
            type_name: double.type_name().to_string(),
            method: method.to_string(),
            matcher: matcher.to_string(),
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_accepts() {
        assert!(Times::once().accepts(1));
        assert!(!Times::once().accepts(2));
        assert!(Times::AtLeast(2).accepts(5));
        assert!(!Times::AtLeast(2).accepts(1));
        assert!(Times::AtMost(2).accepts(0));
        assert!(!Times::AtMost(2).accepts(3));
        assert!(Times::Never.accepts(0));
        assert!(!Times::Never.accepts(1));
    }

    #[test]
    fn test_journal_keeps_order() {
        let mut sut = Journal::new(&config::Recording { enabled: true, capacity: None });
        sut.record("a", &[]);
        sut.record("b", &[Value::from(true)]);

        let records: Vec<_> = sut.iter().map(|record| (record.index, record.method.as_str())).collect();
        assert_eq!(records, vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn test_journal_discards_oldest_over_capacity() {
        let mut sut = Journal::new(&config::Recording { enabled: true, capacity: Some(2) });
        sut.record("a", &[]);
        sut.record("b", &[]);
        sut.record("c", &[]);

        let records: Vec<_> = sut.iter().map(|record| (record.index, record.method.as_str())).collect();
        assert_eq!(records, vec![(1, "b"), (2, "c")]);
    }

    #[test]
    fn test_journal_zero_capacity_keeps_nothing() {
        let mut sut = Journal::new(&config::Recording { enabled: true, capacity: Some(0) });
        sut.record("a", &[]);
        sut.record("b", &[]);

        assert_eq!(sut.len(), 0);
        assert_eq!(sut.next_index, 2);
    }

    #[test]
    fn test_journal_disabled_records_nothing() {
        let mut sut = Journal::new(&config::Recording { enabled: false, capacity: None });
        sut.record("a", &[]);

        assert_eq!(sut.len(), 0);
    }

    #[test]
    fn test_collector_single_and_multiple() {
        let failure = || VerificationError::UnexpectedInteractions { type_name: "Foo".to_string(), count: 1 };

        let mut sut = VerificationCollector::default();
        sut.add_result(Ok(()));
        assert_eq!(sut.finish(), Ok(()));

        let mut sut = VerificationCollector::default();
        sut.add_result(Err(failure()));
        assert_eq!(sut.finish(), Err(failure()));

        let mut sut = VerificationCollector::default();
        sut.add_result(Err(failure()));
        sut.add_result(Err(VerificationError::Multiple { errors: vec![failure(), failure()] }));
        match sut.finish() {
            Err(VerificationError::Multiple { errors }) => assert_eq!(errors.len(), 3),
            other => panic!("Expected multiple verification errors, got: {other:?}"),
        }
    }
}
