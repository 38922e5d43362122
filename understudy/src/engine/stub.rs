// SPDX-License-Identifier: GPL-3.0-or-later

//! Stub bindings and the configurator which records them.
//!
//! Bindings are only ever appended. Resolution walks them from the most
//! recently added to the oldest, and the first one whose matcher accepts the
//! arguments answers the call. Re-stubbing therefore overrides without
//! touching what was recorded before.

use super::double::Double;
use super::matchers::Matcher;
use super::target::Method;
use super::verify::Times;
use super::{CallError, DomainError};
use crate::value::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// What a binding produces when it matches.
#[derive(Clone)]
pub enum Answer {
    Return(Value),
    Throw(DomainError),
    /// Computes the result from the actual arguments.
    Callback(Rc<dyn Fn(&[Value]) -> Result<Value, CallError>>),
    /// Runs the real implementation, also on full doubles.
    CallParent,
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Return(value) => f.debug_tuple("Return").field(value).finish(),
            Answer::Throw(error) => f.debug_tuple("Throw").field(error).finish(),
            Answer::Callback(_) => write!(f, "Callback"),
            Answer::CallParent => write!(f, "CallParent"),
        }
    }
}

/// One configured behaviour of a method.
#[derive(Debug)]
pub(crate) struct Binding {
    method: String,
    matcher: Matcher,
    answer: Answer,
    expectation: Option<Times>,
    answered: Cell<usize>,
}

impl Binding {
    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub(crate) fn expectation(&self) -> Option<Times> {
        self.expectation
    }

    /// How many calls this binding has answered.
    pub(crate) fn answered(&self) -> usize {
        self.answered.get()
    }

    fn accepts(&self, method: &str, args: &[Value]) -> bool {
        self.method == method && self.matcher.matches(args)
    }

    pub(crate) fn answer(&self, double: &Double, method: &Method, args: &[Value]) -> Result<Value, CallError> {
        self.answered.set(self.answered.get() + 1);
        match &self.answer {
            Answer::Return(value) => Ok(value.clone()),
            Answer::Throw(error) => Err(CallError::Domain(error.clone())),
            Answer::Callback(callback) => callback(args),
            Answer::CallParent => method.invoke(double, args),
        }
    }
}

/// The bindings of one double, in the order they were added.
#[derive(Debug, Default)]
pub(crate) struct StubTable {
    bindings: Vec<Rc<Binding>>,
}

impl StubTable {
    fn add(&mut self, binding: Binding) {
        self.bindings.push(Rc::new(binding));
    }

    /// The most recently added binding accepting the call.
    pub(crate) fn find(&self, method: &str, args: &[Value]) -> Option<Rc<Binding>> {
        self.bindings.iter().rev().find(|binding| binding.accepts(method, args)).cloned()
    }

    pub(crate) fn is_configured(&self, method: &str) -> bool {
        self.bindings.iter().any(|binding| binding.method == method)
    }

    pub(crate) fn bindings(&self) -> impl Iterator<Item = &Rc<Binding>> {
        self.bindings.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StubError {
    #[error("Cannot stub {type_name}::{method}(): no such method")]
    UnknownMethod { type_name: String, method: String },
}

/// Builder of one binding, obtained from `when`.
///
/// The binding is added when one of the `then_*` methods is called.
#[must_use = "the binding is only added by one of the then_* methods"]
pub struct Stubber<'a> {
    double: &'a Double,
    method: String,
    matcher: Matcher,
    expectation: Option<Times>,
}

impl Stubber<'_> {
    /// Expects the binding to answer a number of calls, see `check_expectations`.
    pub fn times(mut self, times: Times) -> Self {
        self.expectation = Some(times);
        self
    }

    /// Answers `value`. Returning the double being stubbed makes a reference
    /// cycle, which only `reset` breaks.
    pub fn then_return(self, value: impl Into<Value>) {
        self.bind(Answer::Return(value.into()));
    }

    pub fn then_throw(self, error: impl Into<DomainError>) {
        self.bind(Answer::Throw(error.into()));
    }

    /// Answers what `callback` computes from the arguments. The same cycle
    /// as with `then_return` forms if it captures the stubbed double.
    pub fn then_return_callback<F>(self, callback: F)
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + 'static,
    {
        self.bind(Answer::Callback(Rc::new(callback)));
    }

    pub fn then_call_parent(self) {
        self.bind(Answer::CallParent);
    }

    fn bind(self, answer: Answer) {
        log::debug!(
            "Stubbing {}::{}{} on {} double: {:?}",
            self.double.type_name(),
            self.method,
            self.matcher,
            self.double.mode(),
            answer
        );
        let binding = Binding {
            method: self.method,
            matcher: self.matcher,
            answer,
            expectation: self.expectation,
            answered: Cell::new(0),
        };
        self.double.stubs().borrow_mut().add(binding);
    }
}

/// Starts the configuration of `method` for the calls `matcher` accepts.
///
/// The declared visibility of the method does not matter here. It fails only
/// if the target type does not declare the method at all.
pub fn when<'a>(double: &'a Double, method: &str, matcher: Matcher) -> Result<Stubber<'a>, StubError> {
    if double.target().lookup(method).is_none() {
        return Err(StubError::UnknownMethod {
            type_name: double.type_name().to_string(),
            method: method.to_string(),
        });
    }
    Ok(Stubber { double, method: method.to_string(), matcher, expectation: None })
}

/// Drops every binding and every recorded call of the double. The mode stays.
pub fn reset(double: &Double) {
    log::debug!("Resetting {} double of {}", double.mode(), double.type_name());
    double.stubs().borrow_mut().clear();
    double.journal().borrow_mut().clear();
}
