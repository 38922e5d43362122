// SPDX-License-Identifier: GPL-3.0-or-later

//! This module provides the test double engine.
//!
//! The main abstractions are:
//! - `Registry`: knows the target types and creates doubles of them, in
//!   full or partial mode.
//! - `Stubber`: records the behaviour of a method for matching arguments,
//!   obtained from `when`.
//! - `Double`: the double itself. Every call goes through the interceptor,
//!   which answers from a matching binding, delegates to the real
//!   implementation, or answers the default empty value.
//! - `Exposed`: a view of a double through which non-public methods can be
//!   called from outside the type, obtained from `expose`.
//! - `Verifier`: checks the recorded calls of a double, obtained from `verify`.

mod double;
mod interceptor;
pub mod matchers;
mod registry;
mod stub;
mod target;
mod verify;

use std::fmt;
use thiserror::Error;

pub use double::{expose, Double, Exposed};
pub use matchers::{any_parameters, anything, args, equal_to, no_args, predicate, with_args, ArgMatcher, Matcher};
pub use registry::{Registry, RegistryError};
pub use stub::{reset, when, Answer, StubError, Stubber};
pub use target::{Body, Function, FunctionTable, Method, Scope, TargetType, Visibility};
pub use verify::{check_expectations, verify, verify_no_interactions, Invocation, Times, VerificationError, Verifier};

/// How a double answers calls which no binding matches.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Unstubbed calls answer the default empty value.
    Full,
    /// Unstubbed calls run the real implementation.
    Partial,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => write!(f, "full"),
            Mode::Partial => write!(f, "partial"),
        }
    }
}

/// An error raised explicitly by a real implementation or by a binding.
///
/// The engine passes it through unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct DomainError {
    message: String,
}

impl DomainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for DomainError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for DomainError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallableKind {
    Function,
    Method,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallableKind::Function => write!(f, "function"),
            CallableKind::Method => write!(f, "method"),
        }
    }
}

/// Errors of a call on a double.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CallError {
    #[error("Call to undefined {kind} {name}()")]
    UndefinedCallable { kind: CallableKind, name: String },
    #[error("Call to {visibility} method {type_name}::{method}() from outside the type")]
    NotVisible { type_name: String, method: String, visibility: Visibility },
    #[error("{type_name}::{method}() expects {expected} argument(s), {found} given")]
    ArgumentCount { type_name: String, method: String, expected: usize, found: usize },
    #[error("Unstubbed call to {type_name}::{method}() on a strict full double")]
    Unstubbed { type_name: String, method: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CallError {
    pub(crate) fn undefined_function(name: &str) -> Self {
        CallError::UndefinedCallable { kind: CallableKind::Function, name: name.to_string() }
    }

    pub(crate) fn undefined_method(type_name: &str, method: &str) -> Self {
        CallError::UndefinedCallable { kind: CallableKind::Method, name: format!("{type_name}::{method}") }
    }
}
