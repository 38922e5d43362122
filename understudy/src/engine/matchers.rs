// SPDX-License-Identifier: GPL-3.0-or-later

//! Parameter matchers of stub bindings and verifications.
//!
//! A `Matcher` decides whether an actual argument list is accepted. It is
//! either the wildcard, which accepts any list, or a list of per-argument
//! matchers, which accepts argument lists of the same length where every
//! argument is accepted by its matcher.

use crate::value::Value;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Matcher {
    /// Accepts any argument list.
    Any,
    /// Accepts argument lists matching position by position.
    Args(Vec<ArgMatcher>),
}

#[derive(Clone)]
pub enum ArgMatcher {
    Equal(Value),
    Anything,
    Predicate(Rc<dyn Fn(&Value) -> bool>),
}

impl Matcher {
    pub fn matches(&self, args: &[Value]) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Args(matchers) => {
                matchers.len() == args.len()
                    && matchers.iter().zip(args).all(|(matcher, arg)| matcher.matches(arg))
            }
        }
    }
}

impl ArgMatcher {
    pub fn matches(&self, arg: &Value) -> bool {
        match self {
            ArgMatcher::Equal(expected) => expected == arg,
            ArgMatcher::Anything => true,
            ArgMatcher::Predicate(predicate) => predicate(arg),
        }
    }
}

/// A matcher accepting any argument list.
pub fn any_parameters() -> Matcher {
    Matcher::Any
}

/// A matcher accepting only the empty argument list.
pub fn no_args() -> Matcher {
    Matcher::Args(vec![])
}

/// A matcher accepting exactly these values.
pub fn with_args<I, V>(values: I) -> Matcher
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Matcher::Args(values.into_iter().map(|value| ArgMatcher::Equal(value.into())).collect())
}

/// A matcher built from per-argument matchers.
pub fn args(matchers: Vec<ArgMatcher>) -> Matcher {
    Matcher::Args(matchers)
}

pub fn equal_to(value: impl Into<Value>) -> ArgMatcher {
    ArgMatcher::Equal(value.into())
}

pub fn anything() -> ArgMatcher {
    ArgMatcher::Anything
}

pub fn predicate<F>(predicate: F) -> ArgMatcher
where
    F: Fn(&Value) -> bool + 'static,
{
    ArgMatcher::Predicate(Rc::new(predicate))
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any => write!(f, "(..)"),
            Matcher::Args(matchers) => {
                write!(f, "(")?;
                for (idx, matcher) in matchers.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{matcher}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgMatcher::Equal(value) => write!(f, "{value}"),
            ArgMatcher::Anything => write!(f, "_"),
            ArgMatcher::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}
