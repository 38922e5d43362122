// SPDX-License-Identifier: GPL-3.0-or-later

use super::interceptor::{self, Caller};
use super::stub::StubTable;
use super::target::{FunctionTable, TargetType};
use super::verify::{Invocation, Journal};
use super::{CallError, Mode};
use crate::config;
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A test double of a target type.
///
/// Cloning gives another handle to the same double: bindings added through
/// one handle are seen through every other.
#[derive(Clone)]
pub struct Double {
    inner: Rc<Inner>,
}

struct Inner {
    target: Rc<TargetType>,
    mode: Mode,
    functions: Rc<FunctionTable>,
    unstubbed: config::Unstubbed,
    stubs: RefCell<StubTable>,
    journal: RefCell<Journal>,
}

impl Double {
    pub(crate) fn new(
        target: Rc<TargetType>,
        mode: Mode,
        functions: Rc<FunctionTable>,
        config: &config::Main,
    ) -> Self {
        let inner = Inner {
            target,
            mode,
            functions,
            unstubbed: config.doubles.unstubbed,
            stubs: RefCell::new(StubTable::default()),
            journal: RefCell::new(Journal::new(&config.recording)),
        };
        Self { inner: Rc::new(inner) }
    }

    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    pub fn target(&self) -> &TargetType {
        &self.inner.target
    }

    pub fn type_name(&self) -> &str {
        self.inner.target.name()
    }

    /// Calls a method the way code outside the type does: only public
    /// methods are reachable.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        interceptor::dispatch(self, method, args, Caller::External)
    }

    /// Whether any binding was added for the method.
    pub fn is_configured(&self, method: &str) -> bool {
        self.inner.stubs.borrow().is_configured(method)
    }

    /// The recorded calls, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.journal.borrow().iter().cloned().collect()
    }

    /// Whether both handles refer to the same double.
    pub fn same_as(&self, other: &Double) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn functions(&self) -> &FunctionTable {
        &self.inner.functions
    }

    pub(crate) fn unstubbed(&self) -> config::Unstubbed {
        self.inner.unstubbed
    }

    pub(crate) fn stubs(&self) -> &RefCell<StubTable> {
        &self.inner.stubs
    }

    pub(crate) fn journal(&self) -> &RefCell<Journal> {
        &self.inner.journal
    }
}

impl fmt::Display for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} double of {}>", self.mode(), self.type_name())
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Double")
            .field("type_name", &self.type_name())
            .field("mode", &self.mode())
            .field("stubs", &self.inner.stubs.borrow())
            .finish_non_exhaustive()
    }
}

/// A view of a double through which every method is callable.
///
/// Resolution is the same as through the double itself, only the
/// visibility check is skipped.
pub struct Exposed<'a> {
    double: &'a Double,
    caller: Caller,
}

impl<'a> Exposed<'a> {
    pub(crate) fn internal(double: &'a Double) -> Self {
        Self { double, caller: Caller::Internal }
    }

    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        interceptor::dispatch(self.double, method, args, self.caller)
    }

    /// The double behind the view.
    pub fn double(&self) -> &'a Double {
        self.double
    }
}

/// Breaks the encapsulation of the double: the caller takes responsibility
/// for calling non-public methods.
pub fn expose(double: &Double) -> Exposed<'_> {
    Exposed { double, caller: Caller::Exposed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::target::Method;
    use crate::engine::{any_parameters, reset, when};

    fn node(mode: Mode) -> Double {
        let target = TargetType::new("Node").method(Method::public("next", 0, |_, _| Ok(Value::Null)));
        Double::new(Rc::new(target), mode, Rc::new(FunctionTable::default()), &config::Main::default())
    }

    #[test]
    fn test_clones_share_one_double() {
        let sut = node(Mode::Full);
        let other = sut.clone();

        assert!(sut.same_as(&other));
        assert!(!sut.same_as(&node(Mode::Full)));
        assert_eq!(sut.to_string(), "<full double of Node>");
    }

    #[test]
    fn test_reset_releases_binding_on_itself() {
        let sut = node(Mode::Partial);
        when(&sut, "next", any_parameters()).unwrap().then_return(&sut);
        assert_eq!(Rc::strong_count(&sut.inner), 2);

        match sut.call("next", &[]) {
            Ok(Value::Double(next)) => assert!(next.same_as(&sut)),
            other => panic!("Expected the double itself, got: {other:?}"),
        }

        reset(&sut);
        assert_eq!(Rc::strong_count(&sut.inner), 1);
    }
}
