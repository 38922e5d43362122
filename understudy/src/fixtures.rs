// SPDX-License-Identifier: GPL-3.0-or-later

//! The `Foo` and `Bar` fixture types the scenarios exercise.
//!
//! The branching methods share one shape: on `true` they call a function
//! which does not exist, on `false` they raise a domain error. Only a stub
//! can make them answer anything else.

use crate::config;
use crate::engine::{CallError, DomainError, Method, Registry, RegistryError, Scope, TargetType};
use crate::value::Value;

pub const FOO: &str = "Foo";
pub const BAR: &str = "Bar";

/// The function the branching methods call, never registered.
pub const UNDEFINED_FUNCTION: &str = "undefinedFunction";
/// The message of the domain error the branching methods raise.
pub const EXCEPTION_MESSAGE: &str = "throw exception!!";

/// A registry knowing both fixture types.
pub fn registry(config: config::Main) -> Result<Registry, RegistryError> {
    let mut registry = Registry::with_config(config);
    registry.register(foo())?;
    registry.register(bar())?;
    Ok(registry)
}

pub fn foo() -> TargetType {
    TargetType::new(FOO)
        .method(Method::public("functionA", 0, |_, _| Ok(Value::from("hoge"))))
        .method(Method::public("functionB", 0, |_, _| Ok(Value::from("fuga"))))
        .method(Method::public("functionC", 1, branching))
        .method(Method::public("functionD", 1, |scope, args| scope.this().call("functionC", args)))
        .method(Method::private("functionE", 1, branching))
        .method(Method::private("functionF", 1, branching))
        .method(Method::public("functionG", 2, |_, args| match args {
            [Value::Double(bar), flag] => bar.call("functionE", std::slice::from_ref(flag)),
            _ => Err(DomainError::new("functionG expects a Bar and a flag").into()),
        }))
        .method(Method::protected("functionH", 1, branching))
        .method(Method::public("functionI", 1, |scope, args| scope.this().call("functionH", args)))
}

pub fn bar() -> TargetType {
    TargetType::new(BAR).method(Method::public("functionE", 1, branching))
}

fn branching(scope: &Scope<'_>, args: &[Value]) -> Result<Value, CallError> {
    if args.first().is_some_and(Value::is_truthy) {
        scope.function(UNDEFINED_FUNCTION, &[])
    } else {
        Err(DomainError::new(EXCEPTION_MESSAGE).into())
    }
}
