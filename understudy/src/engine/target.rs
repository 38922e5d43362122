// SPDX-License-Identifier: GPL-3.0-or-later

//! Target types: the method tables doubles are created from.
//!
//! A target type lists its methods by name, each with a visibility, an
//! arity, a declared return kind and the real implementation. The real
//! implementation receives a `Scope`, which is the only way it can reach
//! back into the double it runs on, or into the free functions of the
//! registry the double was created by.

use super::double::{Double, Exposed};
use super::CallError;
use crate::value::{Value, ValueKind};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The real implementation of a method.
pub type Body = Rc<dyn Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError>>;

/// A free function real implementations may call by name.
pub type Function = Rc<dyn Fn(&[Value]) -> Result<Value, CallError>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        };
        write!(f, "{name}")
    }
}

/// One method of a target type.
#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub arity: usize,
    pub returns: ValueKind,
    body: Body,
}

impl Method {
    pub fn new<F>(name: &str, visibility: Visibility, arity: usize, body: F) -> Self
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError> + 'static,
    {
        Self { name: name.to_string(), visibility, arity, returns: ValueKind::Mixed, body: Rc::new(body) }
    }

    pub fn public<F>(name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError> + 'static,
    {
        Self::new(name, Visibility::Public, arity, body)
    }

    pub fn protected<F>(name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError> + 'static,
    {
        Self::new(name, Visibility::Protected, arity, body)
    }

    pub fn private<F>(name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError> + 'static,
    {
        Self::new(name, Visibility::Private, arity, body)
    }

    /// Declares the return kind, which selects the default empty value.
    pub fn returning(mut self, kind: ValueKind) -> Self {
        self.returns = kind;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Runs the real implementation with `double` as the receiver.
    pub(crate) fn invoke(&self, double: &Double, args: &[Value]) -> Result<Value, CallError> {
        (self.body)(&Scope { double }, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("arity", &self.arity)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// A type that doubles can be created for.
#[derive(Clone, Debug)]
pub struct TargetType {
    name: String,
    methods: Vec<Method>,
}

impl TargetType {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), methods: vec![] }
    }

    /// Adds a method. A later method with the same name replaces the earlier.
    pub fn method(mut self, method: Method) -> Self {
        self.methods.retain(|existing| existing.name != method.name);
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

/// Named free functions, shared by the doubles of one registry.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Function>,
}

impl FunctionTable {
    pub fn insert<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + 'static,
    {
        self.functions.insert(name.to_string(), Rc::new(function));
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        match self.functions.get(name) {
            Some(function) => function(args),
            None => Err(CallError::undefined_function(name)),
        }
    }
}

/// What a real implementation can see while it runs.
pub struct Scope<'a> {
    double: &'a Double,
}

impl<'a> Scope<'a> {
    /// The receiver, with the visibility of code inside the type.
    pub fn this(&self) -> Exposed<'a> {
        Exposed::internal(self.double)
    }

    /// Calls a free function of the registry the receiver was created by.
    pub fn function(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        self.double.functions().call(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CallableKind;

    fn constant(value: &'static str) -> impl Fn(&Scope<'_>, &[Value]) -> Result<Value, CallError> {
        move |_, _| Ok(Value::from(value))
    }

    #[test]
    fn test_lookup_finds_methods_by_name() {
        let sut = TargetType::new("Sample")
            .method(Method::public("open", 0, constant("a")))
            .method(Method::private("hidden", 1, constant("b")));

        assert_eq!(sut.name(), "Sample");
        assert!(sut.lookup("open").is_some_and(Method::is_public));
        assert_eq!(sut.lookup("hidden").map(|m| m.visibility), Some(Visibility::Private));
        assert!(sut.lookup("missing").is_none());
    }

    #[test]
    fn test_redeclared_method_replaces_previous() {
        let sut = TargetType::new("Sample")
            .method(Method::public("open", 0, constant("a")))
            .method(Method::protected("open", 2, constant("b")).returning(ValueKind::Str));

        assert_eq!(sut.methods().count(), 1);
        let method = sut.lookup("open").unwrap();
        assert_eq!(method.visibility, Visibility::Protected);
        assert_eq!(method.arity, 2);
        assert_eq!(method.returns, ValueKind::Str);
    }

    #[test]
    fn test_missing_function_is_undefined_callable() {
        let mut sut = FunctionTable::default();
        sut.insert("known", |_| Ok(Value::from("known")));

        assert_eq!(sut.call("known", &[]), Ok(Value::from("known")));
        assert_eq!(
            sut.call("undefinedFunction", &[]),
            Err(CallError::UndefinedCallable { kind: CallableKind::Function, name: "undefinedFunction".to_string() })
        );
    }
}
