// SPDX-License-Identifier: GPL-3.0-or-later

use super::double::Double;
use super::target::{FunctionTable, TargetType};
use super::{CallError, Mode};
use crate::config;
use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Type not found: {name}")]
    TypeNotFound { name: String },
    #[error("Type already registered: {name}")]
    DuplicateType { name: String },
}

/// Knows the target types and creates doubles of them.
///
/// Doubles take the configuration and the free functions of the registry at
/// the time they are created.
#[derive(Default)]
pub struct Registry {
    types: HashMap<String, Rc<TargetType>>,
    functions: Rc<FunctionTable>,
    config: config::Main,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: config::Main) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &config::Main {
        &self.config
    }

    pub fn register(&mut self, target: TargetType) -> Result<(), RegistryError> {
        if self.types.contains_key(target.name()) {
            return Err(RegistryError::DuplicateType { name: target.name().to_string() });
        }
        log::debug!("Registering type {} with {} method(s)", target.name(), target.methods().count());
        self.types.insert(target.name().to_string(), Rc::new(target));
        Ok(())
    }

    /// Registers a free function real implementations can call by name.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + 'static,
    {
        Rc::make_mut(&mut self.functions).insert(name, function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The names of the registered types, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn create(&self, name: &str, mode: Mode) -> Result<Double, RegistryError> {
        let target = self
            .types
            .get(name)
            .ok_or_else(|| RegistryError::TypeNotFound { name: name.to_string() })?;
        log::debug!("Creating {mode} double of {name}");
        Ok(Double::new(Rc::clone(target), mode, Rc::clone(&self.functions), &self.config))
    }

    /// A full double: unstubbed calls answer the default empty value.
    pub fn mock(&self, name: &str) -> Result<Double, RegistryError> {
        self.create(name, Mode::Full)
    }

    /// A partial double: unstubbed calls run the real implementation.
    pub fn partial_mock(&self, name: &str) -> Result<Double, RegistryError> {
        self.create(name, Mode::Partial)
    }
}
