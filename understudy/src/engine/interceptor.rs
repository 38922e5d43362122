// SPDX-License-Identifier: GPL-3.0-or-later

//! Call resolution of doubles.
//!
//! Every call on a double, whether it comes from test code, from the expose
//! view or from a real implementation calling its own receiver, is resolved
//! here, in this order:
//! 1. The method must be declared by the target type.
//! 2. Callers outside the type can reach public methods only.
//! 3. The argument count must match the declaration.
//! 4. The call is recorded.
//! 5. The most recent matching binding answers, if there is one.
//! 6. Otherwise a full double answers the default empty value, and a
//!    partial double runs the real implementation with itself as receiver.
//!
//! Errors of real implementations and of bindings go back to the caller
//! unchanged.

use super::double::Double;
use super::stub::Binding;
use super::target::Method;
use super::{CallError, Mode};
use crate::config::Unstubbed;
use crate::value::Value;
use std::rc::Rc;

/// Where a call comes from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Caller {
    /// Code outside the type, through the double itself.
    External,
    /// Code outside the type, through the expose view.
    Exposed,
    /// A real implementation calling its own receiver.
    Internal,
}

/// The resolved target of a call.
#[derive(Debug)]
enum Resolution {
    Stubbed(Rc<Binding>),
    RealDelegate,
    DefaultEmpty,
}

pub(crate) fn dispatch(double: &Double, name: &str, args: &[Value], caller: Caller) -> Result<Value, CallError> {
    let target = double.target();
    let method = target.lookup(name).ok_or_else(|| CallError::undefined_method(target.name(), name))?;

    if caller == Caller::External && !method.is_public() {
        return Err(CallError::NotVisible {
            type_name: target.name().to_string(),
            method: name.to_string(),
            visibility: method.visibility,
        });
    }
    if args.len() != method.arity {
        return Err(CallError::ArgumentCount {
            type_name: target.name().to_string(),
            method: name.to_string(),
            expected: method.arity,
            found: args.len(),
        });
    }

    double.journal().borrow_mut().record(name, args);

    let resolution = resolve(double, method, args);
    log::trace!("{}::{} called {:?} resolves to {:?}", target.name(), name, caller, resolution);
    match resolution {
        Resolution::Stubbed(binding) => binding.answer(double, method, args),
        Resolution::RealDelegate => method.invoke(double, args),
        Resolution::DefaultEmpty => match double.unstubbed() {
            Unstubbed::Empty => Ok(method.returns.default_value()),
            Unstubbed::Fail => Err(CallError::Unstubbed {
                type_name: target.name().to_string(),
                method: name.to_string(),
            }),
        },
    }
}

fn resolve(double: &Double, method: &Method, args: &[Value]) -> Resolution {
    let binding = double.stubs().borrow().find(&method.name, args);
    match (binding, double.mode()) {
        (Some(binding), _) => Resolution::Stubbed(binding),
        (None, Mode::Full) => Resolution::DefaultEmpty,
        (None, Mode::Partial) => Resolution::RealDelegate,
    }
}
