// SPDX-License-Identifier: GPL-3.0-or-later

//! The scenario catalogue: what doubles can and cannot do with the fixtures.
//!
//! Every scenario runs against a fresh registry, so nothing configured by one
//! scenario is visible to another.

use crate::config;
use crate::engine::{any_parameters, expose, when, CallError, Registry, RegistryError, StubError};
use crate::fixtures::{self, BAR, EXCEPTION_MESSAGE, FOO};
use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioFailure {
    #[error("{context}: expected {expected}, got {actual}")]
    Mismatch { context: String, expected: String, actual: String },
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Stub error: {0}")]
    Stub(#[from] StubError),
}

type ScenarioResult = Result<(), ScenarioFailure>;

/// One entry of the catalogue.
pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    run: fn(&Registry) -> ScenarioResult,
}

impl Scenario {
    pub fn run(&self, config: &config::Main) -> ScenarioResult {
        log::debug!("Running scenario: {}", self.name);
        let registry = fixtures::registry(config.clone())?;
        (self.run)(&registry)
    }
}

pub fn catalogue() -> &'static [Scenario] {
    &CATALOGUE
}

pub fn find(name: &str) -> Option<&'static Scenario> {
    CATALOGUE.iter().find(|scenario| scenario.name == name)
}

static CATALOGUE: [Scenario; 10] = [
    Scenario {
        name: "without-double",
        summary: "an unstubbed partial double answers like the real object",
        run: without_double,
    },
    Scenario {
        name: "full-double",
        summary: "unstubbed calls on a full double answer null, stubbed ones the stub",
        run: full_double,
    },
    Scenario {
        name: "partial-double",
        summary: "unstubbed calls on a partial double run the real code, stubbed ones the stub",
        run: partial_double,
    },
    Scenario {
        name: "public-direct",
        summary: "a stubbed public method answers the stub when called directly",
        run: public_direct,
    },
    Scenario {
        name: "public-indirect",
        summary: "a stubbed public method answers the stub when called by a sibling",
        run: public_indirect,
    },
    Scenario {
        name: "private-direct",
        summary: "a stubbed private method is callable only through the expose view",
        run: private_direct,
    },
    Scenario {
        name: "private-indirect",
        summary: "stubbing a private method does not cover methods which never call it",
        run: private_indirect,
    },
    Scenario {
        name: "public-in-collaborator",
        summary: "moving the method into a collaborator as public makes it stubbable",
        run: public_in_collaborator,
    },
    Scenario {
        name: "protected-direct",
        summary: "a stubbed protected method is callable only through the expose view",
        run: protected_direct,
    },
    Scenario {
        name: "protected-indirect",
        summary: "a stubbed protected method answers the stub when called by a sibling",
        run: protected_indirect,
    },
];

fn expect(context: &str, actual: Result<Value, CallError>, expected: impl Into<Value>) -> ScenarioResult {
    let expected = expected.into();
    match actual {
        Ok(actual) if actual == expected => Ok(()),
        Ok(actual) => Err(mismatch(context, expected, actual)),
        Err(error) => Err(mismatch(context, expected, format!("error: {error}"))),
    }
}

fn expect_error<F>(context: &str, actual: Result<Value, CallError>, description: &str, accept: F) -> ScenarioResult
where
    F: Fn(&CallError) -> bool,
{
    match actual {
        Err(error) if accept(&error) => Ok(()),
        Err(error) => Err(mismatch(context, description, format!("error: {error}"))),
        Ok(value) => Err(mismatch(context, description, value)),
    }
}

fn mismatch(context: &str, expected: impl ToString, actual: impl ToString) -> ScenarioFailure {
    ScenarioFailure::Mismatch {
        context: context.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn flag(value: bool) -> [Value; 1] {
    [Value::from(value)]
}

fn without_double(registry: &Registry) -> ScenarioResult {
    let target = registry.partial_mock(FOO)?;

    expect("functionA()", target.call("functionA", &[]), "hoge")?;
    expect("functionB()", target.call("functionB", &[]), "fuga")
}

fn full_double(registry: &Registry) -> ScenarioResult {
    let mock = registry.mock(FOO)?;

    expect("unstubbed functionA()", mock.call("functionA", &[]), Value::Null)?;
    expect("unstubbed functionB()", mock.call("functionB", &[]), Value::Null)?;

    when(&mock, "functionA", any_parameters())?.then_return("HOGE");
    expect("stubbed functionA()", mock.call("functionA", &[]), "HOGE")?;
    expect("unstubbed functionB()", mock.call("functionB", &[]), Value::Null)
}

fn partial_double(registry: &Registry) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;

    expect("unstubbed functionA()", pmock.call("functionA", &[]), "hoge")?;
    expect("unstubbed functionB()", pmock.call("functionB", &[]), "fuga")?;

    when(&pmock, "functionA", any_parameters())?.then_return("HOGE");
    expect("stubbed functionA()", pmock.call("functionA", &[]), "HOGE")?;
    expect("unstubbed functionB()", pmock.call("functionB", &[]), "fuga")
}

fn public_direct(registry: &Registry) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;
    when(&pmock, "functionC", any_parameters())?.then_return("HOGE");

    expect("functionC(true)", pmock.call("functionC", &flag(true)), "HOGE")?;
    expect("functionC(false)", pmock.call("functionC", &flag(false)), "HOGE")
}

fn public_indirect(registry: &Registry) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;
    when(&pmock, "functionC", any_parameters())?.then_return("HOGE");

    expect("functionD(true)", pmock.call("functionD", &flag(true)), "HOGE")?;
    expect("functionD(false)", pmock.call("functionD", &flag(false)), "HOGE")
}

fn private_direct(registry: &Registry) -> ScenarioResult {
    non_public_direct(registry, "functionE")
}

fn protected_direct(registry: &Registry) -> ScenarioResult {
    non_public_direct(registry, "functionH")
}

fn non_public_direct(registry: &Registry, method: &str) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;
    when(&pmock, method, any_parameters())?.then_return("HOGE");

    expect_error(
        &format!("direct {method}(true)"),
        pmock.call(method, &flag(true)),
        "a visibility error",
        |error| matches!(error, CallError::NotVisible { .. }),
    )?;
    expect(&format!("exposed {method}(true)"), expose(&pmock).call(method, &flag(true)), "HOGE")?;
    expect(&format!("exposed {method}(false)"), expose(&pmock).call(method, &flag(false)), "HOGE")
}

fn private_indirect(registry: &Registry) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;
    when(&pmock, "functionE", any_parameters())?.then_return("HOGE");

    expect_error(
        "exposed functionF(true)",
        expose(&pmock).call("functionF", &flag(true)),
        "an undefined callable error",
        |error| matches!(error, CallError::UndefinedCallable { .. }),
    )?;
    // the caller sees only the message, as if it had caught the exception
    let result = match expose(&pmock).call("functionF", &flag(false)) {
        Ok(value) => value,
        Err(error) => Value::from(error.to_string()),
    };
    expect("exposed functionF(false)", Ok(result), EXCEPTION_MESSAGE)
}

fn public_in_collaborator(registry: &Registry) -> ScenarioResult {
    let bar_pmock = registry.partial_mock(BAR)?;
    let foo_pmock = registry.partial_mock(FOO)?;
    when(&bar_pmock, "functionE", any_parameters())?.then_return("HOGE");

    expect(
        "functionG(bar, false)",
        foo_pmock.call("functionG", &[Value::from(&bar_pmock), Value::from(false)]),
        "HOGE",
    )
}

fn protected_indirect(registry: &Registry) -> ScenarioResult {
    let pmock = registry.partial_mock(FOO)?;
    when(&pmock, "functionH", any_parameters())?.then_return("HOGE");

    expect("functionI(true)", pmock.call("functionI", &flag(true)), "HOGE")?;
    expect("functionI(false)", pmock.call("functionI", &flag(false)), "HOGE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_names_are_unique() {
        let names: HashSet<_> = catalogue().iter().map(|scenario| scenario.name).collect();

        assert_eq!(names.len(), catalogue().len());
    }

    #[test]
    fn test_every_scenario_passes_with_default_config() {
        let config = config::Main::default();

        for scenario in catalogue() {
            if let Err(failure) = scenario.run(&config) {
                panic!("scenario {} failed: {failure}", scenario.name);
            }
        }
    }

    #[test]
    fn test_find() {
        assert!(find("private-indirect").is_some());
        assert!(find("no-such-scenario").is_none());
    }

    #[test]
    fn test_strict_config_breaks_full_double_scenario() {
        let config = config::Main {
            doubles: config::Doubles { unstubbed: config::Unstubbed::Fail },
            ..Default::default()
        };

        let result = find("full-double").unwrap().run(&config);

        assert!(matches!(result, Err(ScenarioFailure::Mismatch { .. })));
    }

    #[test]
    fn test_mismatch_message() {
        let failure = mismatch("functionA()", Value::from("hoge"), Value::Null);

        assert_eq!(failure.to_string(), "functionA(): expected \"hoge\", got null");
    }
}
