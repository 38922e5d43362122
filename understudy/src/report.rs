// SPDX-License-Identifier: GPL-3.0-or-later

//! Reporting of scenario runs, as text lines or as a JSON document.

use crate::config;
use crate::scenarios::Scenario;
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The outcome of one scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<Outcome>,
}

impl Report {
    /// Runs the scenarios one after the other.
    pub fn run<'a>(scenarios: impl IntoIterator<Item = &'a Scenario>, config: &config::Main) -> Self {
        let mut report = Report::default();
        for scenario in scenarios {
            let outcome = match scenario.run(config) {
                Ok(()) => Outcome { name: scenario.name.to_string(), passed: true, failure: None },
                Err(failure) => {
                    log::warn!("Scenario {} failed: {failure}", scenario.name);
                    Outcome { name: scenario.name.to_string(), passed: false, failure: Some(failure.to_string()) }
                }
            };
            report.add(outcome);
        }
        report
    }

    fn add(&mut self, outcome: Outcome) {
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn write(&self, format: ReportFormat, mut writer: impl io::Write) -> Result<(), ReportError> {
        match format {
            ReportFormat::Text => {
                for outcome in &self.outcomes {
                    match &outcome.failure {
                        None => writeln!(writer, "ok     {}", outcome.name)?,
                        Some(failure) => writeln!(writer, "FAILED {}: {}", outcome.name, failure)?,
                    }
                }
                writeln!(writer, "{} passed, {} failed", self.passed, self.failed)?;
            }
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, self)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    fn sample() -> Report {
        let mut report = Report::default();
        report.add(Outcome { name: "good".to_string(), passed: true, failure: None });
        report.add(Outcome { name: "bad".to_string(), passed: false, failure: Some("broken".to_string()) });
        report
    }

    #[test]
    fn test_counts() {
        let sut = sample();

        assert_eq!(sut.passed, 1);
        assert_eq!(sut.failed, 1);
        assert!(!sut.is_success());
    }

    #[test]
    fn test_text_format() {
        let mut buffer = Vec::new();
        sample().write(ReportFormat::Text, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "ok     good\nFAILED bad: broken\n1 passed, 1 failed\n");
    }

    #[test]
    fn test_json_format() {
        let mut buffer = Vec::new();
        sample().write(ReportFormat::Json, &mut buffer).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["outcomes"][0]["name"], "good");
        assert!(json["outcomes"][0].get("failure").is_none());
        assert_eq!(json["outcomes"][1]["failure"], "broken");
    }

    #[test]
    fn test_run_whole_catalogue() {
        let sut = Report::run(scenarios::catalogue(), &config::Main::default());

        assert!(sut.is_success(), "{:?}", sut.outcomes);
        assert_eq!(sut.passed, scenarios::catalogue().len());
    }
}
