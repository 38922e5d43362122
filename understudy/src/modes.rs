// SPDX-License-Identifier: GPL-3.0-or-later

use crate::report::{Report, ReportFormat};
use crate::scenarios::{self, Scenario};
use crate::{args, config};
use std::io;
use std::process::ExitCode;

/// Represent the modes the application can run in.
pub enum Mode {
    List,
    Run { scenarios: Vec<&'static Scenario>, format: ReportFormat, config: config::Main },
}

impl Mode {
    /// Configure the application mode based on the command line arguments and the configuration.
    ///
    /// Scenario names are resolved here, so an unknown name fails before anything runs.
    pub fn configure(args: args::Arguments, config: config::Main) -> Result<Self, ConfigurationError> {
        match args.mode {
            args::Mode::List => {
                log::debug!("Mode: list scenarios");
                Ok(Self::List)
            }
            args::Mode::Run { scenarios, format } => {
                log::debug!("Mode: run scenarios");
                let selected = if scenarios.is_empty() {
                    scenarios::catalogue().iter().collect()
                } else {
                    scenarios
                        .iter()
                        .map(|name| {
                            scenarios::find(name).ok_or_else(|| ConfigurationError::UnknownScenario(name.clone()))
                        })
                        .collect::<Result<Vec<_>, _>>()?
                };
                Ok(Self::Run { scenarios: selected, format, config })
            }
        }
    }

    /// It actually runs the application mode.
    pub fn run(self) -> ExitCode {
        let status = match self {
            Self::List => list(io::stdout().lock()).map(|_| ExitCode::SUCCESS),
            Self::Run { scenarios, format, config } => {
                let report = Report::run(scenarios, &config);
                report
                    .write(format, io::stdout().lock())
                    .map(|_| if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
                    .map_err(anyhow::Error::from)
            }
        };
        status.unwrap_or_else(|error| {
            log::error!("understudy: {error}");
            ExitCode::FAILURE
        })
    }
}

fn list(mut writer: impl io::Write) -> anyhow::Result<()> {
    for scenario in scenarios::catalogue() {
        writeln!(writer, "{:<24} {}", scenario.name, scenario.summary)?;
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_all_scenarios() {
        let arguments = args::Arguments {
            config: None,
            mode: args::Mode::Run { scenarios: vec![], format: ReportFormat::Text },
        };

        match Mode::configure(arguments, config::Main::default()) {
            Ok(Mode::Run { scenarios, .. }) => assert_eq!(scenarios.len(), scenarios::catalogue().len()),
            _ => panic!("Expected run mode"),
        }
    }

    #[test]
    fn test_configure_unknown_scenario() {
        let arguments = args::Arguments {
            config: None,
            mode: args::Mode::Run { scenarios: vec!["nope".to_string()], format: ReportFormat::Json },
        };

        match Mode::configure(arguments, config::Main::default()) {
            Err(ConfigurationError::UnknownScenario(name)) => assert_eq!(name, "nope"),
            _ => panic!("Expected unknown scenario error"),
        }
    }

    #[test]
    fn test_list_prints_every_scenario() {
        let mut buffer = Vec::new();
        list(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), scenarios::catalogue().len());
        assert!(text.contains("private-indirect"));
    }
}
