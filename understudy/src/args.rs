// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The `Arguments` type represents all possible invocations of the program.

use crate::report::ReportFormat;
use anyhow::anyhow;
use clap::{arg, command, ArgAction, ArgMatches, Command};

/// Common constants used in the module.
const MODE_LIST_SUBCOMMAND: &str = "list";
const MODE_RUN_SUBCOMMAND: &str = "run";
const FORMAT_TEXT: &str = "text";
const FORMAT_JSON: &str = "json";

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The path of the configuration file.
    pub config: Option<String>,
    // The mode of the application.
    pub mode: Mode,
}

/// Represents the mode of the application.
#[derive(Debug, PartialEq)]
pub enum Mode {
    /// Print the scenario catalogue.
    List,
    /// Run the named scenarios, every scenario when none is named.
    Run { scenarios: Vec<String>, format: ReportFormat },
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let config = matches.get_one::<String>("config").map(String::to_string);

        match matches.subcommand() {
            Some((MODE_LIST_SUBCOMMAND, _)) => Ok(Arguments { config, mode: Mode::List }),
            Some((MODE_RUN_SUBCOMMAND, run_matches)) => {
                let scenarios = run_matches
                    .get_many::<String>("SCENARIO")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                let format = match run_matches.get_one::<String>("format").map(String::as_str) {
                    Some(FORMAT_JSON) => ReportFormat::Json,
                    Some(FORMAT_TEXT) | None => ReportFormat::Text,
                    Some(other) => return Err(anyhow!("unrecognized format: {other}")),
                };
                Ok(Arguments { config, mode: Mode::Run { scenarios, format } })
            }
            _ => Err(anyhow!("unrecognized subcommand")),
        }
    }
}

/// Represents the command line interface of the application.
pub fn cli() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(arg!(-c --config <FILE> "Path of the config file"))
        .subcommand(Command::new(MODE_LIST_SUBCOMMAND).about("lists the scenarios"))
        .subcommand(
            Command::new(MODE_RUN_SUBCOMMAND).about("runs scenarios against the fixture doubles").args(&[
                arg!([SCENARIO] "Name of a scenario to run").action(ArgAction::Append).num_args(0..),
                arg!(-f --format <FORMAT> "Format of the report")
                    .value_parser([FORMAT_TEXT, FORMAT_JSON])
                    .default_value(FORMAT_TEXT)
                    .hide_default_value(false),
            ]),
        )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_list_call() {
        let execution = vec!["understudy", "-c", "~/understudy.yml", "list"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(arguments, Arguments { config: Some("~/understudy.yml".into()), mode: Mode::List });
    }

    #[test]
    fn test_run_defaults() {
        let execution = vec!["understudy", "run"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments { config: None, mode: Mode::Run { scenarios: vec![], format: ReportFormat::Text } }
        );
    }

    #[test]
    fn test_run_call() {
        let execution = vec!["understudy", "run", "--format", "json", "full-double", "private-indirect"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments {
                config: None,
                mode: Mode::Run {
                    scenarios: vec!["full-double".to_string(), "private-indirect".to_string()],
                    format: ReportFormat::Json,
                },
            }
        );
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let execution = vec!["understudy", "run", "--format", "xml"];

        assert!(cli().try_get_matches_from(execution).is_err());
    }
}
