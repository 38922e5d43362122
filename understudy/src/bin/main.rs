// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use std::env;
use std::process::ExitCode;
use understudy::{args, config, modes};

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Initialize the logging system.
    env_logger::init();
    // Get the package name and version from Cargo
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");

    // Parse the command line arguments.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;
    log::info!("{arguments:?}");
    // Load the configuration.
    let current_directory = env::current_dir().with_context(|| "Failed to get current working directory")?;
    let configuration = config::Loader::load(&current_directory, &arguments.config)?;
    log::info!("{configuration}");

    // Run the application.
    let application = modes::Mode::configure(arguments, configuration)?;
    log::debug!("Configuration complete, running the scenarios now...");
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}
