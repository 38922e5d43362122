// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the engine.
//!
//! The configuration is either loaded from a file or used with default
//! values, which are defined in the code. It controls how full doubles
//! answer unstubbed calls and how calls are recorded for verification.
//!
//! The configuration file syntax is based on the YAML format.
//! The default configuration file name is `understudy.yml`.
//!
//! The configuration file location is searched in the following order:
//! 1. The current working directory
//! 2. The local configuration directory of the user
//! 3. The configuration directory of the user
//! 4. The local configuration directory of the application
//! 5. The configuration directory of the application
//!
//! ```yaml
//! schema: 1.0
//!
//! doubles:
//!   unstubbed: fail
//!
//! recording:
//!   enabled: true
//!   capacity: 1024
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use serde::Deserialize;
    use std::fmt;

    /// Represents the engine configuration.
    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default)]
        pub doubles: Doubles,
        #[serde(default)]
        pub recording: Recording,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                doubles: Doubles::default(),
                recording: Recording::default(),
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml_string = serde_yml::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml_string.lines() {
                writeln!(f, "{}", line)?;
            }
            Ok(())
        }
    }

    /// Configuration of the doubles.
    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Doubles {
        #[serde(default)]
        pub unstubbed: Unstubbed,
    }

    /// What a full double does with a call no binding matches.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Unstubbed {
        /// Answer the default empty value of the declared return kind. (Default)
        #[default]
        Empty,
        /// Fail the call.
        Fail,
    }

    /// Configuration of the call recording.
    #[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Recording {
        #[serde(default = "default_enabled")]
        pub enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub capacity: Option<usize>,
    }

    impl Default for Recording {
        fn default() -> Self {
            Self { enabled: true, capacity: None }
        }
    }

    const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

    fn default_enabled() -> bool {
        true
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: String = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {

    use super::types::*;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error, PartialEq)]
    pub enum ValidationError {
        #[error("Recording capacity must be positive")]
        ZeroCapacity,
        #[error("Recording capacity is set, but recording is disabled")]
        CapacityWithoutRecording,
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn add(&mut self, error: ValidationError) {
            self.errors.push(error);
        }

        fn add_result(&mut self, result: Result<(), ValidationError>) {
            if let Err(error) = result {
                match error {
                    ValidationError::Multiple { errors } => {
                        self.errors.extend(errors);
                    }
                    single_error => self.errors.push(single_error),
                }
            }
        }

        fn finish(mut self) -> Result<(), ValidationError> {
            match self.errors.len() {
                0 => Ok(()),
                1 => Err(self.errors.remove(0)),
                _ => Err(ValidationError::Multiple { errors: self.errors }),
            }
        }
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();
            collector.add_result(Recording::validate(&config.recording));
            collector.finish()
        }
    }

    impl Validator<Recording> for Recording {
        type Error = ValidationError;

        fn validate(config: &Recording) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            if config.capacity == Some(0) {
                collector.add(ValidationError::ZeroCapacity);
            }
            if config.capacity.is_some() && !config.enabled {
                collector.add(ValidationError::CapacityWithoutRecording);
            }

            collector.finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_validate_default_config() {
            assert!(Main::validate(&Main::default()).is_ok());
        }

        #[test]
        fn test_validate_recording_with_capacity() {
            let config = Recording { enabled: true, capacity: Some(16) };

            assert!(Recording::validate(&config).is_ok());
        }

        #[test]
        fn test_validate_zero_capacity() {
            let config = Recording { enabled: true, capacity: Some(0) };

            assert_eq!(Recording::validate(&config), Err(ValidationError::ZeroCapacity));
        }

        #[test]
        fn test_validate_capacity_without_recording() {
            let config = Recording { enabled: false, capacity: Some(8) };

            assert_eq!(Recording::validate(&config), Err(ValidationError::CapacityWithoutRecording));
        }

        #[test]
        fn test_validate_multiple_errors() {
            let config = Main {
                recording: Recording { enabled: false, capacity: Some(0) },
                ..Default::default()
            };

            match Main::validate(&config) {
                Err(ValidationError::Multiple { errors }) => {
                    assert_eq!(errors, vec![ValidationError::ZeroCapacity, ValidationError::CapacityWithoutRecording]);
                }
                other => panic!("Expected multiple validation errors, got: {:?}", other),
            }
        }
    }
}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "understudy.yml";

    pub struct Loader {}

    impl Loader {
        /// An explicit file must exist. Without one, the first `understudy.yml`
        /// found wins, and the defaults apply when there is none.
        pub fn load(current_directory: &Path, filename: &Option<String>) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                return Self::from_file(Path::new(path));
            }
            let found = Self::file_locations(current_directory).into_iter().find(|candidate| {
                log::debug!("Looking for configuration at {}", candidate.display());
                candidate.is_file()
            });
            match found {
                Some(path) => Self::from_file(&path),
                None => {
                    log::debug!("No configuration file, running with the defaults");
                    Ok(Main::default())
                }
            }
        }

        /// Candidate files: the working directory first, then the user
        /// config directories, then the application ones.
        fn file_locations(current_directory: &Path) -> Vec<PathBuf> {
            let user = BaseDirs::new()
                .map(|dirs| vec![dirs.config_local_dir().to_path_buf(), dirs.config_dir().to_path_buf()])
                .unwrap_or_default();
            let application = ProjectDirs::from("io.github", "understudy", "understudy")
                .map(|dirs| vec![dirs.config_local_dir().to_path_buf(), dirs.config_dir().to_path_buf()])
                .unwrap_or_default();

            let mut directories = vec![current_directory.to_path_buf()];
            directories.extend(user);
            directories.extend(application);
            directories.dedup();
            directories.into_iter().map(|directory| directory.join(CONFIG_FILE_NAME)).collect()
        }

        /// Reads, parses and validates one configuration file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            log::info!("Reading configuration from {}", path.display());
            let file = File::open(path).map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;
            let config: Main =
                Self::from_reader(file).map_err(|source| ConfigError::ParseError { path: path.to_path_buf(), source })?;
            Main::validate(&config)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;
            Ok(config)
        }

        fn from_reader<R, T>(reader: R) -> serde_yml::Result<T>
        where
            R: std::io::Read,
            T: serde::de::DeserializeOwned,
        {
            serde_yml::from_reader(reader)
        }
    }

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("Cannot read configuration file '{path}': {source}")]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("Invalid configuration syntax in '{path}': {source}")]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_yml::Error,
        },
        #[error("Invalid configuration in '{path}': {source}")]
        ValidationError {
            path: PathBuf,
            #[source]
            source: super::validation::ValidationError,
        },
    }

}
