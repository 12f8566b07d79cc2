use fargate_stack_common::ConfigError;

/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            self.0,
            console::style(self.1.clone().unwrap_or_default()).dim()
        )
    }
}

impl std::error::Error for Error {}

/// Configuration errors are the user's to fix, show what is wrong and how to fix it
impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        let title = match error {
            ConfigError::Missing(_) => "Missing configuration",
            ConfigError::InvalidPort { .. } | ConfigError::InvalidPrefix { .. } => {
                "Invalid configuration"
            }
            ConfigError::EnvFileNotFound(_) => "Env file not found",
            ConfigError::MalformedEnvFile { .. } => "Malformed env file",
        };

        let hint = match error.variable() {
            Some(name) => format!("{error}. Export {name} or add it to the .env file."),
            None => format!("{error}. Check the --env-file path and its contents."),
        };

        Error::new(title, Some(&hint))
    }
}

/// Automatically convert all eyre error reports
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        log::error!("{error:?}");

        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&err.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_variable() {
        let error = Error::from(ConfigError::Missing("PORT".into()));

        assert_eq!(error.0, "Missing configuration");
        assert!(error.1.unwrap().starts_with("PORT is required"));
    }

    #[test]
    fn env_file_errors_point_at_the_file() {
        let error = Error::from(ConfigError::EnvFileNotFound("typo.env".into()));

        assert_eq!(error.0, "Env file not found");
        assert!(error.1.unwrap().contains("--env-file"));
    }

    #[test]
    fn report_keeps_wrapped_error() {
        let report = eyre::Report::new(Error::new("Failed to write template", Some("hint")));
        let error = Error::from(report);

        assert_eq!(error.0, "Failed to write template");
        assert_eq!(error.1.as_deref(), Some("hint"));
    }
}
