/// Configuration defects detected before anything is declared
///
/// None of them is transient, the caller is expected to stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(String),

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidPort { name: String, value: String },

    #[error("{name} {value:?} can't be used in stack names: {reason}")]
    InvalidPrefix {
        name: String,
        value: String,
        reason: String,
    },

    #[error("env file {0} not found")]
    EnvFileNotFound(String),

    #[error("env file {path} is malformed: {reason}")]
    MalformedEnvFile { path: String, reason: String },
}

impl ConfigError {
    /// Name of the environment variable at fault, if the defect is about a single variable
    pub fn variable(&self) -> Option<&str> {
        match self {
            ConfigError::Missing(name) => Some(name),
            ConfigError::InvalidPort { name, .. } => Some(name),
            ConfigError::InvalidPrefix { name, .. } => Some(name),
            ConfigError::EnvFileNotFound(_) | ConfigError::MalformedEnvFile { .. } => None,
        }
    }
}
