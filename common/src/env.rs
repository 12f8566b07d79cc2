use crate::error::ConfigError;
use rust_dotenv::dotenv::DotEnv;
use std::collections::HashMap;
use std::path::Path;

/// File read when no explicit env file is given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// A snapshot of environment variables taken once at startup
///
/// Everything downstream reads configuration from this value,
/// never from the process environment directly.
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Snapshot of the current process environment
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Read the env file and overlay the process environment on top of it
    ///
    /// A missing default file is not an error, CI pipelines pass everything as real env vars.
    /// A missing file that was asked for explicitly is.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = env_file.unwrap_or(Path::new(DEFAULT_ENV_FILE));

        let mut vars = if path.exists() {
            log::debug!("Reading env file {}", path.display());
            check_quotes(path)?;

            DotEnv::load_env(&*path.to_string_lossy()).unwrap_or_default()
        } else if env_file.is_some() {
            return Err(ConfigError::EnvFileNotFound(path.display().to_string()));
        } else {
            log::debug!("No env file found at {}", path.display());
            HashMap::new()
        };

        vars.extend(std::env::vars());
        Ok(Self { vars })
    }

    /// Return the value or fail when the variable is unset or empty
    pub fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    /// Return the value if it is set and not empty
    pub fn optional(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

/// Reject values made of a lone quote, the dotenv parser can't handle them
fn check_quotes(path: &Path) -> Result<(), ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedEnvFile {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;

    for (number, line) in content.lines().enumerate() {
        if let Some((name, value)) = line.split_once('=') {
            if matches!(value.trim(), "\"" | "'") {
                return Err(malformed(format!(
                    "unterminated quote in {} on line {}",
                    name.trim(),
                    number + 1
                )));
            }
        }
    }

    Ok(())
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
