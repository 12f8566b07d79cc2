use crate::error::Error;
use fargate_stack_common::{Env, StackConfig};
use std::error::Error as StdError;
use std::path::Path;

pub(crate) trait Runner {
    /// Resolve the stack configuration
    ///
    /// Fails before anything is declared if the env file or a required variable is missing.
    fn config(&self, env_file: Option<&Path>) -> Result<StackConfig, Error> {
        Ok(StackConfig::from_env(&Env::load(env_file)?)?)
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    async fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new("Failed to run the command", None)
        }
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner(&self) -> impl Runner;
}
