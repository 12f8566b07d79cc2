mod runner;
use crate::runner::{Runnable, Runner};
use runner::CheckRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
pub(crate) struct CheckCommand {
    /// Env file to read the configuration from, process env vars take precedence
    #[arg(short, long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

impl Runnable for CheckCommand {
    fn runner(&self) -> impl Runner {
        CheckRunner {
            command: self.clone(),
        }
    }
}
