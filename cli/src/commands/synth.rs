mod runner;
use crate::runner::{Runnable, Runner};
use clap::ArgAction;
use runner::SynthRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
pub(crate) struct SynthCommand {
    /// Env file to read the configuration from, process env vars take precedence
    #[arg(short, long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Write the template to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Submit the rendered template to CloudFormation for validation, nothing gets created
    #[arg(long, action = ArgAction::SetTrue)]
    validate: bool,
}

impl Runnable for SynthCommand {
    fn runner(&self) -> impl Runner {
        SynthRunner {
            command: self.clone(),
        }
    }
}
