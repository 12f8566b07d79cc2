mod cloudformation;
mod commands;
mod error;
mod logger;
mod runner;
use crate::commands::Commands;
use crate::error::Error;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fargate-stack",
    version,
    about = "Declare a load-balanced Fargate service as a CloudFormation template",
    long_about = "Reads the stack configuration from environment variables (and an optional .env file), \
                  validates it and renders the VPC, ECS cluster, task, load balancer and service declaration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Derive a runner from the command and run it
async fn run(command: impl Runnable) -> Result<(), Error> {
    command.runner().run().await
}

#[tokio::main]
async fn main() {
    Logger::init();
    let cli = Cli::parse();

    // Match all commands here, in one place
    let result = match cli.command {
        Commands::Synth(cmd) => run(cmd).await,
        Commands::Check(cmd) => run(cmd).await,
    };

    if let Err(error) = result {
        eprintln!("{}\n{error}", console::style("Error").red().bold());

        // Nothing has been declared, so there is nothing to roll back
        std::process::exit(1);
    }
}
