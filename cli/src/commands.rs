pub mod check;
pub mod synth;
use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render the CloudFormation template of the stack
    Synth(synth::SynthCommand),

    /// Validate the configuration and show the derived names, without rendering
    Check(check::CheckCommand),
}
