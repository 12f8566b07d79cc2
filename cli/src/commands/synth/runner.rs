use crate::cloudformation;
use crate::commands::synth::SynthCommand;
use crate::error::Error;
use crate::runner::Runner;
use eyre::WrapErr;
use fargate_stack_common::Template;
use std::path::Path;

pub(crate) struct SynthRunner {
    pub(crate) command: SynthCommand,
}

impl Runner for SynthRunner {
    /// Render the template and emit it, optionally asking CloudFormation to validate it
    async fn run(&mut self) -> Result<(), Error> {
        let config = self.config(self.command.env_file.as_deref())?;
        let template = Template::render(&config);
        let body = template.to_json()?;

        match &self.command.output {
            Some(path) => {
                self.write(path, &body)?;

                eprintln!(
                    "{} {} {}",
                    console::style("Rendered").green().bold(),
                    console::style(template.stack_name()).bold(),
                    console::style(format!("to {}", path.display())).dim()
                );
            }

            None => println!("{body}"),
        }

        if self.command.validate {
            self.validate(&body).await?;
        }

        Ok(())
    }
}

impl SynthRunner {
    fn write(&self, path: &Path, body: &str) -> eyre::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, body)
            .wrap_err_with(|| format!("Failed to write template to {}", path.display()))
    }

    async fn validate(&self, body: &str) -> Result<(), Error> {
        eprintln!("{}...", console::style("Validating template").green().bold());

        let validation = cloudformation::validate(body).await.map_err(|e| {
            let cause = e.root_cause().to_string();
            self.error(Some("Template validation failed"), Some(&cause), Some(e.into()))
        })?;

        if !validation.capabilities.is_empty() {
            eprintln!(
                "{} {}",
                console::style("Requires capabilities").bold(),
                console::style(validation.capabilities.join(", ")).dim()
            );
        }

        if let Some(reason) = validation.capabilities_reason {
            log::debug!("Capabilities reason: {reason}");
        }

        eprintln!("{}", console::style("Template is valid").green().bold());
        Ok(())
    }
}
