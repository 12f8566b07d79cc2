use crate::commands::check::CheckCommand;
use crate::error::Error;
use crate::runner::Runner;
use fargate_stack_common::config::{CPU, DESIRED_COUNT, MEMORY_MIB};
use fargate_stack_common::StackConfig;
use tabled::settings::style::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    setting: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl SettingRow {
    fn new(setting: &str, value: impl Into<String>) -> Self {
        SettingRow {
            setting: setting.to_string(),
            value: value.into(),
        }
    }
}

pub(crate) struct CheckRunner {
    pub(crate) command: CheckCommand,
}

impl Runner for CheckRunner {
    /// Print the resolved configuration and the names derived from it
    async fn run(&mut self) -> Result<(), Error> {
        let config = self.config(self.command.env_file.as_deref())?;

        println!("{}\n", console::style("Configuration is valid").green().bold());
        println!("{}", table(&config));
        Ok(())
    }
}

fn table(config: &StackConfig) -> String {
    let mut table = Table::new(summary(config));
    table.with(Style::modern());
    table.to_string()
}

/// Resolved values worth showing, secret names included but never secret material
fn summary(config: &StackConfig) -> Vec<SettingRow> {
    let names = config.names();

    let mut rows = vec![
        SettingRow::new("Stack", names.id),
        SettingRow::new("VPC", names.vpc),
        SettingRow::new("Cluster", names.cluster),
        SettingRow::new("Service", names.service),
        SettingRow::new("Image", config.image.clone()),
        SettingRow::new("Port", config.port.to_string()),
        SettingRow::new("Cost center", config.cost_center.clone()),
    ];

    rows.extend(
        config
            .secrets()
            .iter()
            .map(|secret| SettingRow::new(secret.env_name(), secret.secret_name())),
    );

    rows.extend([
        SettingRow::new(
            "ENV",
            config.container_env.clone().unwrap_or("(not set)".into()),
        ),
        SettingRow::new(
            "Task size",
            format!("{DESIRED_COUNT} x {CPU} CPU units, {MEMORY_MIB} MiB"),
        ),
    ]);

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use fargate_stack_common::Env;

    fn config() -> StackConfig {
        StackConfig::from_env(&Env::from_iter([
            ("STACK_NAME_PREFIX", "demo"),
            ("DOCKER_IMAGE", "nginx"),
            ("COST_CENTER", "R&D"),
            ("PORT", "80"),
            ("synapse-auth-token", "t"),
            ("google-auth-json", "g"),
        ]))
        .unwrap()
    }

    #[test]
    fn summary_lists_names_and_secrets() {
        let summary = summary(&config());

        let has = |key: &str, value: &str| {
            summary
                .iter()
                .any(|row| row.setting == key && row.value == value)
        };

        assert!(has("Stack", "demo-DockerFargateStack"));
        assert!(has("secrets-manager-google-auth-json", "demo/g"));
        assert!(has("ENV", "(not set)"));
    }

    #[test]
    fn table_has_headers_and_one_line_per_setting() {
        let table = table(&config());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[1].contains("Setting") && lines[1].contains("Value"));

        let stack = lines
            .iter()
            .find(|line| line.contains("demo-DockerFargateStack"))
            .expect("stack row is printed");

        assert!(stack.contains("Stack"));
        assert!(table.contains("demo/t"));
        assert!(table.contains("2 x 256 CPU units, 1024 MiB"));
    }
}
