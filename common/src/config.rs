use crate::env::Env;
use crate::error::ConfigError;
use crate::names::{validate_prefix, StackNames};
use crate::secret::{key_path, SecretRef};

pub const STACK_NAME_PREFIX: &str = "STACK_NAME_PREFIX";
pub const DOCKER_IMAGE: &str = "DOCKER_IMAGE";
pub const COST_CENTER: &str = "COST_CENTER";
pub const PORT: &str = "PORT";

/// Plain-text env passed through from the CI workflow, seen as "ENV" in the container
pub const CONTAINER_ENV: &str = "CONTAINER_ENV";
pub const CONTAINER_ENV_NAME: &str = "ENV";

/// Secret identifiers, also the names of the env vars holding their key fragments
pub const SYNAPSE_AUTH_TOKEN: &str = "synapse-auth-token";
pub const GOOGLE_AUTH_JSON: &str = "google-auth-json";

pub const COST_CENTER_TAG_NAME: &str = "CostCenter";

/// Fargate task size and scale, not configurable
pub const CPU: u32 = 256;
pub const MEMORY_MIB: u32 = 1024;
pub const DESIRED_COUNT: u32 = 2;
pub const MAX_AZS: usize = 2;

/// Everything needed to declare the stack
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackConfig {
    pub prefix: String,
    pub image: String,
    pub port: u16,
    pub cost_center: String,

    /// Secret names in the store, "<prefix>/<fragment>"
    pub synapse_auth_token_key: String,
    pub google_auth_json_key: String,

    pub container_env: Option<String>,
}

impl StackConfig {
    /// Resolve and validate the configuration, failing on the first missing variable
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let prefix = env.required(STACK_NAME_PREFIX)?;
        validate_prefix(STACK_NAME_PREFIX, &prefix)?;
        let image = env.required(DOCKER_IMAGE)?;
        let cost_center = env.required(COST_CENTER)?;
        let port = parse_port(&env.required(PORT)?)?;

        let config = StackConfig {
            synapse_auth_token_key: key_path(&prefix, &env.required(SYNAPSE_AUTH_TOKEN)?),
            google_auth_json_key: key_path(&prefix, &env.required(GOOGLE_AUTH_JSON)?),
            container_env: env.optional(CONTAINER_ENV),
            prefix,
            image,
            port,
            cost_center,
        };

        log::debug!(
            "Resolved stack config: prefix={} image={} port={} env={:?}",
            config.prefix,
            config.image,
            config.port,
            config.container_env
        );

        Ok(config)
    }

    pub fn names(&self) -> StackNames {
        StackNames::new(&self.prefix)
    }

    /// Both secrets are always wired, in a fixed order
    pub fn secrets(&self) -> [SecretRef; 2] {
        [
            SecretRef::new(SYNAPSE_AUTH_TOKEN, &self.synapse_auth_token_key),
            SecretRef::new(GOOGLE_AUTH_JSON, &self.google_auth_json_key),
        ]
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),

        _ => Err(ConfigError::InvalidPort {
            name: PORT.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (STACK_NAME_PREFIX, "schematic"),
            (DOCKER_IMAGE, "ghcr.io/sage/schematic:v1"),
            (COST_CENTER, "NIH/123"),
            (PORT, "8080"),
            (SYNAPSE_AUTH_TOKEN, "token"),
            (GOOGLE_AUTH_JSON, "google"),
        ]
    }

    #[test]
    fn resolves_full_config() {
        let config = StackConfig::from_env(&Env::from_iter(vars())).unwrap();

        assert_eq!(config.prefix, "schematic");
        assert_eq!(config.image, "ghcr.io/sage/schematic:v1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cost_center, "NIH/123");
        assert_eq!(config.synapse_auth_token_key, "schematic/token");
        assert_eq!(config.google_auth_json_key, "schematic/google");
        assert_eq!(config.container_env, None);
    }

    #[test]
    fn each_missing_variable_is_named() {
        for (name, _) in vars() {
            let missing = Env::from_iter(vars().into_iter().filter(|(n, _)| *n != name));
            let blank = Env::from_iter(
                vars()
                    .into_iter()
                    .map(|(n, v)| if n == name { (n, "") } else { (n, v) }),
            );

            for env in [missing, blank] {
                let err = StackConfig::from_env(&env).unwrap_err();
                assert_eq!(err, ConfigError::Missing(name.to_string()));
                assert!(err.to_string().contains(name));
            }
        }
    }

    #[test]
    fn rejects_non_numeric_port() {
        for value in ["http", "80a", "-1", "0", "70000"] {
            let env = Env::from_iter(
                vars()
                    .into_iter()
                    .map(|(n, v)| if n == PORT { (n, value) } else { (n, v) }),
            );

            let err = StackConfig::from_env(&env).unwrap_err();
            assert_eq!(err.variable(), Some(PORT));
            assert_eq!(
                err,
                ConfigError::InvalidPort {
                    name: PORT.to_string(),
                    value: value.to_string(),
                }
            );
        }
    }

    #[test]
    fn rejects_prefix_unfit_for_stack_names() {
        let env = Env::from_iter(vars().into_iter().map(|(n, v)| {
            if n == STACK_NAME_PREFIX {
                (n, "my/app")
            } else {
                (n, v)
            }
        }));

        let err = StackConfig::from_env(&env).unwrap_err();
        assert_eq!(err.variable(), Some(STACK_NAME_PREFIX));
        assert!(err.to_string().contains("my/app"));
    }

    #[test]
    fn reads_optional_container_env() {
        let mut with_env = vars();
        with_env.push((CONTAINER_ENV, "staging"));

        let config = StackConfig::from_env(&Env::from_iter(with_env)).unwrap();
        assert_eq!(config.container_env.as_deref(), Some("staging"));
    }

    #[test]
    fn secrets_are_fixed_pair() {
        let config = StackConfig::from_env(&Env::from_iter(vars())).unwrap();
        let [token, google] = config.secrets();

        assert_eq!(token.env_name(), "secrets-manager-synapse-auth-token");
        assert_eq!(token.secret_name(), "schematic/token");
        assert_eq!(google.env_name(), "secrets-manager-google-auth-json");
        assert_eq!(google.secret_name(), "schematic/google");
    }
}
