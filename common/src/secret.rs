use serde_json::{json, Value};

/// Prefix of the env var names under which secrets appear inside the container
pub const SECRETS_MANAGER_ENV_PREFIX: &str = "secrets-manager-";

/// Pointer to a Secrets Manager secret, bound to a container env var
///
/// The secret material itself is resolved by the container runtime at task start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretRef {
    env_name: String,
    secret_name: String,
}

impl SecretRef {
    /// The "key" is the fixed secret identifier (e.g. "synapse-auth-token"),
    /// the "secret_name" is the full name of the secret in the store.
    pub fn new(key: &str, secret_name: &str) -> Self {
        SecretRef {
            env_name: format!("{SECRETS_MANAGER_ENV_PREFIX}{key}"),
            secret_name: secret_name.to_string(),
        }
    }

    /// Env var name as seen from inside the container
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// Partial ARN of the secret, the form ECS accepts in "ValueFrom"
    pub fn arn(&self) -> Value {
        self.arn_with_suffix("")
    }

    /// ARN pattern matching the random suffix Secrets Manager appends to secret names
    pub fn policy_resource(&self) -> Value {
        self.arn_with_suffix("-??????")
    }

    /// Container definition entry binding the secret to its env var
    pub fn binding(&self) -> Value {
        json!({
            "Name": self.env_name,
            "ValueFrom": self.arn(),
        })
    }

    fn arn_with_suffix(&self, suffix: &str) -> Value {
        json!({
            "Fn::Join": ["", [
                "arn:",
                {"Ref": "AWS::Partition"},
                ":secretsmanager:",
                {"Ref": "AWS::Region"},
                ":",
                {"Ref": "AWS::AccountId"},
                format!(":secret:{}{suffix}", self.secret_name),
            ]]
        })
    }
}

/// Full secret name, scoped under the stack prefix
pub fn key_path(prefix: &str, fragment: &str) -> String {
    format!("{prefix}/{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_name_is_prefixed() {
        let secret = SecretRef::new("google-auth-json", "schematic/google");
        assert_eq!(secret.env_name(), "secrets-manager-google-auth-json");
        assert_eq!(secret.secret_name(), "schematic/google");
    }

    #[test]
    fn arn_ends_with_secret_name() {
        let secret = SecretRef::new("synapse-auth-token", "p/token");

        assert_eq!(
            secret.arn().pointer("/Fn::Join/1/6"),
            Some(&json!(":secret:p/token"))
        );

        assert_eq!(
            secret.policy_resource().pointer("/Fn::Join/1/6"),
            Some(&json!(":secret:p/token-??????"))
        );
    }

    #[test]
    fn key_path_joins_with_slash() {
        assert_eq!(key_path("schematic", "token"), "schematic/token");
    }
}
