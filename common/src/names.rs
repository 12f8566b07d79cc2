use crate::error::ConfigError;
use crate::template::sanitize::escape_resource_name;
use once_cell::sync::Lazy;
use regex::Regex;

const ID_SUFFIX: &str = "-DockerFargateStack";
const VPC_SUFFIX: &str = "-FargateVPC";
const CLUSTER_SUFFIX: &str = "-Cluster";
const SERVICE_SUFFIX: &str = "-Service";

/// CloudFormation stack name limit
const MAX_STACK_NAME: usize = 128;

/// Longest escaped construct name, leaves room for nested logical IDs (255)
/// and IAM inline policy names (128) built on top of it
const MAX_ESCAPED_CONSTRUCT: usize = 90;

static STACK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][-A-Za-z0-9]*$").unwrap());

/// Names of the stack and its top level constructs, all derived from the prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackNames {
    pub id: String,
    pub vpc: String,
    pub cluster: String,
    pub service: String,
}

impl StackNames {
    pub fn new(prefix: &str) -> Self {
        StackNames {
            id: stack_id(prefix),
            vpc: vpc_name(prefix),
            cluster: cluster_name(prefix),
            service: service_name(prefix),
        }
    }
}

/// Check that every name derived from the prefix is accepted by CloudFormation
pub fn validate_prefix(name: &str, prefix: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPrefix {
        name: name.to_string(),
        value: prefix.to_string(),
        reason,
    };

    let id = stack_id(prefix);

    if !STACK_NAME.is_match(&id) {
        return Err(invalid(
            "only letters, digits and hyphens are allowed, starting with a letter".into(),
        ));
    }

    if id.len() > MAX_STACK_NAME {
        return Err(invalid(format!(
            "stack name {id} is longer than {MAX_STACK_NAME} characters"
        )));
    }

    let longest = [vpc_name(prefix), cluster_name(prefix), service_name(prefix)]
        .iter()
        .map(|construct| escape_resource_name(construct).len())
        .max()
        .unwrap_or_default();

    if longest > MAX_ESCAPED_CONSTRUCT {
        return Err(invalid(format!(
            "resource IDs derived from it exceed {MAX_ESCAPED_CONSTRUCT} characters"
        )));
    }

    Ok(())
}

pub fn stack_id(prefix: &str) -> String {
    format!("{prefix}{ID_SUFFIX}")
}

pub fn vpc_name(prefix: &str) -> String {
    format!("{prefix}{VPC_SUFFIX}")
}

pub fn cluster_name(prefix: &str) -> String {
    format!("{prefix}{CLUSTER_SUFFIX}")
}

pub fn service_name(prefix: &str) -> String {
    format!("{prefix}{SERVICE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_names() {
        let names = StackNames::new("P");

        assert_eq!(names.id, "P-DockerFargateStack");
        assert_eq!(names.vpc, "P-FargateVPC");
        assert_eq!(names.cluster, "P-Cluster");
        assert_eq!(names.service, "P-Service");
    }

    #[test]
    fn accepts_plain_prefixes() {
        assert!(validate_prefix("P", "schematic").is_ok());
        assert!(validate_prefix("P", "my-app-2").is_ok());
        assert!(validate_prefix("P", &"a".repeat(74)).is_ok());
    }

    #[test]
    fn rejects_prefixes_cloudformation_refuses() {
        for prefix in ["my/app", "1app", "-app", "my_app", "my app"] {
            let err = validate_prefix("STACK_NAME_PREFIX", prefix).unwrap_err();

            assert!(matches!(err, ConfigError::InvalidPrefix { .. }), "{prefix}");
            assert_eq!(err.variable(), Some("STACK_NAME_PREFIX"));
        }
    }

    #[test]
    fn rejects_prefixes_too_long() {
        assert!(validate_prefix("P", &"a".repeat(75)).is_err());
        assert!(validate_prefix("P", &"a".repeat(110)).is_err());
        assert!(validate_prefix("P", &"a-".repeat(20)).is_err());
    }

    #[test]
    fn derivation_is_idempotent() {
        assert_eq!(StackNames::new("schematic"), StackNames::new("schematic"));
        assert_eq!(stack_id("a-b"), stack_id("a-b"));
    }
}
