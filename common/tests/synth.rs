use fargate_stack_common::{ConfigError, Env, StackConfig, Template};
use serde_json::Value;

fn env(extra: &[(&str, &str)]) -> Env {
    let mut vars = vec![
        ("STACK_NAME_PREFIX", "schematic"),
        ("DOCKER_IMAGE", "ghcr.io/sage-bionetworks/schematic:latest"),
        ("COST_CENTER", "Sage/Core"),
        ("PORT", "3001"),
        ("synapse-auth-token", "synapse"),
        ("google-auth-json", "google"),
    ];

    vars.extend_from_slice(extra);
    Env::from_iter(vars)
}

#[test]
fn synthesizes_parsable_template() {
    let config = StackConfig::from_env(&env(&[("CONTAINER_ENV", "staging")])).unwrap();
    let template = Template::render(&config);
    let json: Value = serde_json::from_str(&template.to_json().unwrap()).unwrap();

    assert_eq!(template.stack_name(), "schematic-DockerFargateStack");
    assert_eq!(json["AWSTemplateFormatVersion"], "2010-09-09");
    assert!(json["Outputs"]["ServiceURL"].is_object());

    let (_, task) = template
        .resources_of_type("AWS::ECS::TaskDefinition")
        .next()
        .unwrap();

    let container = &task["Properties"]["ContainerDefinitions"][0];
    assert_eq!(container["Image"], "ghcr.io/sage-bionetworks/schematic:latest");
    assert_eq!(container["PortMappings"][0]["ContainerPort"], 3001);
    assert_eq!(container["Environment"][0]["Value"], "staging");
    assert_eq!(container["Secrets"].as_array().unwrap().len(), 2);

    let secret_arn = serde_json::to_string(&container["Secrets"][0]["ValueFrom"]).unwrap();
    assert!(secret_arn.contains(":secret:schematic/synapse"));
}

#[test]
fn service_tag_matches_cost_center() {
    let config = StackConfig::from_env(&env(&[])).unwrap();
    let template = Template::render(&config);
    let (_, service) = template.resources_of_type("AWS::ECS::Service").next().unwrap();

    let cost_center = service["Properties"]["Tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|tag| tag["Key"] == "CostCenter")
        .map(|tag| tag["Value"].clone());

    assert_eq!(cost_center, Some(Value::from("Sage/Core")));
}

#[test]
fn nothing_is_rendered_without_config() {
    let err = StackConfig::from_env(&env(&[("DOCKER_IMAGE", "")])).unwrap_err();

    assert_eq!(err, ConfigError::Missing("DOCKER_IMAGE".into()));
    assert_eq!(err.to_string(), "DOCKER_IMAGE is required");
}
