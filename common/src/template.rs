pub mod sanitize;
mod service;
mod vpc;

use crate::config::{StackConfig, COST_CENTER_TAG_NAME};
use crate::names::StackNames;
use eyre::WrapErr;
use sanitize::escape_resource_name;
use serde_json::{json, Map, Value};

/// Types that reject a "Tags" property
const UNTAGGABLE: [&str; 3] = [
    "AWS::EC2::SecurityGroupEgress",
    "AWS::EC2::SecurityGroupIngress",
    "AWS::ElasticLoadBalancingV2::Listener",
];

/// A single entry of the "Resources" (or "Outputs") section
#[derive(Clone, Debug)]
pub struct CfnResource {
    pub name: String,
    pub resource: Value,
}

/// CloudFormation declaration of the whole stack
#[derive(Clone, Debug)]
pub struct Template {
    config: StackConfig,
    names: StackNames,
    resources: Map<String, Value>,
    outputs: Map<String, Value>,
}

impl Template {
    /// Declare every resource of the stack
    ///
    /// Pure: the same config always renders the same template.
    pub fn render(config: &StackConfig) -> Self {
        let mut template = Template {
            config: config.clone(),
            names: config.names(),
            resources: Map::new(),
            outputs: Map::new(),
        };

        let network = template.vpc();
        template.add_resources(network);

        let cluster = template.cluster();
        template.add_resource(cluster);

        // Everything under the service construct carries the cost center tag
        let service = template
            .service()
            .into_iter()
            .map(|resource| template.tagged(resource))
            .collect::<Vec<_>>();

        template.add_resources(service);

        for output in template.service_outputs() {
            template.outputs.insert(output.name, output.resource);
        }

        log::debug!(
            "Rendered {} resources for stack {}",
            template.resources.len(),
            template.names.id
        );

        template
    }

    pub fn names(&self) -> &StackNames {
        &self.names
    }

    /// Stack name to deploy under
    pub fn stack_name(&self) -> &str {
        &self.names.id
    }

    pub fn resources(&self) -> &Map<String, Value> {
        &self.resources
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Value> {
        self.resources.get(logical_id)
    }

    /// All resources of a CloudFormation type, e.g. "AWS::ECS::Service"
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, resource)| resource["Type"] == resource_type)
    }

    pub fn outputs(&self) -> &Map<String, Value> {
        &self.outputs
    }

    pub fn to_value(&self) -> Value {
        json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": format!("{} (load-balanced Fargate service)", self.names.id),
            "Resources": self.resources,
            "Outputs": self.outputs,
        })
    }

    pub fn to_json(&self) -> eyre::Result<String> {
        serde_json::to_string_pretty(&self.to_value())
            .wrap_err("Failed to serialize CloudFormation template")
    }

    fn add_resource(&mut self, CfnResource { name, resource }: CfnResource) {
        self.resources.insert(name, resource);
    }

    fn add_resources(&mut self, resources: Vec<CfnResource>) {
        for resource in resources {
            self.add_resource(resource);
        }
    }

    /// Logical ID of a resource nested under a construct
    fn prefixed(&self, construct: &str, names: &[&str]) -> String {
        format!("{}{}", escape_resource_name(construct), names.concat())
    }

    /// Add the cost center tag to a resource
    ///
    /// Resources that can't carry tags are left as is.
    fn tagged(&self, mut resource: CfnResource) -> CfnResource {
        if resource.resource["Type"]
            .as_str()
            .is_some_and(|t| UNTAGGABLE.contains(&t))
        {
            return resource;
        }

        let tag = json!({"Key": COST_CENTER_TAG_NAME, "Value": self.config.cost_center});

        if let Some(properties) = resource
            .resource
            .get_mut("Properties")
            .and_then(Value::as_object_mut)
        {
            if let Some(tags) = properties
                .entry("Tags")
                .or_insert_with(|| json!([]))
                .as_array_mut()
            {
                tags.push(tag);
            }
        }

        resource
    }
}
