use super::{CfnResource, Template};
use crate::config::{CONTAINER_ENV_NAME, CPU, DESIRED_COUNT, MEMORY_MIB};
use serde_json::{json, Value};

const CONTAINER_NAME: &str = "web";
const LISTENER_PORT: u16 = 80;

impl Template {
    pub(super) fn cluster(&self) -> CfnResource {
        CfnResource {
            name: self.cluster_id(),
            resource: json!({
                "Type": "AWS::ECS::Cluster"
            }),
        }
    }

    /// Everything behind the service construct: task, roles, load balancer and the ECS service
    pub(super) fn service(&self) -> Vec<CfnResource> {
        let mut resources = self.task_definition();
        resources.extend(self.load_balancer());
        resources.extend(self.ecs_service());
        resources
    }

    pub(super) fn service_outputs(&self) -> Vec<CfnResource> {
        let dns_name = json!({"Fn::GetAtt": [self.id(&["LB"]), "DNSName"]});

        vec![
            CfnResource {
                name: "LoadBalancerDNS".into(),
                resource: json!({"Value": dns_name}),
            },
            CfnResource {
                name: "ServiceURL".into(),
                resource: json!({"Value": {"Fn::Join": ["", ["http://", dns_name]]}}),
            },
        ]
    }

    fn cluster_id(&self) -> String {
        self.prefixed(&self.names.cluster, &[])
    }

    /// Logical ID of a resource under the service construct
    fn id(&self, names: &[&str]) -> String {
        self.prefixed(&self.names.service, names)
    }

    fn task_definition(&self) -> Vec<CfnResource> {
        let task = self.id(&["TaskDef"]);
        let log_group = self.id(&["TaskDef", CONTAINER_NAME, "LogGroup"]);

        vec![
            CfnResource {
                name: task.clone(),
                resource: json!({
                    "Type": "AWS::ECS::TaskDefinition",
                    "Properties": {
                        "ContainerDefinitions": [self.container(&log_group)],
                        "Cpu": CPU.to_string(),
                        "Memory": MEMORY_MIB.to_string(),
                        "Family": task,
                        "NetworkMode": "awsvpc",
                        "RequiresCompatibilities": ["FARGATE"],
                        "ExecutionRoleArn": {"Fn::GetAtt": [self.id(&["TaskDef", "ExecutionRole"]), "Arn"]},
                        "TaskRoleArn": {"Fn::GetAtt": [self.id(&["TaskDef", "TaskRole"]), "Arn"]}
                    }
                }),
            },
            CfnResource {
                name: self.id(&["TaskDef", "TaskRole"]),
                resource: json!({
                    "Type": "AWS::IAM::Role",
                    "Properties": {
                        "AssumeRolePolicyDocument": ecs_tasks_trust_policy()
                    }
                }),
            },
            CfnResource {
                name: self.id(&["TaskDef", "ExecutionRole"]),
                resource: json!({
                    "Type": "AWS::IAM::Role",
                    "Properties": {
                        "AssumeRolePolicyDocument": ecs_tasks_trust_policy(),
                        "Policies": self.execution_policies(&log_group)
                    }
                }),
            },
            CfnResource {
                name: log_group,
                resource: json!({
                    "Type": "AWS::Logs::LogGroup",
                    "Properties": {},
                    "UpdateReplacePolicy": "Retain",
                    "DeletionPolicy": "Retain"
                }),
            },
        ]
    }

    /// The single container of the task
    ///
    /// Secrets are injected by the ECS agent at start, the template only carries their ARNs.
    fn container(&self, log_group: &str) -> Value {
        let secrets = self
            .config
            .secrets()
            .iter()
            .map(|secret| secret.binding())
            .collect::<Vec<Value>>();

        let mut container = json!({
            "Name": CONTAINER_NAME,
            "Image": self.config.image,
            "Essential": true,
            "PortMappings": [{
                "ContainerPort": self.config.port,
                "Protocol": "tcp"
            }],
            "Secrets": secrets,
            "LogConfiguration": {
                "LogDriver": "awslogs",
                "Options": {
                    "awslogs-group": {"Ref": log_group},
                    "awslogs-stream-prefix": self.names.service,
                    "awslogs-region": {"Ref": "AWS::Region"}
                }
            }
        });

        if let Some(value) = &self.config.container_env {
            container["Environment"] = json!([{"Name": CONTAINER_ENV_NAME, "Value": value}]);
        }

        container
    }

    /// Permissions the ECS agent needs to start the task: write logs and read the secrets
    fn execution_policies(&self, log_group: &str) -> Vec<Value> {
        let secrets = self
            .config
            .secrets()
            .iter()
            .map(|secret| secret.policy_resource())
            .collect::<Vec<Value>>();

        vec![json!({
            "PolicyName": self.id(&["TaskDef", "ExecutionRoleDefaultPolicy"]),
            "PolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Action": ["logs:CreateLogStream", "logs:PutLogEvents"],
                        "Resource": {"Fn::GetAtt": [log_group, "Arn"]}
                    },
                    {
                        "Effect": "Allow",
                        "Action": [
                            "secretsmanager:GetSecretValue",
                            "secretsmanager:DescribeSecret"
                        ],
                        "Resource": secrets
                    }
                ]
            }
        })]
    }

    /// Public application load balancer forwarding HTTP to the tasks
    fn load_balancer(&self) -> Vec<CfnResource> {
        let lb = self.id(&["LB"]);
        let lb_security_group = self.id(&["LB", "SecurityGroup"]);
        let service_security_group = self.id(&["Service", "SecurityGroup"]);
        let target_group = self.id(&["LB", "PublicListener", "ECSGroup"]);
        let port = self.config.port;

        vec![
            CfnResource {
                name: lb.clone(),
                resource: json!({
                    "Type": "AWS::ElasticLoadBalancingV2::LoadBalancer",
                    "Properties": {
                        "Scheme": "internet-facing",
                        "Type": "application",
                        "Subnets": refs(&self.public_subnets()),
                        "SecurityGroups": [{"Fn::GetAtt": [lb_security_group, "GroupId"]}],
                        "LoadBalancerAttributes": [{
                            "Key": "deletion_protection.enabled",
                            "Value": "false"
                        }]
                    },
                    "DependsOn": self.public_routes()
                }),
            },
            CfnResource {
                name: lb_security_group.clone(),
                resource: json!({
                    "Type": "AWS::EC2::SecurityGroup",
                    "Properties": {
                        "GroupDescription": format!("Load balancer of {}", self.names.service),
                        "VpcId": {"Ref": self.vpc_id()},
                        "SecurityGroupIngress": [{
                            "CidrIp": "0.0.0.0/0",
                            "Description": format!("Allow from anyone on port {LISTENER_PORT}"),
                            "FromPort": LISTENER_PORT,
                            "IpProtocol": "tcp",
                            "ToPort": LISTENER_PORT
                        }],
                        // Replaces the default allow-all egress, the only allowed egress is added below
                        "SecurityGroupEgress": [{
                            "CidrIp": "255.255.255.255/32",
                            "Description": "Disallow all traffic",
                            "FromPort": 252,
                            "IpProtocol": "icmp",
                            "ToPort": 86
                        }]
                    }
                }),
            },
            CfnResource {
                name: format!("{lb_security_group}ToServiceEgress"),
                resource: json!({
                    "Type": "AWS::EC2::SecurityGroupEgress",
                    "Properties": {
                        "GroupId": {"Fn::GetAtt": [lb_security_group, "GroupId"]},
                        "DestinationSecurityGroupId": {"Fn::GetAtt": [service_security_group, "GroupId"]},
                        "Description": "Load balancer to target",
                        "FromPort": port,
                        "IpProtocol": "tcp",
                        "ToPort": port
                    }
                }),
            },
            CfnResource {
                name: self.id(&["LB", "PublicListener"]),
                resource: json!({
                    "Type": "AWS::ElasticLoadBalancingV2::Listener",
                    "Properties": {
                        "LoadBalancerArn": {"Ref": lb},
                        "Port": LISTENER_PORT,
                        "Protocol": "HTTP",
                        "DefaultActions": [{
                            "Type": "forward",
                            "TargetGroupArn": {"Ref": target_group}
                        }]
                    }
                }),
            },
            CfnResource {
                name: target_group,
                resource: json!({
                    "Type": "AWS::ElasticLoadBalancingV2::TargetGroup",
                    "Properties": {
                        "Port": LISTENER_PORT,
                        "Protocol": "HTTP",
                        "TargetType": "ip",
                        "VpcId": {"Ref": self.vpc_id()},
                        "TargetGroupAttributes": [{
                            "Key": "stickiness.enabled",
                            "Value": "false"
                        }]
                    }
                }),
            },
        ]
    }

    fn ecs_service(&self) -> Vec<CfnResource> {
        let service = self.id(&["Service"]);
        let security_group = self.id(&["Service", "SecurityGroup"]);
        let lb_security_group = self.id(&["LB", "SecurityGroup"]);
        let port = self.config.port;

        vec![
            CfnResource {
                name: service,
                resource: json!({
                    "Type": "AWS::ECS::Service",
                    "Properties": {
                        "Cluster": {"Ref": self.cluster_id()},
                        "DesiredCount": DESIRED_COUNT,
                        "LaunchType": "FARGATE",
                        "TaskDefinition": {"Ref": self.id(&["TaskDef"])},
                        "EnableECSManagedTags": false,
                        "HealthCheckGracePeriodSeconds": 60,
                        "DeploymentConfiguration": {
                            "MaximumPercent": 200,
                            "MinimumHealthyPercent": 50
                        },
                        "LoadBalancers": [{
                            "ContainerName": CONTAINER_NAME,
                            "ContainerPort": port,
                            "TargetGroupArn": {"Ref": self.id(&["LB", "PublicListener", "ECSGroup"])}
                        }],
                        "NetworkConfiguration": {
                            "AwsvpcConfiguration": {
                                "AssignPublicIp": "DISABLED",
                                "SecurityGroups": [{"Fn::GetAtt": [security_group, "GroupId"]}],
                                "Subnets": refs(&self.private_subnets())
                            }
                        }
                    },
                    "DependsOn": [
                        self.id(&["LB", "PublicListener", "ECSGroup"]),
                        self.id(&["LB", "PublicListener"]),
                        self.id(&["TaskDef", "TaskRole"])
                    ]
                }),
            },
            CfnResource {
                name: security_group.clone(),
                resource: json!({
                    "Type": "AWS::EC2::SecurityGroup",
                    "Properties": {
                        "GroupDescription": format!("Tasks of {}", self.names.service),
                        "VpcId": {"Ref": self.vpc_id()},
                        "SecurityGroupEgress": [{
                            "CidrIp": "0.0.0.0/0",
                            "Description": "Allow all outbound traffic by default",
                            "IpProtocol": "-1"
                        }]
                    }
                }),
            },
            CfnResource {
                name: format!("{security_group}FromLB"),
                resource: json!({
                    "Type": "AWS::EC2::SecurityGroupIngress",
                    "Properties": {
                        "GroupId": {"Fn::GetAtt": [security_group, "GroupId"]},
                        "SourceSecurityGroupId": {"Fn::GetAtt": [lb_security_group, "GroupId"]},
                        "Description": "Load balancer to target",
                        "FromPort": port,
                        "IpProtocol": "tcp",
                        "ToPort": port
                    }
                }),
            },
        ]
    }
}

fn ecs_tasks_trust_policy() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"Service": "ecs-tasks.amazonaws.com"},
            "Action": "sts:AssumeRole"
        }]
    })
}

fn refs(names: &[String]) -> Vec<Value> {
    names.iter().map(|name| json!({"Ref": name})).collect()
}
