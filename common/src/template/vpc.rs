use super::{CfnResource, Template};
use crate::config::MAX_AZS;
use serde_json::{json, Value};

const VPC_CIDR: &str = "10.0.0.0/16";

impl Template {
    /// VPC with a public and a private subnet in each AZ
    ///
    /// Public subnets route through the internet gateway, private ones through
    /// a NAT gateway living in the public subnet of the same AZ.
    pub(super) fn vpc(&self) -> Vec<CfnResource> {
        let vpc = self.names.vpc.clone();
        let vpc_id = self.prefixed(&vpc, &[]);
        let gateway = self.prefixed(&vpc, &["IGW"]);
        let attachment = self.prefixed(&vpc, &["VPCGW"]);

        let mut resources = vec![
            CfnResource {
                name: vpc_id.clone(),
                resource: json!({
                    "Type": "AWS::EC2::VPC",
                    "Properties": {
                        "CidrBlock": VPC_CIDR,
                        "EnableDnsHostnames": true,
                        "EnableDnsSupport": true,
                        "InstanceTenancy": "default",
                        "Tags": [self.name_tag(&[])]
                    }
                }),
            },
            CfnResource {
                name: gateway.clone(),
                resource: json!({
                    "Type": "AWS::EC2::InternetGateway",
                    "Properties": {
                        "Tags": [self.name_tag(&[])]
                    }
                }),
            },
            CfnResource {
                name: attachment.clone(),
                resource: json!({
                    "Type": "AWS::EC2::VPCGatewayAttachment",
                    "Properties": {
                        "VpcId": {"Ref": vpc_id},
                        "InternetGatewayId": {"Ref": gateway}
                    }
                }),
            },
        ];

        for zone in 1..=MAX_AZS {
            resources.extend(self.public_subnet(zone));
            resources.extend(self.private_subnet(zone));
        }

        resources
    }

    /// Logical IDs of the public subnets, used by the load balancer
    pub(super) fn public_subnets(&self) -> Vec<String> {
        (1..=MAX_AZS)
            .map(|zone| self.subnet_id("Public", zone))
            .collect()
    }

    /// Logical IDs of the private subnets, where the tasks run
    pub(super) fn private_subnets(&self) -> Vec<String> {
        (1..=MAX_AZS)
            .map(|zone| self.subnet_id("Private", zone))
            .collect()
    }

    /// Default routes of the public subnets
    ///
    /// Internet facing resources must wait for them, otherwise they get created unreachable.
    pub(super) fn public_routes(&self) -> Vec<String> {
        (1..=MAX_AZS)
            .map(|zone| format!("{}DefaultRoute", self.subnet_id("Public", zone)))
            .collect()
    }

    /// Logical ID of the VPC itself
    pub(super) fn vpc_id(&self) -> String {
        self.prefixed(&self.names.vpc, &[])
    }

    fn subnet_id(&self, kind: &str, zone: usize) -> String {
        self.prefixed(&self.names.vpc, &[kind, "Subnet", &zone.to_string()])
    }

    fn public_subnet(&self, zone: usize) -> Vec<CfnResource> {
        let subnet = self.subnet_id("Public", zone);
        let mut resources = self.subnet("Public", zone, true);

        resources.extend([
            CfnResource {
                name: format!("{subnet}DefaultRoute"),
                resource: json!({
                    "Type": "AWS::EC2::Route",
                    "Properties": {
                        "RouteTableId": {"Ref": format!("{subnet}RouteTable")},
                        "DestinationCidrBlock": "0.0.0.0/0",
                        "GatewayId": {"Ref": self.prefixed(&self.names.vpc, &["IGW"])}
                    },
                    "DependsOn": [self.prefixed(&self.names.vpc, &["VPCGW"])]
                }),
            },
            CfnResource {
                name: format!("{subnet}EIP"),
                resource: json!({
                    "Type": "AWS::EC2::EIP",
                    "Properties": {
                        "Domain": "vpc",
                        "Tags": [self.name_tag(&[&format!("PublicSubnet{zone}")])]
                    }
                }),
            },
            CfnResource {
                name: format!("{subnet}NATGateway"),
                resource: json!({
                    "Type": "AWS::EC2::NatGateway",
                    "Properties": {
                        "SubnetId": {"Ref": subnet},
                        "AllocationId": {"Fn::GetAtt": [format!("{subnet}EIP"), "AllocationId"]},
                        "Tags": [self.name_tag(&[&format!("PublicSubnet{zone}")])]
                    },
                    "DependsOn": [
                        format!("{subnet}DefaultRoute"),
                        format!("{subnet}RouteTableAssociation")
                    ]
                }),
            },
        ]);

        resources
    }

    fn private_subnet(&self, zone: usize) -> Vec<CfnResource> {
        let subnet = self.subnet_id("Private", zone);
        let nat = format!("{}NATGateway", self.subnet_id("Public", zone));
        let mut resources = self.subnet("Private", zone, false);

        resources.push(CfnResource {
            name: format!("{subnet}DefaultRoute"),
            resource: json!({
                "Type": "AWS::EC2::Route",
                "Properties": {
                    "RouteTableId": {"Ref": format!("{subnet}RouteTable")},
                    "DestinationCidrBlock": "0.0.0.0/0",
                    "NatGatewayId": {"Ref": nat}
                }
            }),
        });

        resources
    }

    /// Subnet, its route table and the association between them
    fn subnet(&self, kind: &str, zone: usize, public: bool) -> Vec<CfnResource> {
        let subnet = self.subnet_id(kind, zone);
        let construct = format!("{kind}Subnet{zone}");

        vec![
            CfnResource {
                name: subnet.clone(),
                resource: json!({
                    "Type": "AWS::EC2::Subnet",
                    "Properties": {
                        "VpcId": {"Ref": self.vpc_id()},
                        "AvailabilityZone": {"Fn::Select": [zone - 1, {"Fn::GetAZs": ""}]},
                        "CidrBlock": subnet_cidr(public, zone),
                        "MapPublicIpOnLaunch": public,
                        "Tags": [
                            self.name_tag(&[&construct]),
                            {"Key": "aws-cdk:subnet-name", "Value": kind},
                            {"Key": "aws-cdk:subnet-type", "Value": kind}
                        ]
                    }
                }),
            },
            CfnResource {
                name: format!("{subnet}RouteTable"),
                resource: json!({
                    "Type": "AWS::EC2::RouteTable",
                    "Properties": {
                        "VpcId": {"Ref": self.vpc_id()},
                        "Tags": [self.name_tag(&[&construct])]
                    }
                }),
            },
            CfnResource {
                name: format!("{subnet}RouteTableAssociation"),
                resource: json!({
                    "Type": "AWS::EC2::SubnetRouteTableAssociation",
                    "Properties": {
                        "RouteTableId": {"Ref": format!("{subnet}RouteTable")},
                        "SubnetId": {"Ref": subnet}
                    }
                }),
            },
        ]
    }

    /// "Name" tag with the construct path, e.g. "<id>/<vpc>/PublicSubnet1"
    fn name_tag(&self, path: &[&str]) -> Value {
        let mut parts = vec![self.names.id.as_str(), self.names.vpc.as_str()];
        parts.extend_from_slice(path);

        json!({"Key": "Name", "Value": parts.join("/")})
    }
}

/// The /16 is split into four /18 blocks: public subnets first, then private ones
fn subnet_cidr(public: bool, zone: usize) -> String {
    let block = if public { zone - 1 } else { MAX_AZS + zone - 1 };
    format!("10.0.{}.0/18", block * 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subnet_blocks_do_not_overlap() {
        assert_eq!(subnet_cidr(true, 1), "10.0.0.0/18");
        assert_eq!(subnet_cidr(true, 2), "10.0.64.0/18");
        assert_eq!(subnet_cidr(false, 1), "10.0.128.0/18");
        assert_eq!(subnet_cidr(false, 2), "10.0.192.0/18");
    }
}
