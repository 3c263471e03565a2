//! aws_medialive_input_security_group (AWS::MediaLive::InputSecurityGroup)

use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use crate::cloudcontrol::{CcSchemaConfig, CloudControlResource, TagFormat};
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_medialive_input_security_group";

pub fn input_security_group_config() -> CcSchemaConfig {
    CcSchemaConfig {
        type_name: TYPE_NAME,
        aws_type_name: "AWS::MediaLive::InputSecurityGroup",
        tag_format: Some(TagFormat::JsonObject),
        schema: ResourceSchema::new(TYPE_NAME)
            .with_description("A MediaLive input security group, an allow-list of IPv4 CIDRs for push inputs.")
            .attribute(
                AttributeSchema::new(
                    "whitelist_rules",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new("cidr", types::cidr())
                            .required()
                            .with_provider_name("Cidr"),
                    ]))),
                )
                .required()
                .with_description("IPv4 CIDR blocks allowed to push to inputs using this group")
                .with_provider_name("WhitelistRules"),
            )
            .attribute(
                AttributeSchema::new("tags", crate::types::tags()).with_provider_name("Tags"),
            )
            .attribute(
                AttributeSchema::new("arn", crate::types::arn())
                    .read_only()
                    .with_provider_name("Arn"),
            )
            .attribute(
                AttributeSchema::new("input_security_group_id", AttributeType::String)
                    .read_only()
                    .with_provider_name("Id"),
            ),
    }
}

pub fn resource_input_security_group() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(CloudControlResource::new(input_security_group_config()))
}
