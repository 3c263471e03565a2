//! aws_medialive_input (AWS::MediaLive::Input)

use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use crate::cloudcontrol::{CcSchemaConfig, CloudControlResource, TagFormat};
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_medialive_input";

const VALID_INPUT_TYPES: &[&str] = &[
    "UDP_PUSH",
    "RTP_PUSH",
    "RTMP_PUSH",
    "RTMP_PULL",
    "URL_PULL",
    "MP4_FILE",
    "MEDIACONNECT",
    "INPUT_DEVICE",
    "AWS_CDI",
    "TS_FILE",
];

fn string_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

pub fn input_config() -> CcSchemaConfig {
    CcSchemaConfig {
        type_name: TYPE_NAME,
        aws_type_name: "AWS::MediaLive::Input",
        tag_format: Some(TagFormat::JsonObject),
        schema: ResourceSchema::new(TYPE_NAME)
            .with_description("A MediaLive input, the source of content for a channel.")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_provider_name("Name"),
            )
            .attribute(
                AttributeSchema::new("type", types::string_enum(VALID_INPUT_TYPES))
                    .required()
                    .force_new()
                    .with_provider_name("Type"),
            )
            .attribute(
                AttributeSchema::new(
                    "destinations",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new("stream_name", AttributeType::String)
                            .with_provider_name("StreamName"),
                    ]))),
                )
                .with_description("Destination settings for push inputs")
                .with_provider_name("Destinations"),
            )
            .attribute(
                AttributeSchema::new(
                    "input_devices",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new("id", AttributeType::String).with_provider_name("Id"),
                    ]))),
                )
                .with_provider_name("InputDevices"),
            )
            .attribute(
                AttributeSchema::new("input_security_groups", string_list())
                    .with_description("Input security group IDs")
                    .with_provider_name("InputSecurityGroups"),
            )
            .attribute(
                AttributeSchema::new(
                    "media_connect_flows",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new("flow_arn", crate::types::arn())
                            .with_provider_name("FlowArn"),
                    ]))),
                )
                .with_provider_name("MediaConnectFlows"),
            )
            .attribute(
                AttributeSchema::new("role_arn", crate::types::arn())
                    .with_description("IAM role MediaLive assumes to read the source")
                    .with_provider_name("RoleArn"),
            )
            .attribute(
                AttributeSchema::new(
                    "sources",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new("password_param", AttributeType::String)
                            .with_provider_name("PasswordParam"),
                        AttributeSchema::new("url", AttributeType::String)
                            .with_provider_name("Url"),
                        AttributeSchema::new("username", AttributeType::String)
                            .with_provider_name("Username"),
                    ]))),
                )
                .with_description("Source URLs for pull inputs")
                .with_provider_name("Sources"),
            )
            .attribute(
                AttributeSchema::new(
                    "vpc",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("security_group_ids", string_list())
                            .with_provider_name("SecurityGroupIds"),
                        AttributeSchema::new("subnet_ids", string_list())
                            .required()
                            .with_provider_name("SubnetIds"),
                    ]),
                )
                .force_new()
                .with_description("Settings for a VPC input")
                .with_provider_name("Vpc"),
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
                AttributeSchema::new("input_id", AttributeType::String)
                    .read_only()
                    .with_provider_name("Id"),
            ),
    }
}

pub fn resource_input() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(CloudControlResource::new(input_config()))
}
