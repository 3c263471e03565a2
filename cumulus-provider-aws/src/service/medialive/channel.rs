//! aws_medialive_channel (AWS::MediaLive::Channel)
//!
//! Encoder settings are large and change often upstream, so they are carried
//! as a free-form document rather than a typed block.

use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use crate::cloudcontrol::{CcSchemaConfig, CloudControlResource, TagFormat};
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_medialive_channel";

const VALID_CHANNEL_CLASSES: &[&str] = &["STANDARD", "SINGLE_PIPELINE"];
const VALID_LOG_LEVELS: &[&str] = &["ERROR", "WARNING", "INFO", "DEBUG", "DISABLED"];
const VALID_CODECS: &[&str] = &["MPEG2", "AVC", "HEVC"];
const VALID_MAXIMUM_BITRATES: &[&str] = &["MAX_10_MBPS", "MAX_20_MBPS", "MAX_50_MBPS"];
const VALID_RESOLUTIONS: &[&str] = &["SD", "HD", "UHD"];

fn string_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

fn destination_type() -> AttributeType {
    AttributeType::Struct(vec![
        AttributeSchema::new("id", AttributeType::String)
            .required()
            .with_provider_name("Id"),
        AttributeSchema::new(
            "media_package_settings",
            AttributeType::List(Box::new(AttributeType::Struct(vec![
                AttributeSchema::new("channel_id", AttributeType::String)
                    .with_provider_name("ChannelId"),
            ]))),
        )
        .with_provider_name("MediaPackageSettings"),
        AttributeSchema::new(
            "multiplex_settings",
            AttributeType::Struct(vec![
                AttributeSchema::new("multiplex_id", AttributeType::String)
                    .with_provider_name("MultiplexId"),
                AttributeSchema::new("program_name", AttributeType::String)
                    .with_provider_name("ProgramName"),
            ]),
        )
        .with_provider_name("MultiplexSettings"),
        AttributeSchema::new(
            "settings",
            AttributeType::List(Box::new(AttributeType::Struct(vec![
                AttributeSchema::new("password_param", AttributeType::String)
                    .with_provider_name("PasswordParam"),
                AttributeSchema::new("stream_name", AttributeType::String)
                    .with_provider_name("StreamName"),
                AttributeSchema::new("url", AttributeType::String).with_provider_name("Url"),
                AttributeSchema::new("username", AttributeType::String)
                    .with_provider_name("Username"),
            ]))),
        )
        .with_provider_name("Settings"),
    ])
}

fn input_attachment_type() -> AttributeType {
    AttributeType::Struct(vec![
        AttributeSchema::new("input_attachment_name", AttributeType::String)
            .with_provider_name("InputAttachmentName"),
        AttributeSchema::new("input_id", AttributeType::String).with_provider_name("InputId"),
        AttributeSchema::new("input_settings", AttributeType::Document)
            .with_provider_name("InputSettings"),
        AttributeSchema::new("automatic_input_failover_settings", AttributeType::Document)
            .with_provider_name("AutomaticInputFailoverSettings"),
    ])
}

pub fn channel_config() -> CcSchemaConfig {
    CcSchemaConfig {
        type_name: TYPE_NAME,
        aws_type_name: "AWS::MediaLive::Channel",
        tag_format: Some(TagFormat::JsonObject),
        schema: ResourceSchema::new(TYPE_NAME)
            .with_description("A MediaLive channel, which ingests and transcodes source content from inputs.")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_provider_name("Name"),
            )
            .attribute(
                AttributeSchema::new("channel_class", types::string_enum(VALID_CHANNEL_CLASSES))
                    .with_default(cumulus_core::resource::Value::String("STANDARD".to_string()))
                    .with_description("Whether the channel runs one or two pipelines")
                    .with_provider_name("ChannelClass"),
            )
            .attribute(
                AttributeSchema::new(
                    "cdi_input_specification",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("resolution", types::string_enum(VALID_RESOLUTIONS))
                            .required()
                            .with_provider_name("Resolution"),
                    ]),
                )
                .with_provider_name("CdiInputSpecification"),
            )
            .attribute(
                AttributeSchema::new("destinations", AttributeType::List(Box::new(destination_type())))
                    .with_description("Output destinations of the channel")
                    .with_provider_name("Destinations"),
            )
            .attribute(
                AttributeSchema::new("encoder_settings", AttributeType::Document)
                    .with_description("Encoder settings (audio, video, captions, output groups)")
                    .with_provider_name("EncoderSettings"),
            )
            .attribute(
                AttributeSchema::new(
                    "input_attachments",
                    AttributeType::List(Box::new(input_attachment_type())),
                )
                .with_provider_name("InputAttachments"),
            )
            .attribute(
                AttributeSchema::new(
                    "input_specification",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("codec", types::string_enum(VALID_CODECS))
                            .with_provider_name("Codec"),
                        AttributeSchema::new(
                            "maximum_bitrate",
                            types::string_enum(VALID_MAXIMUM_BITRATES),
                        )
                        .with_provider_name("MaximumBitrate"),
                        AttributeSchema::new("resolution", types::string_enum(VALID_RESOLUTIONS))
                            .with_provider_name("Resolution"),
                    ]),
                )
                .with_provider_name("InputSpecification"),
            )
            .attribute(
                AttributeSchema::new("log_level", types::string_enum(VALID_LOG_LEVELS))
                    .with_provider_name("LogLevel"),
            )
            .attribute(
                AttributeSchema::new(
                    "maintenance",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("maintenance_day", AttributeType::String)
                            .with_provider_name("MaintenanceDay"),
                        AttributeSchema::new("maintenance_start_time", AttributeType::String)
                            .with_provider_name("MaintenanceStartTime"),
                    ]),
                )
                .with_provider_name("Maintenance"),
            )
            .attribute(
                AttributeSchema::new("role_arn", crate::types::arn())
                    .with_description("IAM role MediaLive assumes while running the channel")
                    .with_provider_name("RoleArn"),
            )
            .attribute(
                AttributeSchema::new(
                    "vpc",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("public_address_allocation_ids", string_list())
                            .with_provider_name("PublicAddressAllocationIds"),
                        AttributeSchema::new("security_group_ids", string_list())
                            .with_provider_name("SecurityGroupIds"),
                        AttributeSchema::new("subnet_ids", string_list())
                            .with_provider_name("SubnetIds"),
                    ]),
                )
                .force_new()
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
                AttributeSchema::new("channel_id", AttributeType::String)
                    .read_only()
                    .with_provider_name("Id"),
            )
            .attribute(
                AttributeSchema::new("inputs", string_list())
                    .read_only()
                    .with_provider_name("Inputs"),
            ),
    }
}

pub fn resource_channel() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(CloudControlResource::new(channel_config()))
}
