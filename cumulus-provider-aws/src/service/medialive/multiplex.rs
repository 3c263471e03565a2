//! aws_medialive_multiplex (AWS::MediaLive::Multiplex)

use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use crate::cloudcontrol::{CcSchemaConfig, CloudControlResource, TagFormat};
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_medialive_multiplex";

pub fn multiplex_config() -> CcSchemaConfig {
    CcSchemaConfig {
        type_name: TYPE_NAME,
        aws_type_name: "AWS::MediaLive::Multiplex",
        tag_format: Some(TagFormat::KeyValueList),
        schema: ResourceSchema::new(TYPE_NAME)
            .with_description("A MediaLive multiplex, which combines programs into one transport stream.")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_provider_name("Name"),
            )
            .attribute(
                AttributeSchema::new(
                    "availability_zones",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .required()
                .force_new()
                .with_description("The two availability zones the multiplex runs in")
                .with_provider_name("AvailabilityZones"),
            )
            .attribute(
                AttributeSchema::new(
                    "multiplex_settings",
                    AttributeType::Struct(vec![
                        AttributeSchema::new(
                            "maximum_video_buffer_delay_milliseconds",
                            types::positive_int(),
                        )
                        .with_provider_name("MaximumVideoBufferDelayMilliseconds"),
                        AttributeSchema::new("transport_stream_bitrate", types::positive_int())
                            .required()
                            .with_provider_name("TransportStreamBitrate"),
                        AttributeSchema::new("transport_stream_id", AttributeType::Int)
                            .required()
                            .with_provider_name("TransportStreamId"),
                        AttributeSchema::new(
                            "transport_stream_reserved_bitrate",
                            AttributeType::Int,
                        )
                        .with_provider_name("TransportStreamReservedBitrate"),
                    ]),
                )
                .required()
                .with_provider_name("MultiplexSettings"),
            )
            .attribute(
                AttributeSchema::new(
                    "destinations",
                    AttributeType::List(Box::new(AttributeType::Struct(vec![
                        AttributeSchema::new(
                            "multiplex_media_connect_output_destination_settings",
                            AttributeType::Struct(vec![
                                AttributeSchema::new("entitlement_arn", crate::types::arn())
                                    .with_provider_name("EntitlementArn"),
                            ]),
                        )
                        .with_provider_name("MultiplexMediaConnectOutputDestinationSettings"),
                    ]))),
                )
                .with_provider_name("Destinations"),
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
                AttributeSchema::new("multiplex_id", AttributeType::String)
                    .read_only()
                    .with_provider_name("Id"),
            )
            .attribute(
                AttributeSchema::new("pipelines_running_count", AttributeType::Int)
                    .read_only()
                    .with_provider_name("PipelinesRunningCount"),
            )
            .attribute(
                AttributeSchema::new("program_count", AttributeType::Int)
                    .read_only()
                    .with_provider_name("ProgramCount"),
            )
            .attribute(
                AttributeSchema::new("state", AttributeType::String)
                    .read_only()
                    .with_provider_name("State"),
            ),
    }
}

pub fn resource_multiplex() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(CloudControlResource::new(multiplex_config()))
}
