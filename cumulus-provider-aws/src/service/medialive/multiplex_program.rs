//! aws_medialive_multiplex_program (AWS::MediaLive::Multiplexprogram)
//!
//! Registered framework-style: the handler reports its own type name.

use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use crate::cloudcontrol::{CcSchemaConfig, CloudControlResource};
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_medialive_multiplex_program";

const VALID_PIPELINES: &[&str] = &["CURRENTLY_ACTIVE", "PIPELINE_0", "PIPELINE_1"];

pub fn multiplex_program_config() -> CcSchemaConfig {
    CcSchemaConfig {
        type_name: TYPE_NAME,
        aws_type_name: "AWS::MediaLive::Multiplexprogram",
        tag_format: None,
        schema: ResourceSchema::new(TYPE_NAME)
            .with_description("A program within a MediaLive multiplex.")
            .attribute(
                AttributeSchema::new("multiplex_id", AttributeType::String)
                    .required()
                    .force_new()
                    .with_provider_name("MultiplexId"),
            )
            .attribute(
                AttributeSchema::new("program_name", AttributeType::String)
                    .required()
                    .force_new()
                    .with_provider_name("ProgramName"),
            )
            .attribute(
                AttributeSchema::new(
                    "multiplex_program_settings",
                    AttributeType::Struct(vec![
                        AttributeSchema::new("program_number", AttributeType::Int)
                            .required()
                            .with_provider_name("ProgramNumber"),
                        AttributeSchema::new(
                            "preferred_channel_pipeline",
                            types::string_enum(VALID_PIPELINES),
                        )
                        .with_provider_name("PreferredChannelPipeline"),
                        AttributeSchema::new(
                            "service_descriptor",
                            AttributeType::Struct(vec![
                                AttributeSchema::new("provider_name", AttributeType::String)
                                    .required()
                                    .with_provider_name("ProviderName"),
                                AttributeSchema::new("service_name", AttributeType::String)
                                    .required()
                                    .with_provider_name("ServiceName"),
                            ]),
                        )
                        .with_provider_name("ServiceDescriptor"),
                        AttributeSchema::new("video_settings", AttributeType::Document)
                            .with_provider_name("VideoSettings"),
                    ]),
                )
                .required()
                .with_provider_name("MultiplexProgramSettings"),
            )
            .attribute(
                AttributeSchema::new("packet_identifiers_map", AttributeType::Document)
                    .read_only()
                    .with_provider_name("PacketIdentifiersMap"),
            )
            .attribute(
                AttributeSchema::new("pipeline_details", AttributeType::Document)
                    .read_only()
                    .with_provider_name("PipelineDetails"),
            ),
    }
}

pub fn new_resource_multiplex_program() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(CloudControlResource::new(multiplex_program_config()).self_named())
}
