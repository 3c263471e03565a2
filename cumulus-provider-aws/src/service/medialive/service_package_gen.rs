//! MediaLive service package registration table

use cumulus_core::service::{
    FrameworkDataSource, FrameworkResource, SdkDataSource, SdkResource, ServicePackage,
};

use super::{channel, input, input_security_group, multiplex, multiplex_program};
use crate::conns::AwsClient;
use crate::names;

pub struct MediaLivePackage;

impl ServicePackage<AwsClient> for MediaLivePackage {
    fn framework_data_sources(&self) -> Vec<FrameworkDataSource<AwsClient>> {
        vec![]
    }

    fn framework_resources(&self) -> Vec<FrameworkResource<AwsClient>> {
        vec![FrameworkResource {
            factory: multiplex_program::new_resource_multiplex_program,
        }]
    }

    fn sdk_data_sources(&self) -> Vec<SdkDataSource<AwsClient>> {
        vec![]
    }

    fn sdk_resources(&self) -> Vec<SdkResource<AwsClient>> {
        vec![
            SdkResource {
                factory: channel::resource_channel,
                type_name: channel::TYPE_NAME,
            },
            SdkResource {
                factory: input::resource_input,
                type_name: input::TYPE_NAME,
            },
            SdkResource {
                factory: input_security_group::resource_input_security_group,
                type_name: input_security_group::TYPE_NAME,
            },
            SdkResource {
                factory: multiplex::resource_multiplex,
                type_name: multiplex::TYPE_NAME,
            },
        ]
    }

    fn service_package_name(&self) -> &'static str {
        names::MEDIALIVE
    }
}

pub fn service_package() -> Box<dyn ServicePackage<AwsClient>> {
    Box::new(MediaLivePackage)
}
