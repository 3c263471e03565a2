//! Macie service package registration table

use cumulus_core::service::{
    FrameworkDataSource, FrameworkResource, SdkDataSource, SdkResource, ServicePackage,
};

use super::s3_bucket_association;
use crate::conns::AwsClient;
use crate::names;

pub struct MaciePackage;

impl ServicePackage<AwsClient> for MaciePackage {
    fn framework_data_sources(&self) -> Vec<FrameworkDataSource<AwsClient>> {
        vec![]
    }

    fn framework_resources(&self) -> Vec<FrameworkResource<AwsClient>> {
        vec![]
    }

    fn sdk_data_sources(&self) -> Vec<SdkDataSource<AwsClient>> {
        vec![]
    }

    fn sdk_resources(&self) -> Vec<SdkResource<AwsClient>> {
        vec![SdkResource {
            factory: s3_bucket_association::resource_s3_bucket_association,
            type_name: s3_bucket_association::TYPE_NAME,
        }]
    }

    fn service_package_name(&self) -> &'static str {
        names::MACIE
    }
}

pub fn service_package() -> Box<dyn ServicePackage<AwsClient>> {
    Box::new(MaciePackage)
}
