//! Amazon Macie (classic)

pub mod api;
pub mod client;
pub mod s3_bucket_association;
mod service_package_gen;

pub use service_package_gen::{MaciePackage, service_package};

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_core::service::ServicePackage;

    #[test]
    fn registration_tables() {
        let package = MaciePackage;

        assert_eq!(package.service_package_name(), "macie");
        assert!(package.framework_resources().is_empty());
        assert!(package.framework_data_sources().is_empty());
        assert!(package.sdk_data_sources().is_empty());

        let sdk: Vec<&str> = package.sdk_resources().iter().map(|r| r.type_name).collect();
        assert_eq!(sdk, vec!["aws_macie_s3_bucket_association"]);
    }
}
