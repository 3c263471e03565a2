//! Macie (classic) API shapes and client trait
//!
//! Only the S3 resource operations are modelled. Field names follow the
//! service's JSON 1.1 wire format.

use std::fmt;

use cumulus_core::provider::BoxFuture;
use serde::{Deserialize, Serialize};

pub const S3_CONTINUOUS_CLASSIFICATION_TYPE_FULL: &str = "FULL";
pub const S3_ONE_TIME_CLASSIFICATION_TYPE_FULL: &str = "FULL";
pub const S3_ONE_TIME_CLASSIFICATION_TYPE_NONE: &str = "NONE";

pub const ERR_CODE_INVALID_INPUT_EXCEPTION: &str = "InvalidInputException";

/// Macie API error
#[derive(Debug, thiserror::Error)]
pub enum MacieError {
    #[error("{code}: {message}")]
    Service {
        code: String,
        message: String,
        status: u16,
    },

    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(String),

    #[error("failed to sign request: {0}")]
    Signing(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MacieError {
    /// Service error code, if the service answered with one
    pub fn code(&self) -> Option<&str> {
        match self {
            MacieError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationType {
    pub one_time: String,
    pub continuous: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationTypeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Resource {
    pub bucket_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ResourceClassification {
    pub bucket_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub classification_type: ClassificationType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ResourceClassificationUpdate {
    pub bucket_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub classification_type_update: ClassificationTypeUpdate,
}

/// An S3 resource the service could not process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedS3Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_item: Option<S3Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl fmt::Display for FailedS3Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error_code.as_deref().unwrap_or("UnknownError"),
            self.error_message.as_deref().unwrap_or("no error message")
        )?;
        if let Some(item) = &self.failed_item {
            write!(f, " (bucket: {}", item.bucket_name)?;
            if let Some(prefix) = &item.prefix {
                write!(f, ", prefix: {}", prefix)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateS3ResourcesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account_id: Option<String>,
    pub s3_resources: Vec<S3ResourceClassification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateS3ResourcesOutput {
    #[serde(default)]
    pub failed_s3_resources: Vec<FailedS3Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisassociateS3ResourcesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account_id: Option<String>,
    pub associated_s3_resources: Vec<S3Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisassociateS3ResourcesOutput {
    #[serde(default)]
    pub failed_s3_resources: Vec<FailedS3Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListS3ResourcesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListS3ResourcesOutput {
    #[serde(default)]
    pub s3_resources: Vec<S3ResourceClassification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateS3ResourcesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_account_id: Option<String>,
    pub s3_resources_update: Vec<S3ResourceClassificationUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateS3ResourcesOutput {
    #[serde(default)]
    pub failed_s3_resources: Vec<FailedS3Resource>,
}

pub type MacieResult<T> = Result<T, MacieError>;

/// The Macie operations used by the S3 bucket association resource
pub trait MacieApi: Send + Sync {
    fn associate_s3_resources(
        &self,
        input: AssociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<AssociateS3ResourcesOutput>>;

    fn disassociate_s3_resources(
        &self,
        input: DisassociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<DisassociateS3ResourcesOutput>>;

    /// One page of associated S3 resources
    fn list_s3_resources(
        &self,
        input: ListS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<ListS3ResourcesOutput>>;

    fn update_s3_resources(
        &self,
        input: UpdateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<UpdateS3ResourcesOutput>>;
}
