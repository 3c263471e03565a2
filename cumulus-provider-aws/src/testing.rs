//! In-memory fakes of the service APIs

use std::collections::HashMap;
use std::sync::Mutex;

use cumulus_core::provider::{BoxFuture, ProviderResult};

use crate::cloudcontrol::CloudControlApi;
use crate::service::macie::api::*;

const NOT_ASSOCIATED: &str =
    "The request was rejected. The specified S3 resource (bucket or prefix) is not associated with Macie.";

#[derive(Default)]
struct MacieState {
    /// (member account, association)
    associations: Vec<(Option<String>, S3ResourceClassification)>,
    error: Option<MacieError>,
    associate_failure: Option<FailedS3Resource>,
    disassociate_failure: Option<FailedS3Resource>,
    update_failure: Option<FailedS3Resource>,
    associate_requests: Vec<AssociateS3ResourcesInput>,
    disassociate_requests: Vec<DisassociateS3ResourcesInput>,
    list_requests: Vec<ListS3ResourcesInput>,
    update_requests: Vec<UpdateS3ResourcesInput>,
}

/// Macie classic S3 associations kept in memory
#[derive(Default)]
pub struct FakeMacie {
    state: Mutex<MacieState>,
    page_size: Option<usize>,
}

fn same_resource(a: &S3ResourceClassification, bucket: &str, prefix: Option<&str>) -> bool {
    a.bucket_name == bucket && a.prefix.as_deref().unwrap_or("") == prefix.unwrap_or("")
}

impl FakeMacie {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn insert(&self, member_account_id: Option<&str>, association: S3ResourceClassification) {
        self.state
            .lock()
            .unwrap()
            .associations
            .push((member_account_id.map(str::to_string), association));
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().associations.is_empty()
    }

    /// Fail the next call with a service error
    pub fn error_next(&self, code: &str, message: &str) {
        self.state.lock().unwrap().error = Some(MacieError::Service {
            code: code.to_string(),
            message: message.to_string(),
            status: 400,
        });
    }

    pub fn fail_next_associate(&self, failed: FailedS3Resource) {
        self.state.lock().unwrap().associate_failure = Some(failed);
    }

    pub fn fail_next_disassociate(&self, failed: FailedS3Resource) {
        self.state.lock().unwrap().disassociate_failure = Some(failed);
    }

    pub fn fail_next_update(&self, failed: FailedS3Resource) {
        self.state.lock().unwrap().update_failure = Some(failed);
    }

    pub fn associate_requests(&self) -> Vec<AssociateS3ResourcesInput> {
        self.state.lock().unwrap().associate_requests.clone()
    }

    pub fn disassociate_requests(&self) -> Vec<DisassociateS3ResourcesInput> {
        self.state.lock().unwrap().disassociate_requests.clone()
    }

    pub fn list_requests(&self) -> Vec<ListS3ResourcesInput> {
        self.state.lock().unwrap().list_requests.clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateS3ResourcesInput> {
        self.state.lock().unwrap().update_requests.clone()
    }
}

impl MacieApi for FakeMacie {
    fn associate_s3_resources(
        &self,
        input: AssociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<AssociateS3ResourcesOutput>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.associate_requests.push(input.clone());
            if let Some(err) = state.error.take() {
                return Err(err);
            }
            if let Some(failed) = state.associate_failure.take() {
                return Ok(AssociateS3ResourcesOutput {
                    failed_s3_resources: vec![failed],
                });
            }
            for resource in input.s3_resources {
                state
                    .associations
                    .push((input.member_account_id.clone(), resource));
            }
            Ok(AssociateS3ResourcesOutput::default())
        })
    }

    fn disassociate_s3_resources(
        &self,
        input: DisassociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<DisassociateS3ResourcesOutput>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.disassociate_requests.push(input.clone());
            if let Some(err) = state.error.take() {
                return Err(err);
            }
            if let Some(failed) = state.disassociate_failure.take() {
                return Ok(DisassociateS3ResourcesOutput {
                    failed_s3_resources: vec![failed],
                });
            }

            let mut failed_s3_resources = Vec::new();
            for resource in input.associated_s3_resources {
                let before = state.associations.len();
                state.associations.retain(|(account, a)| {
                    !(account == &input.member_account_id
                        && same_resource(a, &resource.bucket_name, resource.prefix.as_deref()))
                });
                if state.associations.len() == before {
                    failed_s3_resources.push(FailedS3Resource {
                        failed_item: Some(resource),
                        error_code: Some(ERR_CODE_INVALID_INPUT_EXCEPTION.to_string()),
                        error_message: Some(NOT_ASSOCIATED.to_string()),
                    });
                }
            }
            Ok(DisassociateS3ResourcesOutput {
                failed_s3_resources,
            })
        })
    }

    fn list_s3_resources(
        &self,
        input: ListS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<ListS3ResourcesOutput>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.list_requests.push(input.clone());
            if let Some(err) = state.error.take() {
                return Err(err);
            }

            let matching: Vec<S3ResourceClassification> = state
                .associations
                .iter()
                .filter(|(account, _)| account == &input.member_account_id)
                .map(|(_, a)| a.clone())
                .collect();

            let start: usize = input
                .next_token
                .as_deref()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0);
            let end = match self.page_size {
                Some(size) => (start + size).min(matching.len()),
                None => matching.len(),
            };

            Ok(ListS3ResourcesOutput {
                s3_resources: matching[start..end].to_vec(),
                next_token: (end < matching.len()).then(|| end.to_string()),
            })
        })
    }

    fn update_s3_resources(
        &self,
        input: UpdateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<UpdateS3ResourcesOutput>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.update_requests.push(input.clone());
            if let Some(err) = state.error.take() {
                return Err(err);
            }
            if let Some(failed) = state.update_failure.take() {
                return Ok(UpdateS3ResourcesOutput {
                    failed_s3_resources: vec![failed],
                });
            }

            let mut failed_s3_resources = Vec::new();
            for update in input.s3_resources_update {
                let existing = state.associations.iter_mut().find(|(account, a)| {
                    account == &input.member_account_id
                        && same_resource(a, &update.bucket_name, update.prefix.as_deref())
                });
                match existing {
                    Some((_, a)) => {
                        let change = &update.classification_type_update;
                        if let Some(one_time) = &change.one_time {
                            a.classification_type.one_time = one_time.clone();
                        }
                        if let Some(continuous) = &change.continuous {
                            a.classification_type.continuous = continuous.clone();
                        }
                    }
                    None => failed_s3_resources.push(FailedS3Resource {
                        failed_item: Some(S3Resource {
                            bucket_name: update.bucket_name.clone(),
                            prefix: update.prefix.clone(),
                        }),
                        error_code: Some(ERR_CODE_INVALID_INPUT_EXCEPTION.to_string()),
                        error_message: Some(NOT_ASSOCIATED.to_string()),
                    }),
                }
            }
            Ok(UpdateS3ResourcesOutput {
                failed_s3_resources,
            })
        })
    }
}

#[derive(Default)]
struct CloudControlState {
    resources: HashMap<String, serde_json::Value>,
    created: Vec<(String, serde_json::Value)>,
    patches: Vec<Vec<serde_json::Value>>,
    deleted: Vec<String>,
    next_id: u32,
}

/// Cloud Control resources kept in memory, keyed by identifier
#[derive(Default)]
pub struct FakeCloudControl {
    state: Mutex<CloudControlState>,
}

impl FakeCloudControl {
    pub fn insert(&self, identifier: &str, properties: serde_json::Value) {
        self.state
            .lock()
            .unwrap()
            .resources
            .insert(identifier.to_string(), properties);
    }

    /// (CloudFormation type, desired state) of every create call
    pub fn created(&self) -> Vec<(String, serde_json::Value)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn patches(&self) -> Vec<Vec<serde_json::Value>> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

impl CloudControlApi for FakeCloudControl {
    fn get_resource<'a>(
        &'a self,
        _type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<serde_json::Value>>> {
        Box::pin(async move { Ok(self.state.lock().unwrap().resources.get(identifier).cloned()) })
    }

    fn create_resource<'a>(
        &'a self,
        type_name: &'a str,
        desired_state: serde_json::Value,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let identifier = format!("id-{}", state.next_id);
            state
                .created
                .push((type_name.to_string(), desired_state.clone()));
            state.resources.insert(identifier.clone(), desired_state);
            Ok(identifier)
        })
    }

    fn update_resource<'a>(
        &'a self,
        _type_name: &'a str,
        identifier: &'a str,
        patch_ops: Vec<serde_json::Value>,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if let Some(serde_json::Value::Object(props)) = state.resources.get_mut(identifier) {
                for op in &patch_ops {
                    let Some(key) = op["path"].as_str().and_then(|p| p.strip_prefix('/')) else {
                        continue;
                    };
                    match op["op"].as_str() {
                        Some("add") | Some("replace") => {
                            props.insert(key.to_string(), op["value"].clone());
                        }
                        Some("remove") => {
                            props.remove(key);
                        }
                        _ => {}
                    }
                }
            }
            state.patches.push(patch_ops);
            Ok(())
        })
    }

    fn delete_resource<'a>(
        &'a self,
        _type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.resources.remove(identifier);
            state.deleted.push(identifier.to_string());
            Ok(())
        })
    }
}
