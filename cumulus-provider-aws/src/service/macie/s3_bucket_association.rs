//! `aws_macie_s3_bucket_association` - associates an S3 bucket (and optional
//! prefix) with Macie classic for classification.
//!
//! The association has no identifier of its own; it is found again by listing
//! the associated S3 resources and matching bucket name and prefix.

use std::collections::HashMap;

use cumulus_core::provider::{BoxFuture, ProviderError, ProviderResult};
use cumulus_core::resource::{Resource, ResourceId, State, Value};
use cumulus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};
use cumulus_core::service::ResourceHandler;

use super::api::*;
use crate::conns::AwsClient;

pub const TYPE_NAME: &str = "aws_macie_s3_bucket_association";

const CLASSIFICATION_TYPE: &str = "classification_type";
const CONTINUOUS: &str = "continuous";
const ONE_TIME: &str = "one_time";

const NOT_ASSOCIATED_MESSAGE: &str = "is not associated with Macie";

pub fn resource_s3_bucket_association() -> Box<dyn ResourceHandler<AwsClient>> {
    Box::new(S3BucketAssociation)
}

fn classification_type_block() -> AttributeType {
    AttributeType::Struct(vec![
        AttributeSchema::new(
            CONTINUOUS,
            types::string_enum(&[S3_CONTINUOUS_CLASSIFICATION_TYPE_FULL]),
        )
        .with_default(Value::String(
            S3_CONTINUOUS_CLASSIFICATION_TYPE_FULL.to_string(),
        )),
        AttributeSchema::new(
            ONE_TIME,
            types::string_enum(&[
                S3_ONE_TIME_CLASSIFICATION_TYPE_FULL,
                S3_ONE_TIME_CLASSIFICATION_TYPE_NONE,
            ]),
        )
        .with_default(Value::String(
            S3_ONE_TIME_CLASSIFICATION_TYPE_NONE.to_string(),
        )),
    ])
}

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(TYPE_NAME)
        .with_description("Associates an S3 resource with Amazon Macie for monitoring and data classification.")
        .attribute(
            AttributeSchema::new("bucket_name", AttributeType::String)
                .required()
                .force_new()
                .with_description("Name of the S3 bucket to associate"),
        )
        .attribute(
            AttributeSchema::new("prefix", AttributeType::String)
                .force_new()
                .with_description("Object key prefix identifying the objects to associate"),
        )
        .attribute(
            AttributeSchema::new("member_account_id", crate::types::account_id())
                .force_new()
                .with_description("ID of the Macie member account whose S3 resources are associated"),
        )
        .attribute(
            AttributeSchema::new(CLASSIFICATION_TYPE, classification_type_block())
                .computed()
                .with_description("Continuous and one-time classification settings"),
        )
}

/// Association identity: `{bucket_name}/{prefix}`, with an empty prefix when unset
pub fn association_id(bucket_name: &str, prefix: Option<&str>) -> String {
    format!("{}/{}", bucket_name, prefix.unwrap_or(""))
}

/// Bucket name and prefix encoded in an association identity
pub fn parse_association_id(id: &str) -> Option<(&str, Option<&str>)> {
    let (bucket_name, prefix) = id.split_once('/')?;
    if bucket_name.is_empty() {
        return None;
    }
    Some((bucket_name, Some(prefix).filter(|p| !p.is_empty())))
}

/// Classification type with defaults for unset fields
fn expand_classification_type(block: Option<&Value>) -> ClassificationType {
    let block = block.and_then(Value::as_map);
    let field = |name: &str, default: &str| {
        block
            .and_then(|m| m.get(name))
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    ClassificationType {
        continuous: field(CONTINUOUS, S3_CONTINUOUS_CLASSIFICATION_TYPE_FULL),
        one_time: field(ONE_TIME, S3_ONE_TIME_CLASSIFICATION_TYPE_NONE),
    }
}

fn expand_classification_type_update(block: Option<&Value>) -> ClassificationTypeUpdate {
    let expanded = expand_classification_type(block);
    ClassificationTypeUpdate {
        continuous: Some(expanded.continuous),
        one_time: Some(expanded.one_time),
    }
}

fn flatten_classification_type(classification_type: &ClassificationType) -> Value {
    let mut block = HashMap::new();
    block.insert(
        CONTINUOUS.to_string(),
        Value::String(classification_type.continuous.clone()),
    );
    block.insert(
        ONE_TIME.to_string(),
        Value::String(classification_type.one_time.clone()),
    );
    Value::Map(block)
}

fn api_error(action: &str, err: MacieError) -> ProviderError {
    ProviderError::new(format!("{} Macie S3 bucket association: {}", action, err)).with_cause(err)
}

fn failed_error(action: &str, failed: &FailedS3Resource) -> ProviderError {
    ProviderError::new(format!("{} Macie S3 bucket association: {}", action, failed))
}

fn non_empty<'a>(attributes: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The configured parts of an association
struct Target<'a> {
    bucket_name: &'a str,
    prefix: Option<&'a str>,
    member_account_id: Option<&'a str>,
}

impl<'a> Target<'a> {
    fn from_attributes(
        id: &ResourceId,
        attributes: &'a HashMap<String, Value>,
        identifier: Option<&'a str>,
    ) -> ProviderResult<Self> {
        let member_account_id = non_empty(attributes, "member_account_id");

        if let Some(bucket_name) = non_empty(attributes, "bucket_name") {
            return Ok(Self {
                bucket_name,
                prefix: non_empty(attributes, "prefix"),
                member_account_id,
            });
        }

        // Imported state carries only the identity
        match identifier.and_then(parse_association_id) {
            Some((bucket_name, prefix)) => Ok(Self {
                bucket_name,
                prefix,
                member_account_id,
            }),
            None => Err(ProviderError::new("bucket_name is required").for_resource(id.clone())),
        }
    }

    fn matches(&self, resource: &S3ResourceClassification) -> bool {
        resource.bucket_name == self.bucket_name
            && resource.prefix.as_deref().unwrap_or("") == self.prefix.unwrap_or("")
    }

    fn id(&self) -> String {
        association_id(self.bucket_name, self.prefix)
    }

    fn attributes(&self) -> HashMap<String, Value> {
        let mut attributes = HashMap::new();
        attributes.insert(
            "bucket_name".to_string(),
            Value::String(self.bucket_name.to_string()),
        );
        if let Some(prefix) = self.prefix {
            attributes.insert("prefix".to_string(), Value::String(prefix.to_string()));
        }
        if let Some(account) = self.member_account_id {
            attributes.insert(
                "member_account_id".to_string(),
                Value::String(account.to_string()),
            );
        }
        attributes
    }
}

pub struct S3BucketAssociation;

impl S3BucketAssociation {
    async fn create_association(
        &self,
        conn: &AwsClient,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let target = Target::from_attributes(&resource.id, &resource.attributes, None)?;

        let input = AssociateS3ResourcesInput {
            member_account_id: target.member_account_id.map(str::to_string),
            s3_resources: vec![S3ResourceClassification {
                bucket_name: target.bucket_name.to_string(),
                prefix: target.prefix.map(str::to_string),
                classification_type: expand_classification_type(
                    resource.attributes.get(CLASSIFICATION_TYPE),
                ),
            }],
        };

        log::debug!("Creating Macie S3 bucket association: {:?}", input);
        let output = conn
            .macie()
            .associate_s3_resources(input)
            .await
            .map_err(|e| api_error("creating", e).for_resource(resource.id.clone()))?;
        if let Some(failed) = output.failed_s3_resources.first() {
            return Err(failed_error("creating", failed).for_resource(resource.id.clone()));
        }

        let identifier = target.id();
        self.read_association(conn, &resource.id, &target.attributes(), &identifier)
            .await
    }

    async fn read_association(
        &self,
        conn: &AwsClient,
        id: &ResourceId,
        attributes: &HashMap<String, Value>,
        identifier: &str,
    ) -> ProviderResult<State> {
        let target = Target::from_attributes(id, attributes, Some(identifier))?;

        let mut input = ListS3ResourcesInput {
            member_account_id: target.member_account_id.map(str::to_string),
            ..Default::default()
        };

        let found = loop {
            log::debug!("Listing Macie S3 resources: {:?}", input);
            let page = conn
                .macie()
                .list_s3_resources(input.clone())
                .await
                .map_err(|e| {
                    ProviderError::new(format!("listing Macie S3 bucket associations: {}", e))
                        .with_cause(e)
                        .for_resource(id.clone())
                })?;

            if let Some(association) = page.s3_resources.into_iter().find(|r| target.matches(r)) {
                break Some(association);
            }
            match page.next_token {
                Some(token) if !token.is_empty() => input.next_token = Some(token),
                _ => break None,
            }
        };

        let Some(association) = found else {
            log::warn!(
                "Macie S3 bucket association ({}) not found, removing from state",
                identifier
            );
            return Ok(State::not_found(id.clone()));
        };

        let mut state_attributes = target.attributes();
        state_attributes.insert(
            CLASSIFICATION_TYPE.to_string(),
            flatten_classification_type(&association.classification_type),
        );

        Ok(State::existing(id.clone(), state_attributes).with_identifier(target.id()))
    }

    async fn update_association(
        &self,
        conn: &AwsClient,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let target = Target::from_attributes(&to.id, &to.attributes, from.identifier.as_deref())?;

        let desired = to
            .attributes
            .get(CLASSIFICATION_TYPE)
            .map(|block| flatten_classification_type(&expand_classification_type(Some(block))));
        let changed = desired.is_some() && desired.as_ref() != from.attributes.get(CLASSIFICATION_TYPE);

        if changed {
            let input = UpdateS3ResourcesInput {
                member_account_id: target.member_account_id.map(str::to_string),
                s3_resources_update: vec![S3ResourceClassificationUpdate {
                    bucket_name: target.bucket_name.to_string(),
                    prefix: target.prefix.map(str::to_string),
                    classification_type_update: expand_classification_type_update(
                        desired.as_ref(),
                    ),
                }],
            };

            log::debug!("Updating Macie S3 bucket association: {:?}", input);
            let output = conn
                .macie()
                .update_s3_resources(input)
                .await
                .map_err(|e| api_error("updating", e).for_resource(to.id.clone()))?;
            if let Some(failed) = output.failed_s3_resources.first() {
                return Err(failed_error("updating", failed).for_resource(to.id.clone()));
            }
        }

        let identifier = target.id();
        self.read_association(conn, &to.id, &target.attributes(), &identifier)
            .await
    }

    async fn delete_association(&self, conn: &AwsClient, state: &State) -> ProviderResult<()> {
        let target =
            Target::from_attributes(&state.id, &state.attributes, state.identifier.as_deref())?;

        log::debug!("Deleting Macie S3 bucket association: {}", target.id());

        let input = DisassociateS3ResourcesInput {
            member_account_id: target.member_account_id.map(str::to_string),
            associated_s3_resources: vec![S3Resource {
                bucket_name: target.bucket_name.to_string(),
                prefix: target.prefix.map(str::to_string),
            }],
        };

        let output = conn
            .macie()
            .disassociate_s3_resources(input)
            .await
            .map_err(|e| api_error("deleting", e).for_resource(state.id.clone()))?;

        if let Some(failed) = output.failed_s3_resources.first() {
            if is_not_associated(failed) {
                log::debug!(
                    "Macie S3 bucket association ({}) already removed",
                    target.id()
                );
                return Ok(());
            }
            return Err(failed_error("deleting", failed).for_resource(state.id.clone()));
        }

        Ok(())
    }
}

/// The service reports disassociating an unassociated resource as a failed item
fn is_not_associated(failed: &FailedS3Resource) -> bool {
    failed.error_code.as_deref() == Some(ERR_CODE_INVALID_INPUT_EXCEPTION)
        && failed
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains(NOT_ASSOCIATED_MESSAGE))
}

impl ResourceHandler<AwsClient> for S3BucketAssociation {
    fn schema(&self) -> ResourceSchema {
        schema()
    }

    fn read<'a>(
        &'a self,
        conn: &'a AwsClient,
        prior: &'a State,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(async move {
            let Some(identifier) = prior.identifier.as_deref() else {
                return Ok(State::not_found(prior.id.clone()));
            };
            self.read_association(conn, &prior.id, &prior.attributes, identifier)
                .await
        })
    }

    fn create<'a>(
        &'a self,
        conn: &'a AwsClient,
        resource: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(self.create_association(conn, resource))
    }

    fn update<'a>(
        &'a self,
        conn: &'a AwsClient,
        from: &'a State,
        to: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(self.update_association(conn, from, to))
    }

    fn delete<'a>(
        &'a self,
        conn: &'a AwsClient,
        state: &'a State,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.delete_association(conn, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCloudControl, FakeMacie};
    use std::sync::Arc;

    fn conn(fake: &Arc<FakeMacie>) -> AwsClient {
        AwsClient::with_clients(
            "us-east-1",
            fake.clone(),
            Arc::new(FakeCloudControl::default()),
        )
    }

    fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    fn block(continuous: &str, one_time: &str) -> Value {
        Value::Map(
            [
                (CONTINUOUS.to_string(), string(continuous)),
                (ONE_TIME.to_string(), string(one_time)),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn classification(bucket: &str, prefix: Option<&str>) -> S3ResourceClassification {
        S3ResourceClassification {
            bucket_name: bucket.to_string(),
            prefix: prefix.map(str::to_string),
            classification_type: ClassificationType {
                one_time: "NONE".to_string(),
                continuous: "FULL".to_string(),
            },
        }
    }

    #[test]
    fn identity_format() {
        assert_eq!(association_id("logs", Some("app/")), "logs/app/");
        assert_eq!(association_id("logs", None), "logs/");
        assert_eq!(parse_association_id("logs/app/"), Some(("logs", Some("app/"))));
        assert_eq!(parse_association_id("logs/"), Some(("logs", None)));
        assert_eq!(parse_association_id("logs"), None);
    }

    #[test]
    fn schema_rejects_bad_account_and_classification() {
        let schema = schema();

        let attrs: HashMap<String, Value> = [
            ("bucket_name".to_string(), string("logs")),
            ("member_account_id".to_string(), string("1234")),
        ]
        .into_iter()
        .collect();
        assert!(schema.validate(&attrs).is_err());

        let attrs: HashMap<String, Value> = [
            ("bucket_name".to_string(), string("logs")),
            (CLASSIFICATION_TYPE.to_string(), block("NONE", "NONE")),
        ]
        .into_iter()
        .collect();
        assert!(schema.validate(&attrs).is_err());

        let attrs: HashMap<String, Value> = [
            ("bucket_name".to_string(), string("logs")),
            ("member_account_id".to_string(), string("123456789012")),
            (CLASSIFICATION_TYPE.to_string(), block("FULL", "FULL")),
        ]
        .into_iter()
        .collect();
        assert!(schema.validate(&attrs).is_ok());
    }

    #[tokio::test]
    async fn create_sends_defaults_and_reads_back() {
        let fake = Arc::new(FakeMacie::default());
        let conn = conn(&fake);

        let resource =
            Resource::new(TYPE_NAME, "logs").with_attribute("bucket_name", string("my-logs"));
        let state = S3BucketAssociation.create(&conn, &resource).await.unwrap();

        let requests = fake.associate_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].member_account_id, None);
        assert_eq!(requests[0].s3_resources, vec![classification("my-logs", None)]);

        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("my-logs/"));
        assert_eq!(
            state.attributes.get(CLASSIFICATION_TYPE),
            Some(&block("FULL", "NONE"))
        );
        assert!(!state.attributes.contains_key("prefix"));
    }

    #[tokio::test]
    async fn create_passes_prefix_and_member_account() {
        let fake = Arc::new(FakeMacie::default());
        let conn = conn(&fake);

        let resource = Resource::new(TYPE_NAME, "logs")
            .with_attribute("bucket_name", string("my-logs"))
            .with_attribute("prefix", string("app/"))
            .with_attribute("member_account_id", string("123456789012"))
            .with_attribute(CLASSIFICATION_TYPE, block("FULL", "FULL"));
        let state = S3BucketAssociation.create(&conn, &resource).await.unwrap();

        let requests = fake.associate_requests();
        assert_eq!(
            requests[0].member_account_id.as_deref(),
            Some("123456789012")
        );
        assert_eq!(requests[0].s3_resources[0].prefix.as_deref(), Some("app/"));
        assert_eq!(requests[0].s3_resources[0].classification_type.one_time, "FULL");

        assert_eq!(state.identifier.as_deref(), Some("my-logs/app/"));
        assert_eq!(state.get_str("member_account_id"), Some("123456789012"));
        assert_eq!(
            fake.list_requests()[0].member_account_id.as_deref(),
            Some("123456789012")
        );
    }

    #[tokio::test]
    async fn create_fails_on_failed_item() {
        let fake = Arc::new(FakeMacie::default());
        fake.fail_next_associate(FailedS3Resource {
            failed_item: Some(S3Resource {
                bucket_name: "my-logs".to_string(),
                prefix: None,
            }),
            error_code: Some("AccessDeniedException".to_string()),
            error_message: Some("no access".to_string()),
        });
        let conn = conn(&fake);

        let resource =
            Resource::new(TYPE_NAME, "logs").with_attribute("bucket_name", string("my-logs"));
        let err = S3BucketAssociation
            .create(&conn, &resource)
            .await
            .unwrap_err();

        assert_eq!(
            err.message,
            "creating Macie S3 bucket association: AccessDeniedException: no access (bucket: my-logs)"
        );
        assert!(fake.list_requests().is_empty());
    }

    #[tokio::test]
    async fn create_reports_api_error() {
        let fake = Arc::new(FakeMacie::default());
        fake.error_next("AccessDeniedException", "denied");
        let conn = conn(&fake);

        let resource =
            Resource::new(TYPE_NAME, "logs").with_attribute("bucket_name", string("my-logs"));
        let err = S3BucketAssociation
            .create(&conn, &resource)
            .await
            .unwrap_err();
        assert_eq!(
            err.message,
            "creating Macie S3 bucket association: AccessDeniedException: denied"
        );
    }

    #[tokio::test]
    async fn read_pages_until_found() {
        let fake = Arc::new(FakeMacie::with_page_size(2));
        for i in 0..5 {
            fake.insert(None, classification(&format!("bucket-{}", i), None));
        }
        fake.insert(None, classification("target", Some("data/")));
        fake.insert(None, classification("after", None));
        let conn = conn(&fake);

        let prior = State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("target/data/");
        let state = S3BucketAssociation.read(&conn, &prior).await.unwrap();

        assert!(state.exists);
        assert_eq!(state.get_str("bucket_name"), Some("target"));
        assert_eq!(state.get_str("prefix"), Some("data/"));
        // target sits on the third page; the fourth is never requested
        assert_eq!(fake.list_requests().len(), 3);
    }

    #[tokio::test]
    async fn read_treats_absent_prefix_as_empty() {
        let fake = Arc::new(FakeMacie::default());
        fake.insert(None, classification("logs", Some("")));
        let conn = conn(&fake);

        let attrs: HashMap<String, Value> =
            [("bucket_name".to_string(), string("logs"))].into_iter().collect();
        let prior = State::existing(ResourceId::new(TYPE_NAME, "t"), attrs).with_identifier("logs/");
        let state = S3BucketAssociation.read(&conn, &prior).await.unwrap();
        assert!(state.exists);
    }

    #[tokio::test]
    async fn read_reports_missing_association() {
        let fake = Arc::new(FakeMacie::with_page_size(1));
        fake.insert(None, classification("other", None));
        fake.insert(None, classification("logs", Some("app/")));
        let conn = conn(&fake);

        let prior = State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/");
        let state = S3BucketAssociation.read(&conn, &prior).await.unwrap();

        assert!(!state.exists);
        assert_eq!(fake.list_requests().len(), 2);
    }

    #[tokio::test]
    async fn read_reports_list_error() {
        let fake = Arc::new(FakeMacie::default());
        fake.error_next("InternalException", "boom");
        let conn = conn(&fake);

        let prior = State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/");
        let err = S3BucketAssociation.read(&conn, &prior).await.unwrap_err();
        assert_eq!(
            err.message,
            "listing Macie S3 bucket associations: InternalException: boom"
        );
    }

    #[tokio::test]
    async fn update_skipped_when_classification_unchanged() {
        let fake = Arc::new(FakeMacie::default());
        fake.insert(None, classification("logs", None));
        let conn = conn(&fake);

        let from = S3BucketAssociation
            .read(
                &conn,
                &State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/"),
            )
            .await
            .unwrap();

        // Omitted block and an explicit block equal to the defaults are both no-ops
        let to = Resource::new(TYPE_NAME, "t").with_attribute("bucket_name", string("logs"));
        S3BucketAssociation.update(&conn, &from, &to).await.unwrap();
        let to = to.with_attribute(
            CLASSIFICATION_TYPE,
            Value::Map([(ONE_TIME.to_string(), string("NONE"))].into_iter().collect()),
        );
        S3BucketAssociation.update(&conn, &from, &to).await.unwrap();

        assert!(fake.update_requests().is_empty());
    }

    #[tokio::test]
    async fn update_sends_classification_change() {
        let fake = Arc::new(FakeMacie::default());
        fake.insert(None, classification("logs", Some("app/")));
        let conn = conn(&fake);

        let from = S3BucketAssociation
            .read(
                &conn,
                &State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/app/"),
            )
            .await
            .unwrap();
        let to = Resource::new(TYPE_NAME, "t")
            .with_attribute("bucket_name", string("logs"))
            .with_attribute("prefix", string("app/"))
            .with_attribute(
                CLASSIFICATION_TYPE,
                Value::Map([(ONE_TIME.to_string(), string("FULL"))].into_iter().collect()),
            );

        let state = S3BucketAssociation.update(&conn, &from, &to).await.unwrap();

        let requests = fake.update_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].s3_resources_update,
            vec![S3ResourceClassificationUpdate {
                bucket_name: "logs".to_string(),
                prefix: Some("app/".to_string()),
                classification_type_update: ClassificationTypeUpdate {
                    one_time: Some("FULL".to_string()),
                    continuous: Some("FULL".to_string()),
                },
            }]
        );
        assert_eq!(
            state.attributes.get(CLASSIFICATION_TYPE),
            Some(&block("FULL", "FULL"))
        );
    }

    async fn update_fixture(fake: &Arc<FakeMacie>) -> (State, Resource) {
        fake.insert(None, classification("logs", None));
        let from = S3BucketAssociation
            .read(
                &conn(fake),
                &State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/"),
            )
            .await
            .unwrap();
        let to = Resource::new(TYPE_NAME, "t")
            .with_attribute("bucket_name", string("logs"))
            .with_attribute(CLASSIFICATION_TYPE, block("FULL", "FULL"));
        (from, to)
    }

    #[tokio::test]
    async fn update_reports_api_error() {
        let fake = Arc::new(FakeMacie::default());
        let (from, to) = update_fixture(&fake).await;
        let lists_before = fake.list_requests().len();
        fake.error_next("InternalException", "boom");

        let err = S3BucketAssociation
            .update(&conn(&fake), &from, &to)
            .await
            .unwrap_err();

        assert_eq!(
            err.message,
            "updating Macie S3 bucket association: InternalException: boom"
        );
        assert_eq!(fake.update_requests().len(), 1);
        assert_eq!(fake.list_requests().len(), lists_before);
    }

    #[tokio::test]
    async fn update_fails_on_failed_item_without_reading() {
        let fake = Arc::new(FakeMacie::default());
        let (from, to) = update_fixture(&fake).await;
        let lists_before = fake.list_requests().len();
        fake.fail_next_update(FailedS3Resource {
            failed_item: Some(S3Resource {
                bucket_name: "logs".to_string(),
                prefix: None,
            }),
            error_code: Some("AccessDeniedException".to_string()),
            error_message: Some("Not authorized.".to_string()),
        });

        let err = S3BucketAssociation
            .update(&conn(&fake), &from, &to)
            .await
            .unwrap_err();

        assert_eq!(
            err.message,
            "updating Macie S3 bucket association: AccessDeniedException: Not authorized. (bucket: logs)"
        );
        assert_eq!(err.resource_id, Some(ResourceId::new(TYPE_NAME, "t")));
        assert_eq!(fake.list_requests().len(), lists_before);
    }

    #[tokio::test]
    async fn empty_prefix_settles_after_create() {
        let fake = Arc::new(FakeMacie::default());
        let desired = Resource::new(TYPE_NAME, "logs")
            .with_attribute("bucket_name", string("logs"))
            .with_attribute("prefix", string(""));

        let state = S3BucketAssociation
            .create(&conn(&fake), &desired)
            .await
            .unwrap();

        assert_eq!(state.identifier.as_deref(), Some("logs/"));
        assert!(!cumulus_core::differ::diff(&desired, &state, &schema()).is_change());
    }

    #[tokio::test]
    async fn delete_disassociates() {
        let fake = Arc::new(FakeMacie::default());
        fake.insert(Some("123456789012"), classification("logs", Some("app/")));
        let conn = conn(&fake);

        let attrs: HashMap<String, Value> = [
            ("bucket_name".to_string(), string("logs")),
            ("prefix".to_string(), string("app/")),
            ("member_account_id".to_string(), string("123456789012")),
        ]
        .into_iter()
        .collect();
        let state =
            State::existing(ResourceId::new(TYPE_NAME, "t"), attrs).with_identifier("logs/app/");

        S3BucketAssociation.delete(&conn, &state).await.unwrap();

        let requests = fake.disassociate_requests();
        assert_eq!(
            requests[0].member_account_id.as_deref(),
            Some("123456789012")
        );
        assert_eq!(
            requests[0].associated_s3_resources,
            vec![S3Resource {
                bucket_name: "logs".to_string(),
                prefix: Some("app/".to_string()),
            }]
        );
        assert!(fake.is_empty());
    }

    #[tokio::test]
    async fn delete_tolerates_already_disassociated() {
        let fake = Arc::new(FakeMacie::default());
        let conn = conn(&fake);

        let state = State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("gone/");
        S3BucketAssociation.delete(&conn, &state).await.unwrap();
        assert_eq!(fake.disassociate_requests().len(), 1);
    }

    #[tokio::test]
    async fn delete_surfaces_other_failures() {
        let fake = Arc::new(FakeMacie::default());
        fake.fail_next_disassociate(FailedS3Resource {
            failed_item: None,
            error_code: Some(ERR_CODE_INVALID_INPUT_EXCEPTION.to_string()),
            error_message: Some("The bucket name is invalid.".to_string()),
        });
        let conn = conn(&fake);

        let state = State::not_found(ResourceId::new(TYPE_NAME, "t")).with_identifier("logs/");
        let err = S3BucketAssociation.delete(&conn, &state).await.unwrap_err();
        assert_eq!(
            err.message,
            "deleting Macie S3 bucket association: InvalidInputException: The bucket name is invalid."
        );
    }

    #[test]
    fn not_associated_requires_code_and_message() {
        let failed = |code: &str, message: &str| FailedS3Resource {
            failed_item: None,
            error_code: Some(code.to_string()),
            error_message: Some(message.to_string()),
        };
        assert!(is_not_associated(&failed(
            "InvalidInputException",
            "The request was rejected. The specified S3 resource (bucket or prefix) is not associated with Macie."
        )));
        assert!(!is_not_associated(&failed(
            "AccessDeniedException",
            "is not associated with Macie"
        )));
        assert!(!is_not_associated(&failed("InvalidInputException", "bad bucket")));
    }
}
