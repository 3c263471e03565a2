//! HTTP client for the Macie (classic) JSON 1.1 API
//!
//! Requests are POSTed to the regional endpoint with an `X-Amz-Target` header
//! naming the operation and are signed with SigV4.

use std::time::SystemTime;

use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningParams, SigningSettings, sign};
use aws_sigv4::sign::v4;
use cumulus_core::provider::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::*;
use crate::config::ConfigError;

const TARGET_PREFIX: &str = "MacieService";
const SIGNING_NAME: &str = "macie";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Maximum length of an unparseable error body kept in the error message
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Macie API client over HTTPS
#[derive(Clone)]
pub struct HttpMacieClient {
    http: reqwest::Client,
    endpoint: String,
    region: String,
    credentials: SharedCredentialsProvider,
}

impl HttpMacieClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        region: impl Into<String>,
        credentials: SharedCredentialsProvider,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            region: region.into(),
            credentials,
        }
    }

    /// Build a client from the shared SDK configuration
    pub fn from_sdk_config(
        config: &SdkConfig,
        endpoint_override: Option<&str>,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .ok_or(ConfigError::MissingRegion)?;
        let credentials = config
            .credentials_provider()
            .ok_or(ConfigError::MissingCredentials)?;
        let endpoint = endpoint_override
            .map(str::to_string)
            .unwrap_or_else(|| endpoint_for_region(&region));

        Ok(Self::new(http, endpoint, region, credentials))
    }

    async fn call<I, O>(&self, operation: &str, input: &I) -> MacieResult<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input)?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let auth_headers = self.signed_headers(&target, &body).await?;

        log::debug!("POST {} ({})", self.endpoint, target);

        let mut request = self
            .http
            .post(&self.endpoint)
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target);
        for (name, value) in auth_headers {
            request = request.header(name, value);
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = parse_error(status.as_u16(), error_type.as_deref(), &bytes);
            log::debug!("{} failed: {}", target, err);
            return Err(err);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// SigV4 headers (authorization, date, security token) for one request
    async fn signed_headers(&self, target: &str, body: &[u8]) -> MacieResult<Vec<(String, String)>> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| MacieError::Credentials(e.to_string()))?;
        let identity = credentials.into();

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| MacieError::Signing(e.to_string()))?
            .into();

        let headers = [("content-type", CONTENT_TYPE), ("x-amz-target", target)];
        let signable = SignableRequest::new(
            "POST",
            self.endpoint.as_str(),
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| MacieError::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| MacieError::Signing(e.to_string()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

/// Default regional endpoint
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://macie.{}.amazonaws.com/", region)
}

/// Turn a non-2xx response into a service error.
///
/// The code comes from the `x-amzn-ErrorType` header or the `__type` body
/// field, with any namespace (`ns#Code`) and trailing URI (`Code:uri`) removed.
fn parse_error(status: u16, error_type: Option<&str>, body: &[u8]) -> MacieError {
    let json: Option<serde_json::Value> = serde_json::from_slice(body).ok();

    let raw_code = error_type
        .map(str::to_string)
        .or_else(|| {
            json.as_ref()
                .and_then(|j| j.get("__type"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Http{}", status));
    let code = sanitize_error_code(&raw_code);

    let message = json
        .as_ref()
        .and_then(|j| j.get("message").or_else(|| j.get("Message")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            if text.len() > MAX_ERROR_BODY_LENGTH {
                let mut end = MAX_ERROR_BODY_LENGTH;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &text[..end])
            } else {
                text.into_owned()
            }
        });

    MacieError::Service {
        code,
        message,
        status,
    }
}

fn sanitize_error_code(raw: &str) -> String {
    let without_uri = raw.split(':').next().unwrap_or(raw);
    without_uri
        .rsplit('#')
        .next()
        .unwrap_or(without_uri)
        .to_string()
}

impl MacieApi for HttpMacieClient {
    fn associate_s3_resources(
        &self,
        input: AssociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<AssociateS3ResourcesOutput>> {
        Box::pin(async move { self.call("AssociateS3Resources", &input).await })
    }

    fn disassociate_s3_resources(
        &self,
        input: DisassociateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<DisassociateS3ResourcesOutput>> {
        Box::pin(async move { self.call("DisassociateS3Resources", &input).await })
    }

    fn list_s3_resources(
        &self,
        input: ListS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<ListS3ResourcesOutput>> {
        Box::pin(async move { self.call("ListS3Resources", &input).await })
    }

    fn update_s3_resources(
        &self,
        input: UpdateS3ResourcesInput,
    ) -> BoxFuture<'_, MacieResult<UpdateS3ResourcesOutput>> {
        Box::pin(async move { self.call("UpdateS3Resources", &input).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regional_endpoint() {
        assert_eq!(
            endpoint_for_region("us-west-2"),
            "https://macie.us-west-2.amazonaws.com/"
        );
    }

    #[test]
    fn error_code_from_body_type() {
        let err = parse_error(
            400,
            None,
            br#"{"__type": "com.amazonaws.macie#InvalidInputException", "message": "bad"}"#,
        );
        assert_eq!(err.code(), Some("InvalidInputException"));
        assert_eq!(err.to_string(), "InvalidInputException: bad");
    }

    #[test]
    fn error_code_header_wins() {
        let err = parse_error(
            403,
            Some("AccessDeniedException:http://internal.amazon.com/coral/"),
            br#"{"__type": "Other", "Message": "denied"}"#,
        );
        assert_eq!(err.code(), Some("AccessDeniedException"));
        assert!(err.to_string().ends_with("denied"));
    }

    #[test]
    fn unparseable_error_body_is_kept_as_message() {
        let err = parse_error(502, None, b"Bad Gateway");
        match err {
            MacieError::Service {
                code,
                message,
                status,
            } => {
                assert_eq!(code, "Http502");
                assert_eq!(message, "Bad Gateway");
                assert_eq!(status, 502);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
