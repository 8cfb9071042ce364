use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{TencentAuth, TC3_CONTENT_TYPE};
use crate::config::{ClientProfile, Credential, SignMethod};
use crate::error::{Result, TencentCloudError};

/// Cloud API 3.0 product a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudService {
    Sms,
    Live,
}

impl CloudService {
    pub fn name(&self) -> &'static str {
        match self {
            CloudService::Sms => "sms",
            CloudService::Live => "live",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            CloudService::Sms => "2019-07-11",
            CloudService::Live => "2018-08-01",
        }
    }
}

/// Error object carried inside `Response.Error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudApiError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

// Every API 3.0 answer is wrapped as {"Response": {...}}
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Value,
}

/// Client for Tencent Cloud API 3.0 (SMS, Live)
#[derive(Clone)]
pub struct CloudClient {
    inner: Arc<CloudClientInner>,
}

struct CloudClientInner {
    client: Client,
    service: CloudService,
    credential: Credential,
    region: String,
    profile: ClientProfile,
    host: String,
}

impl CloudClient {
    /// Create a client for `service` in `region`
    pub fn new(
        service: CloudService,
        credential: Credential,
        region: impl Into<String>,
        profile: ClientProfile,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(profile.http_profile.req_timeout)
            .build()?;
        let host = profile
            .http_profile
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("{}.tencentcloudapi.com", service.name()));

        Ok(Self {
            inner: Arc::new(CloudClientInner {
                client,
                service,
                credential,
                region: region.into(),
                profile,
                host,
            }),
        })
    }

    pub fn service(&self) -> CloudService {
        self.inner.service
    }

    pub fn region(&self) -> &str {
        &self.inner.region
    }

    /// Invoke `action` with a JSON payload and decode `Response` into `T`.
    ///
    /// A populated `Response.Error` is returned as [`TencentCloudError::Api`].
    pub async fn call<T: DeserializeOwned>(&self, action: &str, payload: &Value) -> Result<T> {
        let inner = &self.inner;
        let body = serde_json::to_string(payload)?;
        let timestamp = TencentAuth::get_timestamp();
        let authorization = match inner.profile.sign_method {
            SignMethod::Tc3HmacSha256 => TencentAuth::tc3_authorization(
                inner.credential.secret_id(),
                inner.credential.secret_key(),
                inner.service.name(),
                &inner.host,
                timestamp,
                &body,
            ),
        };
        let url = format!("{}{}/", inner.profile.http_profile.protocol, inner.host);

        info!("Calling {} action {}", inner.service.name(), action);
        if inner.profile.debug {
            debug!("API URL: {}, payload: {}", url, body);
        }

        let mut request = inner
            .client
            .post(&url)
            .header("Content-Type", TC3_CONTENT_TYPE)
            .header("Host", &inner.host)
            .header("Authorization", authorization)
            .header("X-TC-Action", action)
            .header("X-TC-Version", inner.service.version())
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Region", &inner.region)
            .body(body);

        if let Some(language) = inner.profile.language {
            request = request.header("X-TC-Language", language.as_str());
        }

        let res = request.send().await?;
        let status = res.status();
        info!("Response received with status: {}", status);

        let text = res.text().await?;
        if inner.profile.debug {
            debug!("Response body: {}", text);
        }
        if !status.is_success() {
            return Err(TencentCloudError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: Envelope = serde_json::from_str(&text)?;
        if let Some(error) = envelope.response.get("Error") {
            let error: CloudApiError = serde_json::from_value(error.clone())?;
            let request_id = envelope
                .response
                .get("RequestId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(TencentCloudError::Api {
                code: error.code,
                message: error.message,
                request_id,
            });
        }

        Ok(serde_json::from_value(envelope.response)?)
    }
}
