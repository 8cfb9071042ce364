//! Tencent Instant Messaging (TIM) REST API.
//!
//! [`TimTemplate`] owns the HTTP client and the administrator signature and
//! executes requests; the operation groups ([`AccountOperations`],
//! [`SnsOperations`], [`AllMemberPushOperations`]) assemble the payloads.
//!
//! Business failures reported by the IM backend are logged and handed back
//! as the response; only transport and decoding problems become `Err`.

pub mod account;
pub mod models;
pub mod push;
pub mod sns;

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::auth::TencentAuth;
use crate::config::TimProperties;
use crate::error::{Result, TencentCloudError};

pub use account::AccountOperations;
pub use models::{ApiResponse, TimResponse};
pub use push::{AllMemberPush, AllMemberPushOperations};
pub use sns::SnsOperations;

/// IM REST endpoints, relative to `{endpoint}/v4/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimApi {
    AccountImport,
    MultiAccountImport,
    AccountDelete,
    AccountCheck,
    AccountKick,
    AccountState,
    FriendAdd,
    FriendImport,
    FriendUpdate,
    FriendDelete,
    FriendDeleteAll,
    FriendCheck,
    FriendGet,
    FriendGetList,
    BlacklistAdd,
    BlacklistDelete,
    BlacklistGet,
    ImPush,
    ImSetAttrName,
    ImGetAttrName,
    ImGetAttr,
    ImSetAttr,
    ImRemoveAttr,
    ImGetTag,
    ImAddTag,
    ImRemoveTag,
    ImRemoveAllTags,
}

impl TimApi {
    pub fn path(&self) -> &'static str {
        match self {
            TimApi::AccountImport => "im_open_login_svc/account_import",
            TimApi::MultiAccountImport => "im_open_login_svc/multiaccount_import",
            TimApi::AccountDelete => "im_open_login_svc/account_delete",
            TimApi::AccountCheck => "im_open_login_svc/account_check",
            TimApi::AccountKick => "im_open_login_svc/kick",
            TimApi::AccountState => "openim/querystate",
            TimApi::FriendAdd => "sns/friend_add",
            TimApi::FriendImport => "sns/friend_import",
            TimApi::FriendUpdate => "sns/friend_update",
            TimApi::FriendDelete => "sns/friend_delete",
            TimApi::FriendDeleteAll => "sns/friend_delete_all",
            TimApi::FriendCheck => "sns/friend_check",
            TimApi::FriendGet => "sns/friend_get",
            TimApi::FriendGetList => "sns/friend_get_list",
            TimApi::BlacklistAdd => "sns/black_list_add",
            TimApi::BlacklistDelete => "sns/black_list_delete",
            TimApi::BlacklistGet => "sns/black_list_get",
            TimApi::ImPush => "all_member_push/im_push",
            TimApi::ImSetAttrName => "all_member_push/im_set_attr_name",
            TimApi::ImGetAttrName => "all_member_push/im_get_attr_name",
            TimApi::ImGetAttr => "all_member_push/im_get_attr",
            TimApi::ImSetAttr => "all_member_push/im_set_attr",
            TimApi::ImRemoveAttr => "all_member_push/im_remove_attr",
            TimApi::ImGetTag => "all_member_push/im_get_tag",
            TimApi::ImAddTag => "all_member_push/im_add_tag",
            TimApi::ImRemoveTag => "all_member_push/im_remove_tag",
            TimApi::ImRemoveAllTags => "all_member_push/im_remove_all_tags",
        }
    }

    /// Human readable action name used in failure logs
    pub fn description(&self) -> &'static str {
        match self {
            TimApi::AccountImport => "import account",
            TimApi::MultiAccountImport => "import accounts",
            TimApi::AccountDelete => "delete accounts",
            TimApi::AccountCheck => "check accounts",
            TimApi::AccountKick => "invalidate account login state",
            TimApi::AccountState => "query account online state",
            TimApi::FriendAdd => "add friends",
            TimApi::FriendImport => "import friends",
            TimApi::FriendUpdate => "update friends",
            TimApi::FriendDelete => "delete friends",
            TimApi::FriendDeleteAll => "delete all friends",
            TimApi::FriendCheck => "check friends",
            TimApi::FriendGet => "pull friends",
            TimApi::FriendGetList => "pull friend profiles",
            TimApi::BlacklistAdd => "add to blacklist",
            TimApi::BlacklistDelete => "remove from blacklist",
            TimApi::BlacklistGet => "pull blacklist",
            TimApi::ImPush => "push to all members",
            TimApi::ImSetAttrName => "set app attribute names",
            TimApi::ImGetAttrName => "get app attribute names",
            TimApi::ImGetAttr => "get user attributes",
            TimApi::ImSetAttr => "set user attributes",
            TimApi::ImRemoveAttr => "remove user attributes",
            TimApi::ImGetTag => "get user tags",
            TimApi::ImAddTag => "add user tags",
            TimApi::ImRemoveTag => "remove user tags",
            TimApi::ImRemoveAllTags => "remove all user tags",
        }
    }
}

/// Maps a business user id to the IM account it is registered as.
#[cfg_attr(test, mockall::automock)]
pub trait UserIdMapper: Send + Sync {
    fn to_im_user(&self, user_id: &str) -> String;
}

/// Default mapping: prepend a fixed prefix (identity when the prefix is empty).
#[derive(Debug, Clone, Default)]
pub struct PrefixUserIdMapper {
    prefix: String,
}

impl PrefixUserIdMapper {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl UserIdMapper for PrefixUserIdMapper {
    fn to_im_user(&self, user_id: &str) -> String {
        format!("{}{}", self.prefix, user_id)
    }
}

pub(crate) fn map_users<S: AsRef<str>>(mapper: &dyn UserIdMapper, user_ids: &[S]) -> Vec<String> {
    user_ids
        .iter()
        .map(|uid| mapper.to_im_user(uid.as_ref()))
        .collect()
}

/// Request executor for the IM REST API
#[derive(Clone)]
pub struct TimTemplate {
    inner: Arc<TimInner>,
}

struct TimInner {
    client: Client,
    properties: TimProperties,
    mapper: Arc<dyn UserIdMapper>,
    // Runtime the template was built on, used by callers outside any runtime
    runtime: Option<Handle>,
}

impl TimTemplate {
    pub fn new(properties: TimProperties) -> Result<Self> {
        let mapper = Arc::new(PrefixUserIdMapper::new(properties.user_prefix.clone()));
        Self::with_mapper(properties, mapper)
    }

    pub fn with_mapper(properties: TimProperties, mapper: Arc<dyn UserIdMapper>) -> Result<Self> {
        if properties.sdk_app_id == 0 {
            return Err(TencentCloudError::InvalidConfig {
                key: "sdk_app_id".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }

        Ok(Self {
            inner: Arc::new(TimInner {
                client: Client::builder().build()?,
                properties,
                mapper,
                runtime: Handle::try_current().ok(),
            }),
        })
    }

    pub fn account(&self) -> AccountOperations {
        AccountOperations::new(self.clone())
    }

    pub fn sns(&self) -> SnsOperations {
        SnsOperations::new(self.clone())
    }

    pub fn push(&self) -> AllMemberPushOperations {
        AllMemberPushOperations::new(self.clone())
    }

    pub fn properties(&self) -> &TimProperties {
        &self.inner.properties
    }

    pub(crate) fn mapper(&self) -> &dyn UserIdMapper {
        self.inner.mapper.as_ref()
    }

    /// Business user id to IM account
    pub fn im_user(&self, user_id: &str) -> String {
        self.inner.mapper.to_im_user(user_id)
    }

    pub fn endpoint_url(&self, api: TimApi) -> String {
        format!("{}/v4/{}", self.inner.properties.endpoint, api.path())
    }

    /// Fixed query parameters appended to every call
    fn default_params(&self) -> Vec<(&'static str, String)> {
        let properties = &self.inner.properties;
        let user_sig = TencentAuth::generate_user_sig(
            properties.sdk_app_id,
            &properties.secret_key,
            &properties.identifier,
            properties.expire,
            TencentAuth::get_timestamp(),
        );

        vec![
            ("sdkappid", properties.sdk_app_id.to_string()),
            ("identifier", properties.identifier.clone()),
            ("usersig", user_sig),
            ("random", TencentAuth::generate_nonce()),
            ("contenttype", "json".to_string()),
        ]
    }

    /// POST `payload` to `api` and decode the body into `R`.
    pub async fn request<R: DeserializeOwned>(&self, api: TimApi, payload: &Value) -> Result<R> {
        let url = self.endpoint_url(api);

        info!("Making request to {}", api.path());
        debug!("API URL: {}, payload: {}", url, payload);

        let res = self
            .inner
            .client
            .post(&url)
            .query(&self.default_params())
            .json(payload)
            .send()
            .await?;
        let status = res.status();
        info!("Response received with status: {}", status);

        let text = res.text().await?;
        if !status.is_success() {
            return Err(TencentCloudError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// [`request`](Self::request) followed by the status check: a failed
    /// response is logged and still returned.
    pub async fn execute<R>(&self, api: TimApi, payload: &Value) -> Result<R>
    where
        R: DeserializeOwned + TimResponse,
    {
        let res: R = self.request(api, payload).await?;
        log_failure(api, res.status());
        Ok(res)
    }

    /// Run [`execute`](Self::execute) on the runtime without waiting and hand
    /// the outcome to `callback`.
    ///
    /// Works from any thread: the current runtime is used when there is one,
    /// otherwise the runtime the template was created on. Calls are
    /// independent, with no ordering between concurrently issued requests and
    /// no cancellation beyond aborting the handle.
    pub fn async_request<R, F>(
        &self,
        api: TimApi,
        payload: Value,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        R: DeserializeOwned + TimResponse + Send + 'static,
        F: FnOnce(Result<R>) + Send + 'static,
    {
        let runtime = Handle::try_current()
            .ok()
            .or_else(|| self.inner.runtime.clone())
            .ok_or(TencentCloudError::NoRuntime)?;

        let template = self.clone();
        Ok(runtime.spawn(async move {
            let outcome = template.execute::<R>(api, &payload).await;
            if let Err(err) = &outcome {
                error!("Failed to {}: {}", api.description(), err);
            }
            callback(outcome);
        }))
    }
}

fn log_failure(api: TimApi, status: &ApiResponse) {
    if !status.is_success() {
        error!(
            "Failed to {}, ActionStatus : {}, ErrorCode : {}, ErrorInfo : {}",
            api.description(),
            status.action_status,
            status.error_code,
            status.error_info
        );
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use httpmock::MockServer;

    pub const APP_ID: u64 = 1400000000;

    pub fn properties_for(server: &MockServer) -> TimProperties {
        let mut properties = TimProperties::new(APP_ID, "im-secret");
        properties.endpoint = server.base_url();
        properties
    }

    pub fn template_for(server: &MockServer) -> TimTemplate {
        TimTemplate::new(properties_for(server)).unwrap()
    }
}
