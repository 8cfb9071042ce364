//! All-member push, push attributes and push tags
//!
//! <https://cloud.tencent.com/document/product/269/45934>
//!
//! Every call comes in two flavours: an awaited one, and an `async_*` one
//! that runs on the tokio runtime and reports through a callback.

use serde_json::{json, Map, Value};
use tokio::task::JoinHandle;

use super::models::{
    AllMemberPushResponse, ApiResponse, AppAttrNameResponse, Condition, MsgBody, OfflinePushInfo,
    UserAttrs, UserAttrsResponse, UserTags, UserTagsResponse,
};
use super::{map_users, TimApi, TimTemplate, UserIdMapper};
use crate::auth::TencentAuth;
use crate::error::Result;

/// One all-member push task.
///
/// Without a [`Condition`] the message goes to every user of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct AllMemberPush {
    pub from_account: String,
    /// De-duplicates tasks: the same value within 7 days is the same task
    pub msg_random: u32,
    /// Offline storage in seconds, at most 604800; 0 disables it
    pub msg_life_time: Option<u32>,
    pub condition: Option<Condition>,
    pub offline_push_info: Option<OfflinePushInfo>,
    pub msg_body: Vec<MsgBody>,
}

impl AllMemberPush {
    pub fn new(from_account: impl Into<String>, msg_random: u32, msg_body: Vec<MsgBody>) -> Self {
        Self {
            from_account: from_account.into(),
            msg_random,
            msg_life_time: None,
            condition: None,
            offline_push_info: None,
            msg_body,
        }
    }

    /// Same as [`new`](Self::new) with a freshly drawn `MsgRandom`
    pub fn random(from_account: impl Into<String>, msg_body: Vec<MsgBody>) -> Self {
        Self::new(from_account, TencentAuth::random_u32(), msg_body)
    }

    pub fn life_time(mut self, seconds: u32) -> Self {
        self.msg_life_time = Some(seconds);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn offline_push_info(mut self, info: OfflinePushInfo) -> Self {
        self.offline_push_info = Some(info);
        self
    }
}

pub struct AllMemberPushOperations {
    template: TimTemplate,
}

impl AllMemberPushOperations {
    pub fn new(template: TimTemplate) -> Self {
        Self { template }
    }

    pub async fn push(&self, push: AllMemberPush) -> Result<AllMemberPushResponse> {
        let payload = push_payload(self.template.mapper(), push)?;
        self.template.execute(TimApi::ImPush, &payload).await
    }

    pub fn async_push<F>(&self, push: AllMemberPush, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<AllMemberPushResponse>) + Send + 'static,
    {
        let payload = push_payload(self.template.mapper(), push)?;
        self.template.async_request(TimApi::ImPush, payload, callback)
    }

    /// Name the app's push attributes; the position in `attr_names` is the
    /// attribute number (at most 10, each name at most 50 bytes).
    pub async fn set_app_attr_names<S: AsRef<str>>(&self, attr_names: &[S]) -> Result<ApiResponse> {
        let payload = attr_names_payload(attr_names);
        self.template.execute(TimApi::ImSetAttrName, &payload).await
    }

    pub fn async_set_app_attr_names<S, F>(&self, attr_names: &[S], callback: F) -> Result<JoinHandle<()>>
    where
        S: AsRef<str>,
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = attr_names_payload(attr_names);
        self.template.async_request(TimApi::ImSetAttrName, payload, callback)
    }

    pub async fn get_app_attr_names(&self) -> Result<AppAttrNameResponse> {
        self.template.execute(TimApi::ImGetAttrName, &json!({})).await
    }

    pub fn async_get_app_attr_names<F>(&self, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<AppAttrNameResponse>) + Send + 'static,
    {
        self.template.async_request(TimApi::ImGetAttrName, json!({}), callback)
    }

    pub async fn set_user_attrs(&self, user_attrs: Vec<UserAttrs>) -> Result<ApiResponse> {
        let payload = user_attrs_payload(self.template.mapper(), user_attrs)?;
        self.template.execute(TimApi::ImSetAttr, &payload).await
    }

    pub fn async_set_user_attrs<F>(&self, user_attrs: Vec<UserAttrs>, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = user_attrs_payload(self.template.mapper(), user_attrs)?;
        self.template.async_request(TimApi::ImSetAttr, payload, callback)
    }

    pub async fn get_user_attrs<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<UserAttrsResponse> {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.execute(TimApi::ImGetAttr, &payload).await
    }

    pub fn async_get_user_attrs<S, F>(&self, user_ids: &[S], callback: F) -> Result<JoinHandle<()>>
    where
        S: AsRef<str>,
        F: FnOnce(Result<UserAttrsResponse>) + Send + 'static,
    {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.async_request(TimApi::ImGetAttr, payload, callback)
    }

    pub async fn remove_user_attrs(&self, user_attrs: Vec<UserAttrs>) -> Result<ApiResponse> {
        let payload = user_attrs_payload(self.template.mapper(), user_attrs)?;
        self.template.execute(TimApi::ImRemoveAttr, &payload).await
    }

    pub fn async_remove_user_attrs<F>(
        &self,
        user_attrs: Vec<UserAttrs>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = user_attrs_payload(self.template.mapper(), user_attrs)?;
        self.template.async_request(TimApi::ImRemoveAttr, payload, callback)
    }

    /// At most 100 users per call and 10 new tags per user
    pub async fn add_user_tags(&self, user_tags: Vec<UserTags>) -> Result<ApiResponse> {
        let payload = user_tags_payload(self.template.mapper(), user_tags)?;
        self.template.execute(TimApi::ImAddTag, &payload).await
    }

    pub fn async_add_user_tags<F>(&self, user_tags: Vec<UserTags>, callback: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = user_tags_payload(self.template.mapper(), user_tags)?;
        self.template.async_request(TimApi::ImAddTag, payload, callback)
    }

    pub async fn get_user_tags<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<UserTagsResponse> {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.execute(TimApi::ImGetTag, &payload).await
    }

    pub fn async_get_user_tags<S, F>(&self, user_ids: &[S], callback: F) -> Result<JoinHandle<()>>
    where
        S: AsRef<str>,
        F: FnOnce(Result<UserTagsResponse>) + Send + 'static,
    {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.async_request(TimApi::ImGetTag, payload, callback)
    }

    pub async fn remove_user_tags(&self, user_tags: Vec<UserTags>) -> Result<ApiResponse> {
        let payload = user_tags_payload(self.template.mapper(), user_tags)?;
        self.template.execute(TimApi::ImRemoveTag, &payload).await
    }

    pub fn async_remove_user_tags<F>(
        &self,
        user_tags: Vec<UserTags>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = user_tags_payload(self.template.mapper(), user_tags)?;
        self.template.async_request(TimApi::ImRemoveTag, payload, callback)
    }

    pub async fn remove_all_user_tags<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<ApiResponse> {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.execute(TimApi::ImRemoveAllTags, &payload).await
    }

    pub fn async_remove_all_user_tags<S, F>(&self, user_ids: &[S], callback: F) -> Result<JoinHandle<()>>
    where
        S: AsRef<str>,
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let payload = to_account_payload(self.template.mapper(), user_ids);
        self.template.async_request(TimApi::ImRemoveAllTags, payload, callback)
    }
}

pub(crate) fn push_payload(mapper: &dyn UserIdMapper, push: AllMemberPush) -> Result<Value> {
    let mut payload = Map::new();
    payload.insert("From_Account".to_string(), json!(mapper.to_im_user(&push.from_account)));
    payload.insert("MsgRandom".to_string(), json!(push.msg_random));
    payload.insert("MsgLifeTime".to_string(), json!(push.msg_life_time.unwrap_or(0)));
    payload.insert("MsgBody".to_string(), serde_json::to_value(push.msg_body)?);
    if let Some(condition) = push.condition {
        payload.insert("Condition".to_string(), serde_json::to_value(condition)?);
    }
    if let Some(info) = push.offline_push_info {
        payload.insert("OfflinePushInfo".to_string(), serde_json::to_value(info)?);
    }
    Ok(Value::Object(payload))
}

pub(crate) fn attr_names_payload<S: AsRef<str>>(attr_names: &[S]) -> Value {
    let names: Map<String, Value> = attr_names
        .iter()
        .enumerate()
        .map(|(index, name)| (index.to_string(), json!(name.as_ref())))
        .collect();
    json!({ "AttrNames": names })
}

pub(crate) fn user_attrs_payload(mapper: &dyn UserIdMapper, mut user_attrs: Vec<UserAttrs>) -> Result<Value> {
    for attrs in user_attrs.iter_mut() {
        attrs.to_account = mapper.to_im_user(&attrs.to_account);
    }
    Ok(json!({ "UserAttrs": serde_json::to_value(user_attrs)? }))
}

pub(crate) fn user_tags_payload(mapper: &dyn UserIdMapper, mut user_tags: Vec<UserTags>) -> Result<Value> {
    for tags in user_tags.iter_mut() {
        tags.to_account = mapper.to_im_user(&tags.to_account);
    }
    Ok(json!({ "UserTags": serde_json::to_value(user_tags)? }))
}

pub(crate) fn to_account_payload<S: AsRef<str>>(mapper: &dyn UserIdMapper, user_ids: &[S]) -> Value {
    json!({ "To_Account": map_users(mapper, user_ids) })
}
