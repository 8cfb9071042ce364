//! IM request items and response models.
//!
//! Field names follow the vendor's JSON schema; Rust names are snake_case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Status triple carried by every IM response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "ActionStatus", default)]
    pub action_status: String,
    #[serde(rename = "ErrorCode", default)]
    pub error_code: i64,
    #[serde(rename = "ErrorInfo", default)]
    pub error_info: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.action_status == "OK" && self.error_code == 0
    }
}

/// Uniform access to the status triple of a response model
pub trait TimResponse {
    fn status(&self) -> &ApiResponse;

    fn is_success(&self) -> bool {
        self.status().is_success()
    }
}

impl TimResponse for ApiResponse {
    fn status(&self) -> &ApiResponse {
        self
    }
}

macro_rules! tim_response {
    ($($name:ident),+ $(,)?) => {
        $(
            impl TimResponse for $name {
                fn status(&self) -> &ApiResponse {
                    &self.status
                }
            }
        )+
    };
}

tim_response!(
    AccountImportResponse,
    AccountsImportResponse,
    AccountDeleteResponse,
    AccountCheckResponse,
    AccountKickResponse,
    AccountStateResponse,
    FriendBatchResponse,
    FriendCheckResponse,
    FriendGetResponse,
    FriendGetListResponse,
    BlacklistResponse,
    AllMemberPushResponse,
    AppAttrNameResponse,
    UserAttrsResponse,
    UserTagsResponse,
);

// ---- account ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountImportResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsImportResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    /// Accounts that could not be imported
    #[serde(rename = "FailAccounts", default)]
    pub fail_accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountResultItem {
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[serde(rename = "ResultCode", default)]
    pub result_code: i64,
    #[serde(rename = "ResultInfo", default)]
    pub result_info: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDeleteResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "ResultItem", default)]
    pub result_item: Vec<AccountResultItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountCheckItem {
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[serde(rename = "ResultCode", default)]
    pub result_code: i64,
    #[serde(rename = "ResultInfo", default)]
    pub result_info: String,
    /// `Imported` or `NotImported`
    #[serde(rename = "AccountStatus", default)]
    pub account_status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountCheckResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "ResultItem", default)]
    pub result_item: Vec<AccountCheckItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountKickResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformState {
    #[serde(rename = "Platform", default)]
    pub platform: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountState {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// `Online`, `PushOnline` or `Offline`
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Detail", default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<PlatformState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStateError {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "ErrorCode", default)]
    pub error_code: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStateResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "QueryResult", default)]
    pub query_result: Vec<AccountState>,
    #[serde(rename = "ErrorList", default)]
    pub error_list: Vec<AccountStateError>,
}

// ---- relationship chain ----

/// How `friend_add` links the two accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddType {
    #[serde(rename = "Add_Type_Single")]
    Single,
    #[serde(rename = "Add_Type_Both")]
    Both,
}

impl AddType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddType::Single => "Add_Type_Single",
            AddType::Both => "Add_Type_Both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteType {
    #[serde(rename = "Delete_Type_Single")]
    Single,
    #[serde(rename = "Delete_Type_Both")]
    Both,
}

impl DeleteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteType::Single => "Delete_Type_Single",
            DeleteType::Both => "Delete_Type_Both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckType {
    #[serde(rename = "CheckResult_Type_Single")]
    Single,
    #[serde(rename = "CheckResult_Type_Both")]
    Both,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Single => "CheckResult_Type_Single",
            CheckType::Both => "CheckResult_Type_Both",
        }
    }
}

/// Profile or relationship field, e.g. `Tag_SNS_IM_Remark`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnsItem {
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

impl SnsItem {
    pub fn new(tag: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendAddItem {
    #[serde(rename = "To_Account")]
    pub to_account: String,
    #[serde(rename = "Remark", skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(rename = "GroupName", skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Must start with `AddSource_Type_`
    #[serde(rename = "AddSource")]
    pub add_source: String,
    #[serde(rename = "AddWording", skip_serializing_if = "Option::is_none")]
    pub add_wording: Option<String>,
}

impl FriendAddItem {
    pub fn new(to_account: impl Into<String>, add_source: impl Into<String>) -> Self {
        Self {
            to_account: to_account.into(),
            remark: None,
            group_name: None,
            add_source: add_source.into(),
            add_wording: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendImportItem {
    #[serde(rename = "To_Account")]
    pub to_account: String,
    #[serde(rename = "Remark", skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(rename = "RemarkTime", skip_serializing_if = "Option::is_none")]
    pub remark_time: Option<i64>,
    #[serde(rename = "GroupName", skip_serializing_if = "Option::is_none")]
    pub group_name: Option<Vec<String>>,
    #[serde(rename = "AddSource")]
    pub add_source: String,
    #[serde(rename = "AddWording", skip_serializing_if = "Option::is_none")]
    pub add_wording: Option<String>,
    #[serde(rename = "AddTime", skip_serializing_if = "Option::is_none")]
    pub add_time: Option<i64>,
    #[serde(rename = "CustomItem", skip_serializing_if = "Option::is_none")]
    pub custom_item: Option<Vec<SnsItem>>,
}

impl FriendImportItem {
    pub fn new(to_account: impl Into<String>, add_source: impl Into<String>) -> Self {
        Self {
            to_account: to_account.into(),
            remark: None,
            remark_time: None,
            group_name: None,
            add_source: add_source.into(),
            add_wording: None,
            add_time: None,
            custom_item: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendUpdateItem {
    #[serde(rename = "To_Account")]
    pub to_account: String,
    #[serde(rename = "SnsItem")]
    pub sns_item: Vec<SnsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendResultItem {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "ResultCode", default)]
    pub result_code: i64,
    #[serde(rename = "ResultInfo", default)]
    pub result_info: String,
}

/// Per-target outcome list shared by the add/import/update/delete and blacklist-add calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendBatchResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "ResultItem", default)]
    pub result_item: Vec<FriendResultItem>,
    #[serde(rename = "Fail_Account", default)]
    pub fail_account: Vec<String>,
}

pub type FriendAddResponse = FriendBatchResponse;
pub type FriendImportResponse = FriendBatchResponse;
pub type FriendUpdateResponse = FriendBatchResponse;
pub type FriendDeleteResponse = FriendBatchResponse;
pub type FriendDeleteAllResponse = ApiResponse;
pub type BlacklistAddResponse = FriendBatchResponse;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendCheckItem {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    /// e.g. `CheckResult_Type_BothWay`
    #[serde(rename = "Relation", default)]
    pub relation: String,
    #[serde(rename = "ResultCode", default)]
    pub result_code: i64,
    #[serde(rename = "ResultInfo", default)]
    pub result_info: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendCheckResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "InfoItem", default)]
    pub info_item: Vec<FriendCheckItem>,
    #[serde(rename = "Fail_Account", default)]
    pub fail_account: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendData {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "ValueItem", default)]
    pub value_item: Vec<SnsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendGetResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "UserDataItem", default)]
    pub user_data_item: Vec<FriendData>,
    #[serde(rename = "StandardSequence", default)]
    pub standard_sequence: i64,
    #[serde(rename = "CustomSequence", default)]
    pub custom_sequence: i64,
    #[serde(rename = "FriendNum", default)]
    pub friend_num: i64,
    /// 1 once the last page has been pulled
    #[serde(rename = "CompleteFlag", default)]
    pub complete_flag: i64,
    #[serde(rename = "NextStartIndex", default)]
    pub next_start_index: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendProfile {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "SnsProfileItem", default)]
    pub sns_profile_item: Vec<SnsItem>,
    #[serde(rename = "ResultCode", default)]
    pub result_code: i64,
    #[serde(rename = "ResultInfo", default)]
    pub result_info: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendGetListResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "InfoItem", default)]
    pub info_item: Vec<FriendProfile>,
    #[serde(rename = "Fail_Account", default)]
    pub fail_account: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlacklistItem {
    #[serde(rename = "To_Account", default)]
    pub to_account: String,
    #[serde(rename = "AddBlackTimeStamp", default)]
    pub add_black_timestamp: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlacklistResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "BlackListItem", default)]
    pub black_list_item: Vec<BlacklistItem>,
    #[serde(rename = "StartIndex", default)]
    pub start_index: i64,
    // The vendor spells it this way
    #[serde(rename = "CurruentSequence", default)]
    pub current_sequence: i64,
    #[serde(rename = "ResultItem", default)]
    pub result_item: Vec<FriendResultItem>,
    #[serde(rename = "Fail_Account", default)]
    pub fail_account: Vec<String>,
}

// ---- all-member push ----

/// One message element, e.g. `TIMTextElem`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgBody {
    #[serde(rename = "MsgType")]
    pub msg_type: String,
    #[serde(rename = "MsgContent")]
    pub msg_content: Value,
}

impl MsgBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            msg_type: "TIMTextElem".to_string(),
            msg_content: json!({ "Text": text.into() }),
        }
    }

    pub fn custom(data: impl Into<String>, desc: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            msg_type: "TIMCustomElem".to_string(),
            msg_content: json!({
                "Data": data.into(),
                "Desc": desc.into(),
                "Ext": ext.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidInfo {
    #[serde(rename = "Sound", skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApnsInfo {
    #[serde(rename = "Sound", skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(rename = "BadgeMode", skip_serializing_if = "Option::is_none")]
    pub badge_mode: Option<i32>,
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "SubTitle", skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(rename = "Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflinePushInfo {
    /// 0 pushes offline, 1 suppresses it
    #[serde(rename = "PushFlag", skip_serializing_if = "Option::is_none")]
    pub push_flag: Option<i32>,
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Desc", skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(rename = "Ext", skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(rename = "AndroidInfo", skip_serializing_if = "Option::is_none")]
    pub android_info: Option<AndroidInfo>,
    #[serde(rename = "ApnsInfo", skip_serializing_if = "Option::is_none")]
    pub apns_info: Option<ApnsInfo>,
}

/// Push audience filter. Tag and attribute conditions cannot be combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "TagsAnd", skip_serializing_if = "Option::is_none")]
    pub tags_and: Option<Vec<String>>,
    #[serde(rename = "TagsOr", skip_serializing_if = "Option::is_none")]
    pub tags_or: Option<Vec<String>>,
    #[serde(rename = "AttrsAnd", skip_serializing_if = "Option::is_none")]
    pub attrs_and: Option<BTreeMap<String, String>>,
    #[serde(rename = "AttrsOr", skip_serializing_if = "Option::is_none")]
    pub attrs_or: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttrs {
    #[serde(rename = "To_Account")]
    pub to_account: String,
    #[serde(rename = "Attrs", default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTags {
    #[serde(rename = "To_Account")]
    pub to_account: String,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllMemberPushResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    /// Push task id, usable for report queries
    #[serde(rename = "TaskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppAttrNameResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "AttrNames", default)]
    pub attr_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAttrsResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "UserAttrs", default)]
    pub user_attrs: Vec<UserAttrs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserTagsResponse {
    #[serde(flatten)]
    pub status: ApiResponse,
    #[serde(rename = "UserTags", default)]
    pub user_tags: Vec<UserTags>,
}
