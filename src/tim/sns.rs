//! Relationship chain: friends and blacklist
//!
//! <https://cloud.tencent.com/document/product/269/1519>

use serde_json::{json, Value};

use super::models::{
    AddType, BlacklistAddResponse, BlacklistResponse, CheckType, DeleteType, FriendAddItem,
    FriendAddResponse, FriendCheckResponse, FriendDeleteAllResponse, FriendDeleteResponse,
    FriendGetListResponse, FriendGetResponse, FriendImportItem, FriendImportResponse,
    FriendUpdateItem, FriendUpdateResponse, TimResponse,
};
use super::{map_users, TimApi, TimTemplate, UserIdMapper};
use crate::error::Result;

/// Standard profile tags pulled by [`SnsOperations::get_friend_list`]
pub const DEFAULT_PROFILE_TAGS: [&str; 11] = [
    "Tag_Profile_IM_Nick",
    "Tag_Profile_IM_Gender",
    "Tag_Profile_IM_BirthDay",
    "Tag_Profile_IM_Location",
    "Tag_Profile_IM_SelfSignature",
    "Tag_Profile_IM_AllowType",
    "Tag_Profile_IM_Language",
    "Tag_Profile_IM_MsgSettings",
    "Tag_Profile_IM_AdminForbidType",
    "Tag_Profile_IM_Level",
    "Tag_Profile_IM_Role",
];

const BLACKLIST_PAGE_SIZE: u32 = 20;

pub struct SnsOperations {
    template: TimTemplate,
}

impl SnsOperations {
    pub fn new(template: TimTemplate) -> Self {
        Self { template }
    }

    pub async fn add_friend(
        &self,
        user_id: &str,
        add_type: AddType,
        force_add: bool,
        friends: Vec<FriendAddItem>,
    ) -> Result<FriendAddResponse> {
        let payload = add_friend_payload(self.template.mapper(), user_id, add_type, force_add, friends)?;
        self.template.execute(TimApi::FriendAdd, &payload).await
    }

    /// Import friends without the verification flow
    pub async fn import_friend(
        &self,
        user_id: &str,
        friends: Vec<FriendImportItem>,
    ) -> Result<FriendImportResponse> {
        let payload = import_friend_payload(self.template.mapper(), user_id, friends)?;
        self.template.execute(TimApi::FriendImport, &payload).await
    }

    pub async fn update_friend(
        &self,
        user_id: &str,
        friends: Vec<FriendUpdateItem>,
    ) -> Result<FriendUpdateResponse> {
        let payload = update_friend_payload(self.template.mapper(), user_id, friends)?;
        self.template.execute(TimApi::FriendUpdate, &payload).await
    }

    /// Delete friends. An empty `friends` list is still sent.
    pub async fn delete_friend<S: AsRef<str>>(
        &self,
        user_id: &str,
        delete_type: DeleteType,
        friends: &[S],
    ) -> Result<FriendDeleteResponse> {
        let payload = delete_friend_payload(self.template.mapper(), user_id, delete_type, friends);
        self.template.execute(TimApi::FriendDelete, &payload).await
    }

    pub async fn delete_all_friends(
        &self,
        user_id: &str,
        delete_type: DeleteType,
    ) -> Result<FriendDeleteAllResponse> {
        let payload = json!({
            "From_Account": self.template.im_user(user_id),
            "DeleteType": delete_type.as_str(),
        });
        self.template.execute(TimApi::FriendDeleteAll, &payload).await
    }

    /// At most 1000 accounts per call
    pub async fn check_friend<S: AsRef<str>>(
        &self,
        user_id: &str,
        check_type: CheckType,
        friends: &[S],
    ) -> Result<FriendCheckResponse> {
        let payload = json!({
            "From_Account": self.template.im_user(user_id),
            "To_Account": map_users(self.template.mapper(), friends),
            "CheckType": check_type.as_str(),
        });
        self.template.execute(TimApi::FriendCheck, &payload).await
    }

    /// Page through the friend list.
    ///
    /// Passing the sequences returned by the previous page lets the backend
    /// skip standard or custom data that has not changed.
    pub async fn get_friends(
        &self,
        user_id: &str,
        start_index: u64,
        standard_sequence: u64,
        custom_sequence: u64,
    ) -> Result<FriendGetResponse> {
        let payload = json!({
            "From_Account": self.template.im_user(user_id),
            "StartIndex": start_index,
            "StandardSequence": standard_sequence,
            "CustomSequence": custom_sequence,
        });
        self.template.execute(TimApi::FriendGet, &payload).await
    }

    /// Pull the standard profile of the given friends
    pub async fn get_friend_list<S: AsRef<str>>(
        &self,
        user_id: &str,
        friends: &[S],
    ) -> Result<FriendGetListResponse> {
        self.get_friend_list_with_tags(user_id, &DEFAULT_PROFILE_TAGS, friends)
            .await
    }

    pub async fn get_friend_list_with_tags<T, S>(
        &self,
        user_id: &str,
        tags: &[T],
        friends: &[S],
    ) -> Result<FriendGetListResponse>
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        let tag_list: Vec<&str> = tags.iter().map(|tag| tag.as_ref()).collect();
        let payload = json!({
            "From_Account": self.template.im_user(user_id),
            "To_Account": map_users(self.template.mapper(), friends),
            "TagList": tag_list,
        });
        self.template.execute(TimApi::FriendGetList, &payload).await
    }

    /// Returns `true` iff the backend accepted the request
    pub async fn add_blacklist<S: AsRef<str>>(&self, user_id: &str, targets: &[S]) -> Result<bool> {
        let payload = blacklist_payload(self.template.mapper(), user_id, targets);
        let res: BlacklistAddResponse = self.template.execute(TimApi::BlacklistAdd, &payload).await?;
        Ok(res.is_success())
    }

    pub async fn delete_blacklist<S: AsRef<str>>(
        &self,
        user_id: &str,
        targets: &[S],
    ) -> Result<bool> {
        let payload = blacklist_payload(self.template.mapper(), user_id, targets);
        let res: BlacklistResponse = self
            .template
            .execute(TimApi::BlacklistDelete, &payload)
            .await?;
        Ok(res.is_success())
    }

    /// First page (20 entries) of the blacklist
    pub async fn get_blacklist(&self, user_id: &str, last_sequence: u64) -> Result<BlacklistResponse> {
        let payload = json!({
            "From_Account": self.template.im_user(user_id),
            "StartIndex": 0,
            "MaxLimited": BLACKLIST_PAGE_SIZE,
            "LastSequence": last_sequence,
        });
        self.template.execute(TimApi::BlacklistGet, &payload).await
    }
}

pub(crate) fn add_friend_payload(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    add_type: AddType,
    force_add: bool,
    mut friends: Vec<FriendAddItem>,
) -> Result<Value> {
    for friend in friends.iter_mut() {
        friend.to_account = mapper.to_im_user(&friend.to_account);
    }

    let force_add_flags = if force_add { 1 } else { 0 };
    Ok(json!({
        "From_Account": mapper.to_im_user(user_id),
        "AddFriendItem": serde_json::to_value(friends)?,
        "AddType": add_type.as_str(),
        "ForceAddFlags": force_add_flags,
    }))
}

pub(crate) fn import_friend_payload(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    mut friends: Vec<FriendImportItem>,
) -> Result<Value> {
    for friend in friends.iter_mut() {
        friend.to_account = mapper.to_im_user(&friend.to_account);
    }

    Ok(json!({
        "From_Account": mapper.to_im_user(user_id),
        "AddFriendItem": serde_json::to_value(friends)?,
    }))
}

pub(crate) fn update_friend_payload(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    mut friends: Vec<FriendUpdateItem>,
) -> Result<Value> {
    for friend in friends.iter_mut() {
        friend.to_account = mapper.to_im_user(&friend.to_account);
    }

    Ok(json!({
        "From_Account": mapper.to_im_user(user_id),
        "UpdateItem": serde_json::to_value(friends)?,
    }))
}

pub(crate) fn delete_friend_payload<S: AsRef<str>>(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    delete_type: DeleteType,
    friends: &[S],
) -> Value {
    json!({
        "From_Account": mapper.to_im_user(user_id),
        "To_Account": map_users(mapper, friends),
        "DeleteType": delete_type.as_str(),
    })
}

pub(crate) fn blacklist_payload<S: AsRef<str>>(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    targets: &[S],
) -> Value {
    json!({
        "From_Account": mapper.to_im_user(user_id),
        "To_Account": map_users(mapper, targets),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tim::models::SnsItem;
    use crate::tim::test_support::template_for;
    use crate::tim::PrefixUserIdMapper;
    use httpmock::prelude::*;

    fn ok_body() -> Value {
        json!({"ActionStatus": "OK", "ErrorInfo": "", "ErrorCode": 0})
    }

    #[test]
    fn test_add_friend_payload_maps_every_account() {
        let mapper = PrefixUserIdMapper::new("im_");
        let mut friend = FriendAddItem::new("b", "AddSource_Type_Android");
        friend.remark = Some("bob".to_string());

        let payload = add_friend_payload(&mapper, "a", AddType::Both, true, vec![friend]).unwrap();

        assert_eq!(
            payload,
            json!({
                "From_Account": "im_a",
                "AddFriendItem": [{
                    "To_Account": "im_b",
                    "Remark": "bob",
                    "AddSource": "AddSource_Type_Android"
                }],
                "AddType": "Add_Type_Both",
                "ForceAddFlags": 1
            })
        );
    }

    #[test]
    fn test_update_friend_payload() {
        let mapper = PrefixUserIdMapper::default();
        let item = FriendUpdateItem {
            to_account: "b".to_string(),
            sns_item: vec![SnsItem::new("Tag_SNS_IM_Remark", "buddy")],
        };
        assert_eq!(
            update_friend_payload(&mapper, "a", vec![item]).unwrap(),
            json!({
                "From_Account": "a",
                "UpdateItem": [{
                    "To_Account": "b",
                    "SnsItem": [{"Tag": "Tag_SNS_IM_Remark", "Value": "buddy"}]
                }]
            })
        );
    }

    #[test]
    fn test_delete_friend_payload_with_no_friends() {
        let mapper = PrefixUserIdMapper::default();
        let payload = delete_friend_payload(&mapper, "a", DeleteType::Single, &[] as &[&str]);
        assert_eq!(
            payload,
            json!({"From_Account": "a", "To_Account": [], "DeleteType": "Delete_Type_Single"})
        );
    }

    #[tokio::test]
    async fn test_delete_friend_sends_empty_target_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v4/sns/friend_delete")
                .json_body(json!({"From_Account": "a", "To_Account": [], "DeleteType": "Delete_Type_Both"}));
            then.status(200).json_body(ok_body());
        });

        let res = template_for(&server)
            .sns()
            .delete_friend("a", DeleteType::Both, &[] as &[&str])
            .await
            .unwrap();

        mock.assert();
        assert!(res.is_success());
    }

    #[tokio::test]
    async fn test_get_friend_list_uses_default_tags() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v4/sns/friend_get_list")
                .json_body(json!({
                    "From_Account": "a",
                    "To_Account": ["b"],
                    "TagList": DEFAULT_PROFILE_TAGS
                }));
            then.status(200).json_body(json!({
                "ActionStatus": "OK",
                "ErrorInfo": "",
                "ErrorCode": 0,
                "InfoItem": [{
                    "To_Account": "b",
                    "SnsProfileItem": [{"Tag": "Tag_Profile_IM_Nick", "Value": "Bob"}],
                    "ResultCode": 0,
                    "ResultInfo": ""
                }],
                "Fail_Account": []
            }));
        });

        let res = template_for(&server)
            .sns()
            .get_friend_list("a", &["b"])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(res.info_item[0].sns_profile_item[0].value, json!("Bob"));
    }

    #[tokio::test]
    async fn test_get_friends_paging_fields() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v4/sns/friend_get").json_body(json!({
                "From_Account": "a",
                "StartIndex": 0,
                "StandardSequence": 0,
                "CustomSequence": 0
            }));
            then.status(200).json_body(json!({
                "UserDataItem": [{
                    "To_Account": "b",
                    "ValueItem": [{"Tag": "Tag_SNS_IM_AddSource", "Value": "AddSource_Type_Android"}]
                }],
                "StandardSequence": 88,
                "CustomSequence": 46,
                "FriendNum": 1,
                "CompleteFlag": 1,
                "NextStartIndex": 0,
                "ActionStatus": "OK",
                "ErrorCode": 0,
                "ErrorInfo": ""
            }));
        });

        let res = template_for(&server)
            .sns()
            .get_friends("a", 0, 0, 0)
            .await
            .unwrap();
        assert_eq!(res.friend_num, 1);
        assert_eq!(res.complete_flag, 1);
        assert_eq!(res.standard_sequence, 88);
        assert_eq!(res.user_data_item[0].to_account, "b");
    }

    #[tokio::test]
    async fn test_blacklist_add_reports_success_as_bool() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v4/sns/black_list_add")
                .json_body(json!({"From_Account": "a", "To_Account": ["b"]}));
            then.status(200).json_body(ok_body());
        });

        let added = template_for(&server)
            .sns()
            .add_blacklist("a", &["b"])
            .await
            .unwrap();
        assert!(added);
    }

    #[tokio::test]
    async fn test_blacklist_delete_failure_is_false() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v4/sns/black_list_delete");
            then.status(200).json_body(json!({
                "ActionStatus": "FAIL",
                "ErrorInfo": "From_Account not exist",
                "ErrorCode": 30001
            }));
        });

        let deleted = template_for(&server)
            .sns()
            .delete_blacklist("a", &["b"])
            .await
            .unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_get_blacklist_first_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v4/sns/black_list_get").json_body(json!({
                "From_Account": "a",
                "StartIndex": 0,
                "MaxLimited": 20,
                "LastSequence": 5
            }));
            then.status(200).json_body(json!({
                "BlackListItem": [{"To_Account": "b", "AddBlackTimeStamp": 1430000001}],
                "StartIndex": 0,
                "CurruentSequence": 13,
                "ActionStatus": "OK",
                "ErrorCode": 0,
                "ErrorInfo": ""
            }));
        });

        let res = template_for(&server)
            .sns()
            .get_blacklist("a", 5)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(res.current_sequence, 13);
        assert_eq!(res.black_list_item.len(), 1);
    }

    #[test]
    fn test_add_friend_payload_key_order() {
        let mapper = PrefixUserIdMapper::default();
        let friend = FriendAddItem::new("b", "AddSource_Type_Web");

        let payload = add_friend_payload(&mapper, "a", AddType::Single, false, vec![friend]).unwrap();

        let keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["From_Account", "AddFriendItem", "AddType", "ForceAddFlags"]);
        assert_eq!(payload["ForceAddFlags"], 0);
        assert_eq!(payload["AddType"], "Add_Type_Single");
    }

    #[test]
    fn test_import_friend_payload() {
        let mapper = PrefixUserIdMapper::new("im_");
        let mut friend = FriendImportItem::new("b", "AddSource_Type_XXXXXXXX");
        friend.group_name = Some(vec!["Classmates".to_string()]);
        friend.add_time = Some(1_420_000_001);

        assert_eq!(
            import_friend_payload(&mapper, "a", vec![friend]).unwrap(),
            json!({
                "From_Account": "im_a",
                "AddFriendItem": [{
                    "To_Account": "im_b",
                    "GroupName": ["Classmates"],
                    "AddSource": "AddSource_Type_XXXXXXXX",
                    "AddTime": 1420000001
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_delete_all_friends_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v4/sns/friend_delete_all")
                .json_body(json!({"From_Account": "a", "DeleteType": "Delete_Type_Single"}));
            then.status(200).json_body(ok_body());
        });

        let res = template_for(&server)
            .sns()
            .delete_all_friends("a", DeleteType::Single)
            .await
            .unwrap();

        mock.assert();
        assert!(res.is_success());
    }

    #[tokio::test]
    async fn test_check_friend_maps_accounts_and_check_type() {
        let server = MockServer::start();
        let mut properties = crate::tim::test_support::properties_for(&server);
        properties.user_prefix = "im_".to_string();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v4/sns/friend_check").json_body(json!({
                "From_Account": "im_a",
                "To_Account": ["im_b", "im_c"],
                "CheckType": "CheckResult_Type_Both"
            }));
            then.status(200).json_body(json!({
                "InfoItem": [
                    {"To_Account": "im_b", "Relation": "CheckResult_Type_BothWay", "ResultCode": 0, "ResultInfo": ""},
                    {"To_Account": "im_c", "Relation": "CheckResult_Type_NoRelation", "ResultCode": 0, "ResultInfo": ""}
                ],
                "Fail_Account": [],
                "ActionStatus": "OK",
                "ErrorCode": 0,
                "ErrorInfo": ""
            }));
        });

        let res = crate::tim::TimTemplate::new(properties)
            .unwrap()
            .sns()
            .check_friend("a", CheckType::Both, &["b", "c"])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(res.info_item[0].relation, "CheckResult_Type_BothWay");
        assert_eq!(res.info_item.len(), 2);
    }

    #[tokio::test]
    async fn test_get_friend_list_with_custom_tags() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v4/sns/friend_get_list").json_body(json!({
                "From_Account": "a",
                "To_Account": ["b"],
                "TagList": ["Tag_SNS_IM_Remark", "Tag_Profile_IM_Nick"]
            }));
            then.status(200).json_body(ok_body());
        });

        template_for(&server)
            .sns()
            .get_friend_list_with_tags("a", &["Tag_SNS_IM_Remark", "Tag_Profile_IM_Nick"], &["b"])
            .await
            .unwrap();

        mock.assert();
    }
}
