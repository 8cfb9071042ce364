//! Account management
//!
//! <https://cloud.tencent.com/document/product/269/1608>

use serde_json::{json, Map, Value};

use super::models::{
    AccountCheckResponse, AccountDeleteResponse, AccountImportResponse, AccountKickResponse,
    AccountStateResponse, AccountsImportResponse,
};
use super::{map_users, TimApi, TimTemplate, UserIdMapper};
use crate::error::Result;

pub struct AccountOperations {
    template: TimTemplate,
}

impl AccountOperations {
    pub fn new(template: TimTemplate) -> Self {
        Self { template }
    }

    /// Import a single account
    pub async fn import_account(
        &self,
        user_id: &str,
        nickname: &str,
        avatar: &str,
    ) -> Result<AccountImportResponse> {
        let payload = import_account_payload(self.template.mapper(), user_id, nickname, avatar);
        self.template.execute(TimApi::AccountImport, &payload).await
    }

    /// Import up to 100 accounts at once
    pub async fn import_accounts<S: AsRef<str>>(
        &self,
        user_ids: &[S],
    ) -> Result<AccountsImportResponse> {
        let payload = import_accounts_payload(self.template.mapper(), user_ids);
        self.template.execute(TimApi::MultiAccountImport, &payload).await
    }

    pub async fn delete_accounts<S: AsRef<str>>(
        &self,
        user_ids: &[S],
    ) -> Result<AccountDeleteResponse> {
        let payload = user_item_payload(self.template.mapper(), "DeleteItem", user_ids);
        self.template.execute(TimApi::AccountDelete, &payload).await
    }

    pub async fn check_accounts<S: AsRef<str>>(
        &self,
        user_ids: &[S],
    ) -> Result<AccountCheckResponse> {
        let payload = user_item_payload(self.template.mapper(), "CheckItem", user_ids);
        self.template.execute(TimApi::AccountCheck, &payload).await
    }

    /// Invalidate the login state of an account (kick it out)
    pub async fn kick(&self, user_id: &str) -> Result<AccountKickResponse> {
        let payload = json!({ "Identifier": self.template.im_user(user_id) });
        self.template.execute(TimApi::AccountKick, &payload).await
    }

    /// Query online state without per-platform detail
    pub async fn query_state<S: AsRef<str>>(&self, user_ids: &[S]) -> Result<AccountStateResponse> {
        self.query_state_detail(user_ids, false).await
    }

    pub async fn query_state_detail<S: AsRef<str>>(
        &self,
        user_ids: &[S],
        need_detail: bool,
    ) -> Result<AccountStateResponse> {
        let payload = query_state_payload(self.template.mapper(), user_ids, need_detail);
        self.template.execute(TimApi::AccountState, &payload).await
    }
}

pub(crate) fn import_account_payload(
    mapper: &dyn UserIdMapper,
    user_id: &str,
    nickname: &str,
    avatar: &str,
) -> Value {
    json!({
        "Identifier": mapper.to_im_user(user_id),
        "Nick": nickname,
        "FaceUrl": avatar,
    })
}

pub(crate) fn import_accounts_payload<S: AsRef<str>>(
    mapper: &dyn UserIdMapper,
    user_ids: &[S],
) -> Value {
    json!({ "Accounts": map_users(mapper, user_ids) })
}

// {"DeleteItem": [{"UserID": ...}]} and {"CheckItem": [{"UserID": ...}]}
pub(crate) fn user_item_payload<S: AsRef<str>>(
    mapper: &dyn UserIdMapper,
    key: &str,
    user_ids: &[S],
) -> Value {
    let items: Vec<Value> = map_users(mapper, user_ids)
        .into_iter()
        .map(|account| json!({ "UserID": account }))
        .collect();

    let mut payload = Map::new();
    payload.insert(key.to_string(), Value::Array(items));
    Value::Object(payload)
}

pub(crate) fn query_state_payload<S: AsRef<str>>(
    mapper: &dyn UserIdMapper,
    user_ids: &[S],
    need_detail: bool,
) -> Value {
    let mut payload = Map::new();
    payload.insert("To_Account".to_string(), json!(map_users(mapper, user_ids)));
    if need_detail {
        payload.insert("IsNeedDetail".to_string(), json!(1));
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tim::test_support::template_for;
    use crate::tim::{MockUserIdMapper, PrefixUserIdMapper, TimResponse};
    use httpmock::prelude::*;
    use mockall::predicate::eq;

    #[test]
    fn test_import_account_payload_uses_mapped_identifier() {
        let mut mapper = MockUserIdMapper::new();
        mapper
            .expect_to_im_user()
            .with(eq("u1"))
            .times(1)
            .return_const("im_u1".to_string());

        let payload = import_account_payload(&mapper, "u1", "Alice", "http://x/a.png");

        assert_eq!(
            payload,
            json!({"Identifier": "im_u1", "Nick": "Alice", "FaceUrl": "http://x/a.png"})
        );
        let keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Identifier", "Nick", "FaceUrl"]);
    }

    #[test]
    fn test_delete_and_check_items() {
        let mapper = PrefixUserIdMapper::new("p_");
        assert_eq!(
            user_item_payload(&mapper, "DeleteItem", &["a", "b"]),
            json!({"DeleteItem": [{"UserID": "p_a"}, {"UserID": "p_b"}]})
        );
        assert_eq!(
            user_item_payload(&mapper, "CheckItem", &["a"]),
            json!({"CheckItem": [{"UserID": "p_a"}]})
        );
    }

    #[test]
    fn test_query_state_detail_flag() {
        let mapper = PrefixUserIdMapper::default();
        assert_eq!(
            query_state_payload(&mapper, &["1", "2"], false),
            json!({"To_Account": ["1", "2"]})
        );
        assert_eq!(
            query_state_payload(&mapper, &["1"], true),
            json!({"To_Account": ["1"], "IsNeedDetail": 1})
        );
    }

    #[tokio::test]
    async fn test_import_account_round_trip() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v4/im_open_login_svc/account_import")
                .json_body(json!({"Identifier": "u1", "Nick": "Alice", "FaceUrl": "http://x/a.png"}));
            then.status(200)
                .json_body(json!({"ActionStatus": "OK", "ErrorInfo": "", "ErrorCode": 0}));
        });

        let res = template_for(&server)
            .account()
            .import_account("u1", "Alice", "http://x/a.png")
            .await
            .unwrap();

        mock.assert();
        assert!(res.is_success());
    }

    #[tokio::test]
    async fn test_import_accounts_reports_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v4/im_open_login_svc/multiaccount_import")
                .json_body(json!({"Accounts": ["a", "b"]}));
            then.status(200).json_body(json!({
                "ActionStatus": "OK",
                "ErrorInfo": "",
                "ErrorCode": 0,
                "FailAccounts": ["b"]
            }));
        });

        let res = template_for(&server)
            .account()
            .import_accounts(&["a", "b"])
            .await
            .unwrap();
        assert_eq!(res.fail_accounts, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_check_accounts_failure_is_returned() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v4/im_open_login_svc/account_check");
            then.status(200).json_body(json!({
                "ActionStatus": "FAIL",
                "ErrorInfo": "Err_TLS_Sig_Check_Failed",
                "ErrorCode": 70001
            }));
        });

        let res = template_for(&server)
            .account()
            .check_accounts(&["a"])
            .await
            .unwrap();
        assert!(!res.is_success());
        assert_eq!(res.status.error_code, 70001);
        assert!(res.result_item.is_empty());
    }

    #[tokio::test]
    async fn test_query_state_parses_results() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v4/openim/querystate")
                .json_body(json!({"To_Account": ["449"]}));
            then.status(200).json_body(json!({
                "ActionStatus": "OK",
                "ErrorInfo": "",
                "ErrorCode": 0,
                "QueryResult": [{"To_Account": "449", "State": "Offline", "Status": "Offline"}]
            }));
        });

        let res = template_for(&server)
            .account()
            .query_state(&["449"])
            .await
            .unwrap();
        assert_eq!(res.query_result[0].status, "Offline");
    }
}
