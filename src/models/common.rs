use serde::{Deserialize, Serialize};

// Gateway request and response bodies

#[derive(Debug, Deserialize)]
pub struct ImportAccountRequest {
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdsRequest {
    pub user_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StateQueryRequest {
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub need_detail: bool,
}

#[derive(Debug, Deserialize)]
pub struct BlacklistRequest {
    pub user_id: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub phone_numbers: Vec<String>,
    pub template_id: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
}
