//! SMS template over the 2019-07-11 API.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::client::{CloudClient, CloudService};
use crate::config::SmsProperties;
use crate::error::Result;

/// Delivery outcome for one phone number
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendStatus {
    #[serde(rename = "SerialNo", default)]
    pub serial_no: String,
    #[serde(rename = "PhoneNumber", default)]
    pub phone_number: String,
    /// Number of billed messages
    #[serde(rename = "Fee", default)]
    pub fee: i64,
    #[serde(rename = "SessionContext", default)]
    pub session_context: String,
    /// `Ok` on success, otherwise an error code
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl SendStatus {
    pub fn is_success(&self) -> bool {
        self.code.eq_ignore_ascii_case("Ok")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendSmsResponse {
    #[serde(rename = "SendStatusSet", default)]
    pub send_status_set: Vec<SendStatus>,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

impl SendSmsResponse {
    pub fn all_succeeded(&self) -> bool {
        !self.send_status_set.is_empty() && self.send_status_set.iter().all(SendStatus::is_success)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullSmsSendStatus {
    #[serde(rename = "UserReceiveTime", default)]
    pub user_receive_time: String,
    #[serde(rename = "NationCode", default)]
    pub nation_code: String,
    #[serde(rename = "PurePhoneNumber", default)]
    pub pure_phone_number: String,
    #[serde(rename = "PhoneNumber", default)]
    pub phone_number: String,
    #[serde(rename = "SerialNo", default)]
    pub serial_no: String,
    /// `SUCCESS` or `FAIL`
    #[serde(rename = "ReportStatus", default)]
    pub report_status: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullSmsSendStatusResponse {
    #[serde(rename = "PullSmsSendStatusSet", default)]
    pub pull_sms_send_status_set: Vec<PullSmsSendStatus>,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

/// Template-message SMS sender
#[derive(Clone)]
pub struct SmsTemplate {
    client: CloudClient,
    properties: SmsProperties,
}

impl SmsTemplate {
    pub fn new(properties: SmsProperties) -> Result<Self> {
        let client = CloudClient::new(
            CloudService::Sms,
            properties.credential.clone(),
            properties.region.clone(),
            properties.profile.clone(),
        )?;
        Ok(Self::with_client(client, properties))
    }

    pub fn with_client(client: CloudClient, properties: SmsProperties) -> Self {
        Self { client, properties }
    }

    /// Send template `template_id` to a single number
    pub async fn send<S: AsRef<str>>(
        &self,
        phone_number: &str,
        template_id: &str,
        params: &[S],
    ) -> Result<SendSmsResponse> {
        self.send_batch(&[phone_number], template_id, params).await
    }

    /// Send the same template to up to 200 numbers
    pub async fn send_batch<P, S>(
        &self,
        phone_numbers: &[P],
        template_id: &str,
        params: &[S],
    ) -> Result<SendSmsResponse>
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let phones: Vec<String> = phone_numbers
            .iter()
            .map(|phone| self.normalize_phone(phone.as_ref()))
            .collect();
        let template_params: Vec<&str> = params.iter().map(|param| param.as_ref()).collect();

        let payload = json!({
            "PhoneNumberSet": phones,
            "TemplateID": template_id,
            "SmsSdkAppid": self.properties.sdk_app_id,
            "Sign": self.properties.sign,
            "TemplateParamSet": template_params,
        });

        info!("Sending SMS template {} to {} numbers", template_id, phones.len());
        let res: SendSmsResponse = self.client.call("SendSms", &payload).await?;

        for status in res.send_status_set.iter().filter(|status| !status.is_success()) {
            error!(
                "SMS to {} failed, SerialNo : {}, Code : {}, Message : {}",
                status.phone_number, status.serial_no, status.code, status.message
            );
        }
        Ok(res)
    }

    /// Pull delivery receipts, at most `limit` per call
    pub async fn pull_send_status(&self, limit: u32) -> Result<PullSmsSendStatusResponse> {
        let payload = json!({
            "Limit": limit,
            "SmsSdkAppid": self.properties.sdk_app_id,
        });
        self.client.call("PullSmsSendStatus", &payload).await
    }

    /// Numbers without an international prefix get the default country code
    pub fn normalize_phone(&self, phone: &str) -> String {
        let phone = phone.trim();
        if phone.starts_with('+') {
            phone.to_string()
        } else {
            format!("{}{}", self.properties.country_code, phone)
        }
    }
}
