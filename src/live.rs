//! Live streaming template: signed push/pull URLs and stream management
//! over the 2018-08-01 API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::TencentAuth;
use crate::client::{CloudClient, CloudService};
use crate::config::LiveProperties;
use crate::error::Result;

/// Push and playback addresses of one stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamResult {
    pub stream_name: String,
    /// `rtmp://domain/AppName/StreamName?txSecret=..&txTime=..`
    pub rtmp_url: String,
    /// `http://domain/AppName/StreamName.flv?txSecret=..&txTime=..`
    pub flv_url: String,
    /// `http://domain/AppName/StreamName.m3u8`
    pub hls_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamOnlineInfo {
    #[serde(rename = "StreamName", default)]
    pub stream_name: String,
    #[serde(rename = "AppName", default)]
    pub app_name: String,
    #[serde(rename = "DomainName", default)]
    pub domain_name: String,
    #[serde(rename = "PublishTimeList", default)]
    pub publish_time_list: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineStreamsResponse {
    #[serde(rename = "TotalNum", default)]
    pub total_num: i64,
    #[serde(rename = "TotalPage", default)]
    pub total_page: i64,
    #[serde(rename = "PageNum", default)]
    pub page_num: i64,
    #[serde(rename = "PageSize", default)]
    pub page_size: i64,
    #[serde(rename = "OnlineInfo", default)]
    pub online_info: Vec<StreamOnlineInfo>,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamStateResponse {
    /// `active`, `inactive` or `forbid`
    #[serde(rename = "StreamState", default)]
    pub stream_state: String,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

impl StreamStateResponse {
    pub fn is_active(&self) -> bool {
        self.stream_state == "active"
    }
}

/// Response carrying only the request id (drop/resume)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveActionResponse {
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

#[derive(Clone)]
pub struct LiveTemplate {
    client: CloudClient,
    properties: LiveProperties,
}

impl LiveTemplate {
    pub fn new(properties: LiveProperties) -> Result<Self> {
        let client = CloudClient::new(
            CloudService::Live,
            properties.credential.clone(),
            properties.region.clone(),
            properties.profile.clone(),
        )?;
        Ok(Self::with_client(client, properties))
    }

    pub fn with_client(client: CloudClient, properties: LiveProperties) -> Self {
        Self { client, properties }
    }

    /// Signed addresses valid for the configured lifetime from now
    pub fn stream_urls(&self, stream_name: &str) -> StreamResult {
        let expire_at = TencentAuth::get_timestamp() + self.properties.url_expire;
        self.stream_urls_at(stream_name, expire_at)
    }

    /// Signed addresses expiring at unix time `expire_at`
    pub fn stream_urls_at(&self, stream_name: &str, expire_at: i64) -> StreamResult {
        let props = &self.properties;
        let tx_time = format!("{:X}", expire_at);

        let rtmp_url = signed_url(
            &format!("rtmp://{}/{}/{}", props.push_domain, props.app_name, stream_name),
            props.push_key.as_deref(),
            stream_name,
            &tx_time,
        );
        let flv_url = signed_url(
            &format!("http://{}/{}/{}.flv", props.pull_domain, props.app_name, stream_name),
            props.pull_key.as_deref(),
            stream_name,
            &tx_time,
        );
        let hls_url = format!("http://{}/{}/{}.m3u8", props.pull_domain, props.app_name, stream_name);

        StreamResult {
            stream_name: stream_name.to_string(),
            rtmp_url,
            flv_url,
            hls_url,
        }
    }

    pub async fn describe_online_streams(
        &self,
        page_num: u32,
        page_size: u32,
    ) -> Result<OnlineStreamsResponse> {
        let payload = json!({
            "DomainName": self.properties.push_domain,
            "AppName": self.properties.app_name,
            "PageNum": page_num,
            "PageSize": page_size,
        });
        self.client.call("DescribeLiveStreamOnlineList", &payload).await
    }

    pub async fn describe_stream_state(&self, stream_name: &str) -> Result<StreamStateResponse> {
        let payload = self.stream_payload(stream_name);
        self.client.call("DescribeLiveStreamState", &payload).await
    }

    /// Cut off an active push
    pub async fn drop_stream(&self, stream_name: &str) -> Result<LiveActionResponse> {
        info!("Dropping live stream {}", stream_name);
        let payload = self.stream_payload(stream_name);
        self.client.call("DropLiveStream", &payload).await
    }

    /// Allow a previously forbidden stream to push again
    pub async fn resume_stream(&self, stream_name: &str) -> Result<LiveActionResponse> {
        info!("Resuming live stream {}", stream_name);
        let payload = self.stream_payload(stream_name);
        self.client.call("ResumeLiveStream", &payload).await
    }

    fn stream_payload(&self, stream_name: &str) -> Value {
        json!({
            "AppName": self.properties.app_name,
            "DomainName": self.properties.push_domain,
            "StreamName": stream_name,
        })
    }
}

fn signed_url(base: &str, key: Option<&str>, stream_name: &str, tx_time: &str) -> String {
    match key {
        Some(key) if !key.is_empty() => format!(
            "{}?txSecret={}&txTime={}",
            base,
            TencentAuth::live_tx_secret(key, stream_name, tx_time),
            tx_time
        ),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientProfile, Credential, HttpProfile};
    use httpmock::prelude::*;

    fn properties(endpoint: Option<String>) -> LiveProperties {
        LiveProperties {
            credential: Credential::new("AKIDtest", "secret"),
            region: "ap-guangzhou".to_string(),
            profile: ClientProfile {
                http_profile: HttpProfile {
                    protocol: "http://".to_string(),
                    endpoint,
                    ..HttpProfile::default()
                },
                ..ClientProfile::default()
            },
            push_domain: "push.example.com".to_string(),
            pull_domain: "play.example.com".to_string(),
            app_name: "live".to_string(),
            push_key: Some("push-key".to_string()),
            pull_key: None,
            url_expire: 86_400,
        }
    }

    #[test]
    fn test_stream_urls_at() {
        let template = LiveTemplate::new(properties(None)).unwrap();
        let urls = template.stream_urls_at("room1", 0x5C2ACC7F);

        let secret = TencentAuth::live_tx_secret("push-key", "room1", "5C2ACC7F");
        assert_eq!(
            urls.rtmp_url,
            format!("rtmp://push.example.com/live/room1?txSecret={}&txTime=5C2ACC7F", secret)
        );
        assert_eq!(urls.flv_url, "http://play.example.com/live/room1.flv");
        assert_eq!(urls.hls_url, "http://play.example.com/live/room1.m3u8");
        assert_eq!(urls.stream_name, "room1");
    }

    #[test]
    fn test_stream_urls_expire_in_the_future() {
        let template = LiveTemplate::new(properties(None)).unwrap();
        let urls = template.stream_urls("room1");
        let tx_time = urls.rtmp_url.rsplit("txTime=").next().unwrap();
        let expire_at = i64::from_str_radix(tx_time, 16).unwrap();
        assert!(expire_at > TencentAuth::get_timestamp());
    }

    #[tokio::test]
    async fn test_describe_stream_state() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .header("X-TC-Action", "DescribeLiveStreamState")
                .json_body(json!({
                    "AppName": "live",
                    "DomainName": "push.example.com",
                    "StreamName": "room1"
                }));
            then.status(200).json_body(json!({
                "Response": {"StreamState": "active", "RequestId": "req"}
            }));
        });

        let template = LiveTemplate::new(properties(Some(server.address().to_string()))).unwrap();
        let res = template.describe_stream_state("room1").await.unwrap();

        mock.assert();
        assert!(res.is_active());
    }

    #[tokio::test]
    async fn test_describe_online_streams() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .header("X-TC-Action", "DescribeLiveStreamOnlineList")
                .json_body(json!({
                    "DomainName": "push.example.com",
                    "AppName": "live",
                    "PageNum": 1,
                    "PageSize": 10
                }));
            then.status(200).json_body(json!({
                "Response": {
                    "TotalNum": 1,
                    "TotalPage": 1,
                    "PageNum": 1,
                    "PageSize": 10,
                    "OnlineInfo": [{
                        "StreamName": "room1",
                        "AppName": "live",
                        "DomainName": "push.example.com",
                        "PublishTimeList": [{"PublishTime": "2020-04-01T10:00:00Z"}]
                    }],
                    "RequestId": "req"
                }
            }));
        });

        let template = LiveTemplate::new(properties(Some(server.address().to_string()))).unwrap();
        let res = template.describe_online_streams(1, 10).await.unwrap();
        assert_eq!(res.total_num, 1);
        assert_eq!(res.online_info[0].stream_name, "room1");
    }

    #[tokio::test]
    async fn test_drop_and_resume() {
        let server = MockServer::start();
        let dropped = server.mock(|when, then| {
            when.method(POST).header("X-TC-Action", "DropLiveStream");
            then.status(200).json_body(json!({"Response": {"RequestId": "drop-1"}}));
        });
        let resumed = server.mock(|when, then| {
            when.method(POST).header("X-TC-Action", "ResumeLiveStream");
            then.status(200).json_body(json!({"Response": {"RequestId": "resume-1"}}));
        });

        let template = LiveTemplate::new(properties(Some(server.address().to_string()))).unwrap();
        assert_eq!(template.drop_stream("room1").await.unwrap().request_id, "drop-1");
        assert_eq!(template.resume_stream("room1").await.unwrap().request_id, "resume-1");

        dropped.assert();
        resumed.assert();
    }
}
