//! Credentials, client profiles and per-product properties.
//!
//! Properties are read from the process environment (a `.env` file is loaded
//! first through `dotenv`). Every loader also accepts an arbitrary lookup
//! closure so the same parsing runs against a `HashMap` in tests.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;

use crate::error::{Result, TencentCloudError};

/// Secret pair issued by Tencent Cloud CAM.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret_id: String,
    secret_key: String,
}

impl Credential {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Request signing algorithm.
///
/// Only TC3 is implemented: the legacy `HmacSHA1`/`HmacSHA256` methods sign
/// form-encoded requests and cannot carry the JSON bodies used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMethod {
    #[default]
    Tc3HmacSha256,
}

impl SignMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignMethod::Tc3HmacSha256 => "TC3-HMAC-SHA256",
        }
    }
}

impl FromStr for SignMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "TC3-HMAC-SHA256" => Ok(SignMethod::Tc3HmacSha256),
            other => Err(format!("unsupported sign method '{}', expected TC3-HMAC-SHA256", other)),
        }
    }
}

/// Language of vendor error messages (`X-TC-Language`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    ZhCn,
    EnUs,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::EnUs => "en-US",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "ZH_CN" => Ok(Language::ZhCn),
            "EN_US" => Ok(Language::EnUs),
            _ => Err(format!("unsupported language '{}', expected ZH_CN or EN_US", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProfile {
    /// Scheme prefix, `https://` unless pointed at a local endpoint
    pub protocol: String,
    /// Host override; `None` means `{service}.tencentcloudapi.com`
    pub endpoint: Option<String>,
    pub req_timeout: Duration,
}

impl Default for HttpProfile {
    fn default() -> Self {
        Self {
            protocol: "https://".to_string(),
            endpoint: None,
            req_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientProfile {
    pub sign_method: SignMethod,
    pub language: Option<Language>,
    pub debug: bool,
    pub http_profile: HttpProfile,
}

/// Instant Messaging (TIM) REST API settings.
#[derive(Clone)]
pub struct TimProperties {
    pub sdk_app_id: u64,
    /// Key used to derive the administrator UserSig
    pub secret_key: String,
    /// Administrator account the REST calls are made as
    pub identifier: String,
    /// UserSig lifetime in seconds
    pub expire: u64,
    pub endpoint: String,
    /// Prepended to business user ids to form IM accounts
    pub user_prefix: String,
}

impl TimProperties {
    pub const DEFAULT_ENDPOINT: &'static str = "https://console.tim.qq.com";

    pub fn new(sdk_app_id: u64, secret_key: impl Into<String>) -> Self {
        Self {
            sdk_app_id,
            secret_key: secret_key.into(),
            identifier: "administrator".to_string(),
            expire: 604_800,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            user_prefix: String::new(),
        }
    }

    pub fn from_env() -> Result<Option<Self>> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !enabled(&lookup, "TENCENT_TIM_ENABLED") {
            return Ok(None);
        }

        let sdk_app_id = parse_required(&lookup, "TENCENT_TIM_SDK_APP_ID")?;
        let mut properties = Self::new(sdk_app_id, required(&lookup, "TENCENT_TIM_SECRET_KEY")?);
        if let Some(identifier) = lookup("TENCENT_TIM_IDENTIFIER") {
            properties.identifier = identifier;
        }
        properties.expire = parse_or(&lookup, "TENCENT_TIM_EXPIRE", properties.expire)?;
        if let Some(endpoint) = lookup("TENCENT_TIM_ENDPOINT") {
            properties.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        properties.user_prefix = lookup("TENCENT_TIM_USER_PREFIX").unwrap_or_default();

        Ok(Some(properties))
    }
}

impl fmt::Debug for TimProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimProperties")
            .field("sdk_app_id", &self.sdk_app_id)
            .field("secret_key", &"***")
            .field("identifier", &self.identifier)
            .field("expire", &self.expire)
            .field("endpoint", &self.endpoint)
            .field("user_prefix", &self.user_prefix)
            .finish()
    }
}

/// SMS (API 2019-07-11) settings.
#[derive(Debug, Clone)]
pub struct SmsProperties {
    pub credential: Credential,
    pub region: String,
    pub profile: ClientProfile,
    pub sdk_app_id: String,
    /// Approved signature content prepended to every message
    pub sign: String,
    /// Prefix for numbers given without an international prefix
    pub country_code: String,
}

impl SmsProperties {
    pub fn from_env() -> Result<Option<Self>> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !enabled(&lookup, "TENCENT_SMS_ENABLED") {
            return Ok(None);
        }

        let (credential, region, profile) = cloud_section(&lookup, "TENCENT_SMS")?;
        Ok(Some(Self {
            credential,
            region,
            profile,
            sdk_app_id: required(&lookup, "TENCENT_SMS_SDK_APP_ID")?,
            sign: required(&lookup, "TENCENT_SMS_SIGN")?,
            country_code: lookup("TENCENT_SMS_COUNTRY_CODE").unwrap_or_else(|| "+86".to_string()),
        }))
    }
}

/// Live (API 2018-08-01) settings plus the push/pull domains used for URL signing.
#[derive(Clone)]
pub struct LiveProperties {
    pub credential: Credential,
    pub region: String,
    pub profile: ClientProfile,
    pub push_domain: String,
    pub pull_domain: String,
    pub app_name: String,
    pub push_key: Option<String>,
    pub pull_key: Option<String>,
    /// Lifetime of signed stream URLs in seconds
    pub url_expire: i64,
}

impl LiveProperties {
    pub fn from_env() -> Result<Option<Self>> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !enabled(&lookup, "TENCENT_LIVE_ENABLED") {
            return Ok(None);
        }

        let (credential, region, profile) = cloud_section(&lookup, "TENCENT_LIVE")?;
        Ok(Some(Self {
            credential,
            region,
            profile,
            push_domain: required(&lookup, "TENCENT_LIVE_PUSH_DOMAIN")?,
            pull_domain: required(&lookup, "TENCENT_LIVE_PULL_DOMAIN")?,
            app_name: lookup("TENCENT_LIVE_APP_NAME").unwrap_or_else(|| "live".to_string()),
            push_key: lookup("TENCENT_LIVE_PUSH_KEY"),
            pull_key: lookup("TENCENT_LIVE_PULL_KEY"),
            url_expire: parse_or(&lookup, "TENCENT_LIVE_URL_EXPIRE", 86_400)?,
        }))
    }
}

impl fmt::Debug for LiveProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("LiveProperties")
            .field("credential", &self.credential)
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("push_domain", &self.push_domain)
            .field("pull_domain", &self.pull_domain)
            .field("app_name", &self.app_name)
            .field("push_key", &mask(&self.push_key))
            .field("pull_key", &mask(&self.pull_key))
            .field("url_expire", &self.url_expire)
            .finish()
    }
}

// Credential, region and profile share one layout across the API 3.0 products
fn cloud_section<F>(lookup: &F, prefix: &str) -> Result<(Credential, String, ClientProfile)>
where
    F: Fn(&str) -> Option<String>,
{
    let key = |suffix: &str| format!("{}_{}", prefix, suffix);

    let credential = Credential::new(
        required(lookup, &key("SECRET_ID"))?,
        required(lookup, &key("SECRET_KEY"))?,
    );
    let region = lookup(&key("REGION")).unwrap_or_else(|| "ap-guangzhou".to_string());

    let mut profile = ClientProfile::default();
    if let Some(method) = lookup(&key("SIGN_METHOD")) {
        profile.sign_method = method.parse::<SignMethod>().map_err(|reason| TencentCloudError::InvalidConfig {
            key: key("SIGN_METHOD"),
            reason,
        })?;
    }
    if let Some(language) = lookup(&key("LANGUAGE")) {
        profile.language = Some(language.parse::<Language>().map_err(|reason| {
            TencentCloudError::InvalidConfig {
                key: key("LANGUAGE"),
                reason,
            }
        })?);
    }
    profile.debug = enabled(lookup, &key("DEBUG"));
    if let Some(endpoint) = lookup(&key("ENDPOINT")) {
        match endpoint.split_once("://") {
            Some((scheme, host)) => {
                profile.http_profile.protocol = format!("{}://", scheme);
                profile.http_profile.endpoint = Some(host.trim_end_matches('/').to_string());
            }
            None => profile.http_profile.endpoint = Some(endpoint),
        }
    }
    let timeout = parse_or(lookup, &key("TIMEOUT"), 60u64)?;
    profile.http_profile.req_timeout = Duration::from_secs(timeout);

    Ok((credential, region, profile))
}

fn enabled<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|val| val.to_lowercase() == "true")
        .unwrap_or(false)
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|val| !val.is_empty())
        .ok_or_else(|| TencentCloudError::MissingConfig(key.to_string()))
}

fn parse_required<F, T>(lookup: &F, key: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = required(lookup, key)?;
    raw.parse().map_err(|err: T::Err| TencentCloudError::InvalidConfig {
        key: key.to_string(),
        reason: err.to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(_) => parse_required(lookup, key),
        None => Ok(default),
    }
}
