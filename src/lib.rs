//! Tencent Cloud Service
//!
//! This library wraps Tencent Cloud products behind small async templates
//! and an HTTP gateway that hosts whichever of them are enabled.
//!
//! # Modules
//!
//! - `tim`: Instant Messaging REST API (accounts, relationships, all-member push)
//! - `sms`: template SMS sending and delivery receipts
//! - `live`: signed stream addresses and stream management
//! - `client`: Tencent Cloud API 3.0 client shared by `sms` and `live`
//! - `auth`: signature utilities
//! - `config`: properties loaded from the environment
//!
//! # Authentication
//!
//! TIM calls carry an administrator UserSig (HMAC-SHA256, zlib, URL-safe
//! base64) in the query string. API 3.0 calls are signed with
//! `TC3-HMAC-SHA256`. Live playback addresses use the MD5 anti-leech scheme.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod live;
pub mod models;
pub mod routes;
pub mod sms;
pub mod tim;

// Re-export the main API types for ease of use
pub use auth::TencentAuth;
pub use client::{CloudClient, CloudService};
pub use config::{Credential, LiveProperties, SmsProperties, TimProperties};
pub use error::{Result, TencentCloudError};
pub use handlers::api::AppState;
pub use live::LiveTemplate;
pub use routes::create_router;
pub use sms::SmsTemplate;
pub use tim::{TimTemplate, UserIdMapper};
