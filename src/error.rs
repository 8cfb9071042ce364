use thiserror::Error;

/// Errors raised while talking to Tencent Cloud.
///
/// IM business failures (a well-formed response with a non-OK `ActionStatus`)
/// are not represented here: they come back as the response itself.
#[derive(Debug, Error)]
pub enum TencentCloudError {
    /// Network or connection failure from the HTTP client
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed into the expected model
    #[error("Malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint answered with a non-success HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Cloud API 3.0 error carried in `Response.Error`
    #[error("Tencent Cloud API error {code}: {message} (RequestId: {request_id})")]
    Api {
        code: String,
        message: String,
        request_id: String,
    },

    /// Callback-style call made where no tokio runtime can run it
    #[error("No tokio runtime available to run the request")]
    NoRuntime,

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration {key}: {reason}")]
    InvalidConfig { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TencentCloudError>;
