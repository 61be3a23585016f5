//! 推送流程错误类型
//!
//! 校验与附件错误在任何网络请求之前终止流程；传输与响应解析错误终止本次调用；
//! 限额 header 解析错误在推送流程中只作为警告。

use std::path::PathBuf;
use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidEnum,
    InvalidEndpoint,
    AttachmentNotFound,
    AttachmentTooLarge,
    NotAnImage,
    IoError,
    TransportError,
    MalformedResponse,
    ApiRejected,
    MalformedRateLimitHeader,
    NoConfiguration,
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("unknown {field} '{value}' (expected one of: {expected})")]
    InvalidEnum {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid API endpoint '{endpoint}'")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("attachment file not found: {}", path.display())]
    AttachmentNotFound { path: PathBuf },

    #[error("attachment too large: {} is {size} bytes, at most {limit} allowed", path.display())]
    AttachmentTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("attachment is not an image: {}", path.display())]
    NotAnImage { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed API response (HTTP {http_status})")]
    MalformedResponse {
        http_status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("API rejected request {request_id} with status {status}: {}", errors.join("; "))]
    ApiRejected {
        status: i64,
        request_id: String,
        errors: Vec<String>,
    },

    #[error("could not parse {header} header value '{value}'")]
    MalformedRateLimitHeader { header: &'static str, value: String },

    #[error("no configuration found, run `config setup` or set PUSHOVER_CLI_USER and PUSHOVER_CLI_API")]
    NoConfiguration,
}

impl PushError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PushError::InvalidEnum { .. } => ErrorKind::InvalidEnum,
            PushError::InvalidEndpoint { .. } => ErrorKind::InvalidEndpoint,
            PushError::AttachmentNotFound { .. } => ErrorKind::AttachmentNotFound,
            PushError::AttachmentTooLarge { .. } => ErrorKind::AttachmentTooLarge,
            PushError::NotAnImage { .. } => ErrorKind::NotAnImage,
            PushError::Io { .. } => ErrorKind::IoError,
            PushError::Transport { .. } => ErrorKind::TransportError,
            PushError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            PushError::ApiRejected { .. } => ErrorKind::ApiRejected,
            PushError::MalformedRateLimitHeader { .. } => ErrorKind::MalformedRateLimitHeader,
            PushError::NoConfiguration => ErrorKind::NoConfiguration,
        }
    }
}
