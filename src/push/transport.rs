//! HTTP 传输层
//!
//! 每次推送只发出一个请求，不重试。

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::encoder::{EncodedBody, FORM_CONTENT_TYPE};
use crate::error::PushError;

/// 默认超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 收到的原始响应
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// 传输层抽象，便于在测试中替换
pub trait Transport {
    /// POST 编码后的请求体
    fn send(&self, endpoint: &Url, body: &EncodedBody) -> Result<RawResponse, PushError>;

    /// GET 请求（限额查询）
    fn get(&self, url: &Url) -> Result<RawResponse, PushError>;
}

/// 基于 reqwest blocking 客户端的传输层
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pushover-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Cannot create HTTP client: {}", e))?;

        Ok(Self { client })
    }

    fn read(
        endpoint: &Url,
        response: reqwest::blocking::Response,
    ) -> Result<RawResponse, PushError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .map_err(|e| transport_error(endpoint, e))?;

        debug!(status, body_len = body.len(), "API response received");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(endpoint: &Url, e: reqwest::Error) -> PushError {
    PushError::Transport {
        endpoint: redact(endpoint),
        source: Box::new(e.without_url()),
    }
}

/// 日志与错误信息中去掉查询参数（可能包含 token）
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: &Url, body: &EncodedBody) -> Result<RawResponse, PushError> {
        let request = match body {
            EncodedBody::Form(encoded) => self
                .client
                .post(endpoint.clone())
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header(CONTENT_LENGTH, encoded.len().to_string())
                .body(encoded.clone()),
            EncodedBody::Multipart { fields, attachment } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(*name, value.clone());
                }
                let part = Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone())
                    .mime_str(attachment.mime_type)
                    .map_err(|e| transport_error(endpoint, e))?;
                // Form 自动设置 multipart/form-data; boundary=...
                self.client
                    .post(endpoint.clone())
                    .multipart(form.part("attachment", part))
            }
        };

        debug!(
            endpoint = %redact(endpoint),
            multipart = body.is_multipart(),
            content_length = ?body.content_length(),
            "Sending push request"
        );

        let response = request.send().map_err(|e| transport_error(endpoint, e))?;
        Self::read(endpoint, response)
    }

    fn get(&self, url: &Url) -> Result<RawResponse, PushError> {
        debug!(endpoint = %redact(url), "Sending limits request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| transport_error(url, e))?;
        Self::read(url, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_drops_query() {
        let url = Url::parse("https://api.pushover.net/1/apps/limits.json?token=secret").unwrap();
        assert_eq!(redact(&url), "https://api.pushover.net/1/apps/limits.json");
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }
}
