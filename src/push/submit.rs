//! 推送流程编排
//!
//! `Validate → InspectAttachment → Encode → Transmit → InterpretBody → InterpretRateLimits`
//!
//! 任一阶段失败即终止，但只要收到了响应，仍会尝试提取限额信息。

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::attachment;
use super::encoder;
use super::response::{interpret_body, interpret_rate_limits, RateLimitInfo, SubmissionResult};
use super::transport::{RawResponse, Transport};
use super::types::{NotificationRequest, Warning};
use super::validation::ValidationPolicy;
use crate::config::Credentials;
use crate::error::PushError;

pub const DEFAULT_PUSH_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";
pub const DEFAULT_LIMITS_ENDPOINT: &str = "https://api.pushover.net/1/apps/limits.json";

/// 推送成功
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub result: SubmissionResult,
    pub rate_limits: Option<RateLimitInfo>,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<Warning>,
}

/// 推送失败，保留已收集的警告和限额信息
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SubmitFailure {
    pub error: PushError,
    pub rate_limits: Option<RateLimitInfo>,
    pub warnings: Vec<Warning>,
}

impl SubmitFailure {
    fn new(error: PushError, warnings: Vec<Warning>) -> Self {
        Self {
            error,
            rate_limits: None,
            warnings,
        }
    }
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[Warning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(ToString::to_string))
}

/// 解析 API endpoint
pub fn parse_endpoint(endpoint: &str) -> Result<Url, PushError> {
    Url::parse(endpoint).map_err(|source| PushError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// 推送编排器
pub struct Submitter<T: Transport> {
    transport: T,
    endpoint: Url,
    policy: ValidationPolicy,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
            policy: ValidationPolicy::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 发送一条推送
    pub fn submit(
        &self,
        credentials: &Credentials,
        request: NotificationRequest,
    ) -> Result<Submission, SubmitFailure> {
        let validated = self
            .policy
            .validate(request)
            .map_err(|e| SubmitFailure::new(e, Vec::new()))?;
        let notification = validated.notification;
        let mut warnings = validated.warnings;

        let image_type = match &notification.attachment {
            Some(path) => match attachment::inspect(path) {
                Ok(t) => Some(t),
                Err(e) => return Err(SubmitFailure::new(e, warnings)),
            },
            None => None,
        };

        let body = match encoder::encode(credentials, &notification, image_type.as_ref()) {
            Ok(body) => body,
            Err(e) => return Err(SubmitFailure::new(e, warnings)),
        };

        let response = match self.transport.send(&self.endpoint, &body) {
            Ok(response) => response,
            Err(e) => return Err(SubmitFailure::new(e, warnings)),
        };

        let rate_limits = extract_rate_limits(&response, &mut warnings);

        match interpret_body(response.status, &response.body) {
            Ok(result) => {
                info!(status = result.api_status, request = %result.request_id, "Message pushed");
                Ok(Submission {
                    result,
                    rate_limits,
                    warnings,
                })
            }
            Err(error) => Err(SubmitFailure {
                error,
                rate_limits,
                warnings,
            }),
        }
    }
}

/// 限额提取失败只记为警告
fn extract_rate_limits(response: &RawResponse, warnings: &mut Vec<Warning>) -> Option<RateLimitInfo> {
    match interpret_rate_limits(&response.headers) {
        Ok(limits) => Some(limits),
        Err(e) => {
            debug!(error = %e, "Rate limit headers unusable");
            warnings.push(Warning::RateLimitUnavailable(e.to_string()));
            None
        }
    }
}

/// 查询应用限额：`GET <endpoint>?token=<api token>`
///
/// 这里限额是唯一的输出，header 解析失败为致命错误。
pub fn check_limits<T: Transport>(
    transport: &T,
    endpoint: &Url,
    credentials: &Credentials,
) -> Result<RateLimitInfo, PushError> {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("token", &credentials.api_token);

    let response = transport.get(&url)?;
    debug!(status = response.status, "Limits response received");

    // 错误响应（如 token 无效）不带限额 header，先暴露 API 返回的错误
    if !(200..300).contains(&response.status) {
        interpret_body(response.status, &response.body)?;
    }

    interpret_rate_limits(&response.headers)
}
