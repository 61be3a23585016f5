//! API 响应解析 - JSON body 与限额 header

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::PushError;

pub const HEADER_APP_LIMIT: &str = "X-Limit-App-Limit";
pub const HEADER_APP_REMAINING: &str = "X-Limit-App-Remaining";
pub const HEADER_APP_RESET: &str = "X-Limit-App-Reset";

/// API 响应 body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: i64,
    #[serde(default)]
    request: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// 推送成功的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub http_status: u16,
    pub api_status: i64,
    pub request_id: String,
    pub errors: Vec<String>,
}

/// 应用限额信息，缺失的 header 对应字段保持零值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RateLimitInfo {
    pub total_per_month: i64,
    pub remaining: i64,
    pub reset_at: DateTime<Utc>,
}

/// 解析响应 body，`status != 1` 视为 API 拒绝
pub fn interpret_body(http_status: u16, raw: &str) -> Result<SubmissionResult, PushError> {
    debug!(http_status, "HTTP response received");

    let response: ApiResponse = serde_json::from_str(raw)
        .map_err(|source| PushError::MalformedResponse { http_status, source })?;

    if response.status != 1 {
        error!(
            status = response.status,
            errors = ?response.errors,
            request = %response.request,
            "API reported errors"
        );
        return Err(PushError::ApiRejected {
            status: response.status,
            request_id: response.request,
            errors: response.errors,
        });
    }

    Ok(SubmissionResult {
        http_status,
        api_status: response.status,
        request_id: response.request,
        errors: response.errors,
    })
}

/// 从响应 header 提取限额信息
pub fn interpret_rate_limits(headers: &HeaderMap) -> Result<RateLimitInfo, PushError> {
    let mut limits = RateLimitInfo::default();

    if let Some(v) = header_i64(headers, HEADER_APP_LIMIT)? {
        limits.total_per_month = v;
    }

    if let Some(v) = header_i64(headers, HEADER_APP_REMAINING)? {
        limits.remaining = v;
    }

    if let Some(v) = header_i64(headers, HEADER_APP_RESET)? {
        limits.reset_at = DateTime::from_timestamp(v, 0).ok_or_else(|| {
            PushError::MalformedRateLimitHeader {
                header: HEADER_APP_RESET,
                value: v.to_string(),
            }
        })?;
    }

    Ok(limits)
}

fn header_i64(headers: &HeaderMap, name: &'static str) -> Result<Option<i64>, PushError> {
    let Some(raw) = headers.get(name) else {
        return Ok(None);
    };

    let malformed = || PushError::MalformedRateLimitHeader {
        header: name,
        value: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
    };

    let text = raw.to_str().map_err(|_| malformed())?.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>().map(Some).map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_success_body() {
        let result = interpret_body(200, r#"{"status":1,"request":"abc123"}"#).unwrap();
        assert_eq!(result.api_status, 1);
        assert_eq!(result.request_id, "abc123");
        assert!(result.errors.is_empty());
        assert_eq!(result.http_status, 200);
    }

    #[test]
    fn test_rejected_body() {
        let err = interpret_body(400, r#"{"status":0,"errors":["invalid user"]}"#).unwrap_err();
        match err {
            PushError::ApiRejected {
                status,
                request_id,
                errors,
            } => {
                assert_eq!(status, 0);
                assert_eq!(request_id, "");
                assert_eq!(errors, vec!["invalid user".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body() {
        let err = interpret_body(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_rate_limits_from_headers() {
        let limits = interpret_rate_limits(&headers(&[
            ("X-Limit-App-Limit", "1000"),
            ("X-Limit-App-Remaining", "998"),
            ("X-Limit-App-Reset", "1700000000"),
        ]))
        .unwrap();

        assert_eq!(limits.total_per_month, 1000);
        assert_eq!(limits.remaining, 998);
        assert_eq!(limits.reset_at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_absent_headers_are_zero() {
        let limits = interpret_rate_limits(&headers(&[("X-Limit-App-Remaining", "5")])).unwrap();
        assert_eq!(limits.total_per_month, 0);
        assert_eq!(limits.remaining, 5);
        assert_eq!(limits.reset_at.timestamp(), 0);
    }

    #[test]
    fn test_malformed_header() {
        let err = interpret_rate_limits(&headers(&[("X-Limit-App-Limit", "lots")])).unwrap_err();
        match err {
            PushError::MalformedRateLimitHeader { header, value } => {
                assert_eq!(header, HEADER_APP_LIMIT);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reset_out_of_range() {
        let err = interpret_rate_limits(&headers(&[("X-Limit-App-Reset", &i64::MAX.to_string())]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRateLimitHeader);
    }
}
