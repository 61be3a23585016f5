//! Output formatting for CLI commands

use anyhow::Result;
use serde::Serialize;

use crate::push::RateLimitInfo;

/// Format output as pretty JSON for --json
pub fn format_output<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// 人类可读的限额信息
pub fn format_rate_limits(limits: &RateLimitInfo) -> String {
    format!(
        "Requests remaining: {} of {} per month (resets at {})",
        limits.remaining,
        limits.total_per_month,
        limits.reset_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )
}

/// 按输出模式渲染限额：`--json` 时为 JSON，否则为一行文本
pub fn render_rate_limits(limits: &RateLimitInfo, json: bool) -> Result<String> {
    if json {
        format_output(limits)
    } else {
        Ok(format_rate_limits(limits))
    }
}

pub fn print_rate_limits(limits: &RateLimitInfo) {
    tracing::debug!(
        requests_remaining = limits.remaining,
        requests_per_month = limits.total_per_month,
        reset_at = %limits.reset_at,
        "Rate limit information"
    );
    println!("{}", format_rate_limits(limits));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_render_rate_limits_json_mode() {
        let limits = RateLimitInfo {
            total_per_month: 10000,
            remaining: 12,
            reset_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = render_rate_limits(&limits, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["remaining"], 12);
        assert_eq!(value["total_per_month"], 10000);

        let text = render_rate_limits(&limits, false).unwrap();
        assert!(text.starts_with("Requests remaining: 12 of 10000"));
    }

    #[test]
    fn test_format_rate_limits() {
        let limits = RateLimitInfo {
            total_per_month: 10000,
            remaining: 7496,
            reset_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(
            format_rate_limits(&limits),
            "Requests remaining: 7496 of 10000 per month (resets at 2023-11-14T22:13:20Z)"
        );
    }

    #[test]
    fn test_format_output_json() {
        let json = format_output(&RateLimitInfo::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["remaining"], 0);
        assert_eq!(value["reset_at"], "1970-01-01T00:00:00Z");
    }
}
