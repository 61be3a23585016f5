// src/cli/push.rs
//! Push 命令 - 发送一条推送
//!
//! 超长的消息、标题、链接会被截断并输出警告；未知的优先级、提示音或无效附件直接报错。

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use super::output::{format_output, print_rate_limits, render_rate_limits};
use crate::config::ConfigStore;
use crate::error::PushError;
use crate::push::{
    parse_endpoint, HttpTransport, NotificationRequest, Submission, Submitter, Warning,
    DEFAULT_PUSH_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};

/// Push 命令参数
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Message text (truncated to 1024 characters)
    pub message: String,

    /// API endpoint for message submission
    #[arg(long, short = 'e', default_value = DEFAULT_PUSH_ENDPOINT)]
    pub api_endpoint: String,

    /// Devices to limit the push to (comma-separated)
    #[arg(long, short, value_delimiter = ',')]
    pub devices: Vec<String>,

    /// Message title (max. 250 characters)
    #[arg(long, short, default_value = "")]
    pub title: String,

    /// Supplementary URL (max. 512 characters)
    #[arg(long, default_value = "")]
    pub link_url: String,

    /// Title for the supplementary URL (max. 100 characters)
    #[arg(long, default_value = "")]
    pub link_label: String,

    /// Message priority [none, quiet, normal, high, confirm]
    #[arg(long, short, default_value = "normal")]
    pub priority: String,

    /// Playback sound, see https://pushover.net/api#sounds
    #[arg(long, short, default_value = "pushover")]
    pub sound: String,

    /// Message date and time override as unix timestamp
    #[arg(long, default_value_t = 0)]
    pub timestamp: i64,

    /// Path to image attachment (max. 2.5 MiB)
    #[arg(long, short)]
    pub attachment: Option<PathBuf>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

impl PushArgs {
    pub fn to_request(&self) -> NotificationRequest {
        NotificationRequest {
            message: self.message.clone(),
            title: self.title.clone(),
            url: self.link_url.clone(),
            url_title: self.link_label.clone(),
            priority: self.priority.clone(),
            sound: self.sound.clone(),
            devices: self.devices.clone(),
            timestamp: self.timestamp,
            attachment: self.attachment.clone().filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

/// 处理 push 命令
pub fn handle_push(args: PushArgs, store: &ConfigStore) -> Result<()> {
    let endpoint = parse_endpoint(&args.api_endpoint)?;
    let credentials = store.load()?.ok_or(PushError::NoConfiguration)?;

    let transport = HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
    let submitter = Submitter::new(transport, endpoint);

    match submitter.submit(&credentials, args.to_request()) {
        Ok(submission) => {
            report_warnings(&submission.warnings);
            print_submission(&submission, args.json)?;
            Ok(())
        }
        Err(failure) => {
            report_warnings(&failure.warnings);
            if let Some(limits) = &failure.rate_limits {
                println!("{}", render_rate_limits(limits, args.json)?);
            }
            Err(failure.error.into())
        }
    }
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        warn!("{}", warning);
    }
}

fn print_submission(submission: &Submission, json: bool) -> Result<()> {
    if json {
        println!("{}", format_output(submission)?);
        return Ok(());
    }

    println!("✓ Message pushed (request {})", submission.result.request_id);
    if let Some(limits) = &submission.rate_limits {
        print_rate_limits(limits);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        push: PushArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["pushover", "hello"]);
        let request = cli.push.to_request();
        assert_eq!(request.message, "hello");
        assert_eq!(request.priority, "normal");
        assert_eq!(request.sound, "pushover");
        assert!(request.devices.is_empty());
        assert_eq!(request.timestamp, 0);
        assert!(request.attachment.is_none());
        assert_eq!(cli.push.api_endpoint, DEFAULT_PUSH_ENDPOINT);
    }

    #[test]
    fn test_flags_map_to_request() {
        let cli = TestCli::parse_from([
            "pushover",
            "--devices=mobile,workpc",
            "-t",
            "WARNING",
            "--priority=high",
            "--link-url",
            "https://example.com",
            "--link-label",
            "Example",
            "--timestamp",
            "1700000000",
            "The following error occurred: example",
        ]);
        let request = cli.push.to_request();
        assert_eq!(request.devices, vec!["mobile", "workpc"]);
        assert_eq!(request.title, "WARNING");
        assert_eq!(request.priority, "high");
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.url_title, "Example");
        assert_eq!(request.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_unknown_priority_reaches_validation() {
        // 枚举值由校验层拒绝，CLI 只负责传递
        let cli = TestCli::parse_from(["pushover", "-p", "urgent", "hi"]);
        assert_eq!(cli.push.to_request().priority, "urgent");
    }
}
