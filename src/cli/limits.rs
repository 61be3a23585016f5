// src/cli/limits.rs
//! Limits 命令 - 查询当前应用的 API 限额

use anyhow::Result;
use clap::Args;
use std::time::Duration;

use super::output::{format_output, print_rate_limits};
use crate::config::ConfigStore;
use crate::error::PushError;
use crate::push::{check_limits, parse_endpoint, HttpTransport, DEFAULT_LIMITS_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Limits 命令参数
#[derive(Args, Debug)]
pub struct LimitsArgs {
    /// API endpoint for limit requests
    #[arg(long, short = 'e', default_value = DEFAULT_LIMITS_ENDPOINT)]
    pub api_endpoint: String,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 limits 命令
pub fn handle_limits(args: LimitsArgs, store: &ConfigStore) -> Result<()> {
    let endpoint = parse_endpoint(&args.api_endpoint)?;
    let credentials = store.load()?.ok_or(PushError::NoConfiguration)?;

    let transport = HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
    let limits = check_limits(&transport, &endpoint, &credentials)?;

    if args.json {
        println!("{}", format_output(&limits)?);
    } else {
        print_rate_limits(&limits);
    }
    Ok(())
}
