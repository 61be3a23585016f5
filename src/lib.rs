//! Pushover CLI - 通过 pushover.net 发送推送通知并查询 API 限额

pub mod cli;
pub mod config;
pub mod error;
pub mod push;

pub use config::{ConfigStore, Credentials};
pub use error::{ErrorKind, PushError};
pub use push::{
    check_limits, NotificationRequest, Priority, RateLimitInfo, Sound, Submission,
    SubmissionResult, SubmitFailure, Submitter, Warning,
};
