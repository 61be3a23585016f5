//! 推送提交流程 - 校验、编码、发送、解析响应
//!
//! # 使用示例
//! ```ignore
//! use pushover_cli::push::{parse_endpoint, HttpTransport, NotificationRequest, Submitter};
//!
//! let transport = HttpTransport::new(Duration::from_secs(30))?;
//! let submitter = Submitter::new(transport, parse_endpoint(DEFAULT_PUSH_ENDPOINT)?);
//! let submission = submitter.submit(&credentials, NotificationRequest::new("Build finished"))?;
//! ```

pub mod attachment;
pub mod encoder;
pub mod response;
pub mod submit;
pub mod transport;
pub mod types;
pub mod validation;

pub use attachment::{inspect, ImageType};
pub use encoder::{encode, AttachmentPart, EncodedBody, FieldRule, FIELDS};
pub use response::{interpret_body, interpret_rate_limits, RateLimitInfo, SubmissionResult};
pub use submit::{
    check_limits, parse_endpoint, Submission, SubmitFailure, Submitter, DEFAULT_LIMITS_ENDPOINT,
    DEFAULT_PUSH_ENDPOINT,
};
pub use transport::{HttpTransport, RawResponse, Transport, DEFAULT_TIMEOUT_SECS};
pub use types::{Field, Notification, NotificationRequest, Priority, Sound, Warning};
pub use validation::{Limits, Validated, ValidationPolicy, MAX_ATTACHMENT_BYTES};
