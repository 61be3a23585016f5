//! 推送字段校验 - 长度截断、枚举解析、附件大小检查

use std::fs;
use std::path::Path;
use tracing::debug;

use super::types::{Field, Notification, NotificationRequest, Priority, Sound, Warning};
use crate::error::PushError;

/// 附件最大 2.5 MiB
pub const MAX_ATTACHMENT_BYTES: u64 = 2_621_440;

/// 字段长度上限（按 Unicode 字符计数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub message: usize,
    pub title: usize,
    pub url: usize,
    pub url_title: usize,
    pub attachment_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            message: 1024,
            title: 250,
            url: 512,
            url_title: 100,
            attachment_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

/// 校验结果：合法的推送内容与截断警告
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub notification: Notification,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationPolicy {
    limits: Limits,
}

impl ValidationPolicy {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// 校验并截断请求
    ///
    /// 超长字段不会报错，只截断并记录 [`Warning::Truncated`]。
    /// 未知的优先级或提示音、缺失或过大的附件为致命错误。
    pub fn validate(&self, request: NotificationRequest) -> Result<Validated, PushError> {
        let priority: Priority = request.priority.parse()?;
        let sound: Sound = request.sound.parse()?;

        if let Some(path) = &request.attachment {
            self.check_attachment(path)?;
        }

        let mut warnings = Vec::new();
        let mut clip = |field: Field, value: String, limit: usize| {
            let (value, original) = truncate_chars(value, limit);
            if let Some(original) = original {
                warnings.push(Warning::Truncated {
                    field,
                    limit,
                    original,
                });
            }
            value
        };

        let notification = Notification {
            message: clip(Field::Message, request.message, self.limits.message),
            title: clip(Field::Title, request.title, self.limits.title),
            url: clip(Field::Url, request.url, self.limits.url),
            url_title: clip(Field::UrlTitle, request.url_title, self.limits.url_title),
            priority,
            sound,
            devices: normalize_devices(request.devices),
            timestamp: request.timestamp,
            attachment: request.attachment,
        };

        Ok(Validated {
            notification,
            warnings,
        })
    }

    /// 只检查文件元数据，不读取内容
    fn check_attachment(&self, path: &Path) -> Result<(), PushError> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PushError::AttachmentNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(PushError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        if !metadata.is_file() {
            return Err(PushError::AttachmentNotFound {
                path: path.to_path_buf(),
            });
        }

        let size = metadata.len();
        debug!(path = %path.display(), size, "Attachment found");

        if size > self.limits.attachment_bytes {
            return Err(PushError::AttachmentTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.limits.attachment_bytes,
            });
        }

        Ok(())
    }
}

/// 保留前 `limit` 个字符；发生截断时返回原始字符数
fn truncate_chars(value: String, limit: usize) -> (String, Option<usize>) {
    match value.char_indices().nth(limit) {
        None => (value, None),
        Some((byte_idx, _)) => {
            let original = value.chars().count();
            let mut value = value;
            value.truncate(byte_idx);
            (value, Some(original))
        }
    }
}

/// 去掉空白项和重复项，保持原有顺序
fn normalize_devices(devices: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(devices.len());
    for device in devices {
        let device = device.trim();
        if !device.is_empty() && !out.iter().any(|d| d == device) {
            out.push(device.to_string());
        }
    }
    out
}
