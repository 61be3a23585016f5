//! 请求编码 - URL-encoded 表单或 multipart（带附件时）
//!
//! 可选字段是否发送由 [`FIELDS`] 表决定，每条规则独立返回 `Some(value)` 或 `None`。

use std::fs;
use std::path::Path;

use super::attachment::ImageType;
use super::types::{Notification, Priority, Sound};
use crate::config::Credentials;
use crate::error::PushError;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 编码规则的输入
pub struct FieldSource<'a> {
    pub credentials: &'a Credentials,
    pub notification: &'a Notification,
}

/// 单个表单字段的发送规则
pub struct FieldRule {
    pub name: &'static str,
    pub encode: fn(&FieldSource<'_>) -> Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// 字段规则表，顺序即编码顺序
pub const FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "token",
        encode: |s| Some(s.credentials.api_token.clone()),
    },
    FieldRule {
        name: "user",
        encode: |s| Some(s.credentials.user_key.clone()),
    },
    FieldRule {
        name: "message",
        encode: |s| Some(s.notification.message.clone()),
    },
    FieldRule {
        name: "priority",
        encode: |s| {
            (s.notification.priority != Priority::Normal)
                .then(|| s.notification.priority.code().to_string())
        },
    },
    FieldRule {
        name: "device",
        encode: |s| {
            (!s.notification.devices.is_empty()).then(|| s.notification.devices.join(","))
        },
    },
    FieldRule {
        name: "title",
        encode: |s| non_empty(&s.notification.title),
    },
    FieldRule {
        name: "url",
        encode: |s| non_empty(&s.notification.url),
    },
    FieldRule {
        name: "url_title",
        encode: |s| {
            if s.notification.url.is_empty() {
                None
            } else {
                non_empty(&s.notification.url_title)
            }
        },
    },
    FieldRule {
        name: "sound",
        encode: |s| {
            (s.notification.sound != Sound::Pushover)
                .then(|| s.notification.sound.as_str().to_string())
        },
    },
    FieldRule {
        name: "timestamp",
        encode: |s| (s.notification.timestamp != 0).then(|| s.notification.timestamp.to_string()),
    },
];

/// 附件部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// 编码后的请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedBody {
    Form(String),
    Multipart {
        fields: Vec<(&'static str, String)>,
        attachment: AttachmentPart,
    },
}

impl EncodedBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, EncodedBody::Multipart { .. })
    }

    /// 表单模式下的 Content-Length；multipart 由 HTTP 客户端计算
    pub fn content_length(&self) -> Option<usize> {
        match self {
            EncodedBody::Form(encoded) => Some(encoded.len()),
            EncodedBody::Multipart { .. } => None,
        }
    }

    /// 取出某个字段的值（不含附件）
    pub fn field(&self, name: &str) -> Option<String> {
        match self {
            EncodedBody::Form(encoded) => url::form_urlencoded::parse(encoded.as_bytes())
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned()),
            EncodedBody::Multipart { fields, .. } => fields
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone()),
        }
    }
}

/// 按规则表收集需要发送的字段
pub fn collect_fields(
    credentials: &Credentials,
    notification: &Notification,
) -> Vec<(&'static str, String)> {
    let source = FieldSource {
        credentials,
        notification,
    };
    FIELDS
        .iter()
        .filter_map(|rule| (rule.encode)(&source).map(|value| (rule.name, value)))
        .collect()
}

/// 编码请求
///
/// 有附件时使用 multipart，`image_type` 为附件识别结果；否则使用 URL-encoded 表单。
pub fn encode(
    credentials: &Credentials,
    notification: &Notification,
    image_type: Option<&ImageType>,
) -> Result<EncodedBody, PushError> {
    let fields = collect_fields(credentials, notification);

    match &notification.attachment {
        None => {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            Ok(EncodedBody::Form(encoded))
        }
        Some(path) => {
            let attachment = attachment_part(path, image_type)?;
            Ok(EncodedBody::Multipart { fields, attachment })
        }
    }
}

fn attachment_part(path: &Path, image_type: Option<&ImageType>) -> Result<AttachmentPart, PushError> {
    let bytes = fs::read(path).map_err(|source| PushError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    Ok(AttachmentPart {
        file_name,
        mime_type: image_type
            .map(ImageType::mime_type)
            .unwrap_or("application/octet-stream"),
        bytes,
    })
}
