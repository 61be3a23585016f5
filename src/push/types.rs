//! 推送请求的数据模型

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PushError;

/// 消息优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    None,
    Quiet,
    #[default]
    Normal,
    High,
    Confirm,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::None,
        Priority::Quiet,
        Priority::Normal,
        Priority::High,
        Priority::Confirm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Quiet => "quiet",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Confirm => "confirm",
        }
    }

    /// API 协议中的优先级数值
    pub fn code(&self) -> i8 {
        match self {
            Priority::None => -2,
            Priority::Quiet => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Confirm => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PushError::InvalidEnum {
                field: "priority",
                value: s.to_string(),
                expected: join_names(Priority::ALL.iter().map(Priority::as_str)),
            })
    }
}

macro_rules! sounds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// 提示音，参见 https://pushover.net/api#sounds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum Sound {
            #[default]
            $($variant),+
        }

        impl Sound {
            pub const ALL: &'static [Sound] = &[$(Sound::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Sound::$variant => $name),+
                }
            }
        }
    };
}

sounds! {
    Pushover => "pushover",
    Bike => "bike",
    Bugle => "bugle",
    CashRegister => "cashregister",
    Classical => "classical",
    Cosmic => "cosmic",
    Falling => "falling",
    Gamelan => "gamelan",
    Incoming => "incoming",
    Intermission => "intermission",
    Magic => "magic",
    Mechanical => "mechanical",
    PianoBar => "pianobar",
    Siren => "siren",
    SpaceAlarm => "spacealarm",
    Tugboat => "tugboat",
    Alien => "alien",
    Climb => "climb",
    Persistent => "persistent",
    Echo => "echo",
    UpDown => "updown",
    Vibrate => "vibrate",
    None => "none",
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sound {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sound::ALL
            .iter()
            .copied()
            .find(|sound| sound.as_str() == s)
            .ok_or_else(|| PushError::InvalidEnum {
                field: "sound",
                value: s.to_string(),
                expected: join_names(Sound::ALL.iter().map(Sound::as_str)),
            })
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// CLI 传入的原始推送请求
///
/// `priority` 与 `sound` 保留原始字符串，由 [`ValidationPolicy`](super::ValidationPolicy)
/// 解析为枚举；未知值在任何网络请求之前被拒绝。
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub message: String,
    pub title: String,
    pub url: String,
    pub url_title: String,
    pub priority: String,
    pub sound: String,
    pub devices: Vec<String>,
    /// Unix 秒，0 表示不覆盖
    pub timestamp: i64,
    pub attachment: Option<PathBuf>,
}

impl Default for NotificationRequest {
    fn default() -> Self {
        Self {
            message: String::new(),
            title: String::new(),
            url: String::new(),
            url_title: String::new(),
            priority: Priority::Normal.as_str().to_string(),
            sound: Sound::Pushover.as_str().to_string(),
            devices: Vec::new(),
            timestamp: 0,
            attachment: None,
        }
    }
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// 校验后的推送内容，长度与枚举约束均已满足
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub title: String,
    pub url: String,
    pub url_title: String,
    pub priority: Priority,
    pub sound: Sound,
    pub devices: Vec<String>,
    pub timestamp: i64,
    pub attachment: Option<PathBuf>,
}

/// 受长度限制的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Message,
    Title,
    Url,
    UrlTitle,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Message => "message",
            Field::Title => "title",
            Field::Url => "url",
            Field::UrlTitle => "url_title",
        }
    }
}

/// 非致命警告，由调用方决定如何展示
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// 字段超长，已截断到 `limit` 个字符
    Truncated {
        field: Field,
        limit: usize,
        original: usize,
    },
    /// 无法从响应 header 提取限额信息
    RateLimitUnavailable(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Truncated {
                field,
                limit,
                original,
            } => write!(
                f,
                "{} has {} characters, truncated to {}",
                field.as_str(),
                original,
                limit
            ),
            Warning::RateLimitUnavailable(reason) => {
                write!(f, "could not extract API limit information: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_priority_codes() {
        assert_eq!(Priority::None.code(), -2);
        assert_eq!(Priority::Quiet.code(), -1);
        assert_eq!(Priority::Normal.code(), 0);
        assert_eq!(Priority::High.code(), 1);
        assert_eq!(Priority::Confirm.code(), 2);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnum);
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn test_priority_is_case_sensitive() {
        assert!("HIGH".parse::<Priority>().is_err());
    }

    #[test]
    fn test_sound_table() {
        assert_eq!(Sound::ALL.len(), 23);
        assert_eq!(Sound::default(), Sound::Pushover);
        assert_eq!("cashregister".parse::<Sound>().unwrap(), Sound::CashRegister);
        assert_eq!("none".parse::<Sound>().unwrap(), Sound::None);
        assert_eq!(
            "airhorn".parse::<Sound>().unwrap_err().kind(),
            ErrorKind::InvalidEnum
        );
    }

    #[test]
    fn test_request_defaults() {
        let request = NotificationRequest::new("hello");
        assert_eq!(request.priority, "normal");
        assert_eq!(request.sound, "pushover");
        assert!(request.attachment.is_none());
    }

    #[test]
    fn test_truncation_warning_display() {
        let warning = Warning::Truncated {
            field: Field::Title,
            limit: 250,
            original: 300,
        };
        assert_eq!(warning.to_string(), "title has 300 characters, truncated to 250");
    }
}
