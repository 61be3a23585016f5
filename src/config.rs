//! 凭据配置 - 查找、保存、清除 `config.json`
//!
//! 读取优先级：
//! 1. 环境变量 `PUSHOVER_CLI_USER` + `PUSHOVER_CLI_API`（两者都设置时完全跳过文件查找）
//! 2. 候选配置目录中第一个包含 `config.json` 的目录
//!
//! 候选目录依次为用户配置目录（如 `~/.config/pushover-cli`）和系统配置目录
//! （`$XDG_CONFIG_DIRS`，默认 `/etc/xdg/pushover-cli`）。

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const APPLICATION_NAME: &str = "pushover-cli";
pub const CONFIG_FILE: &str = "config.json";
pub const ENV_USER_KEY: &str = "PUSHOVER_CLI_USER";
pub const ENV_API_TOKEN: &str = "PUSHOVER_CLI_API";

/// 用户 key 与 API token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "user-key")]
    pub user_key: String,
    #[serde(rename = "api-token")]
    pub api_token: String,
}

impl Credentials {
    pub fn new(user_key: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
            api_token: api_token.into(),
        }
    }
}

// 日志中不输出完整凭据
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_key", &mask(&self.user_key))
            .field("api_token", &mask(&self.api_token))
            .finish()
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// 配置存储
#[derive(Debug, Clone)]
pub struct ConfigStore {
    folders: Vec<PathBuf>,
    env_override: Option<Credentials>,
}

impl ConfigStore {
    /// 使用系统默认目录和当前环境变量
    pub fn new() -> Self {
        Self {
            folders: default_folders(),
            env_override: credentials_from_env(
                std::env::var(ENV_USER_KEY).ok(),
                std::env::var(ENV_API_TOKEN).ok(),
            ),
        }
    }

    /// 使用指定目录，不读取环境变量
    pub fn with_folders(folders: Vec<PathBuf>) -> Self {
        Self {
            folders,
            env_override: None,
        }
    }

    pub fn with_env_override(mut self, credentials: Credentials) -> Self {
        self.env_override = Some(credentials);
        self
    }

    /// 候选配置目录
    pub fn paths(&self) -> &[PathBuf] {
        &self.folders
    }

    /// 第一个包含配置文件的目录
    pub fn find(&self) -> Option<PathBuf> {
        self.folders
            .iter()
            .map(|folder| folder.join(CONFIG_FILE))
            .find(|path| path.is_file())
    }

    /// 加载凭据，未找到时返回 `None`
    pub fn load(&self) -> Result<Option<Credentials>> {
        if let Some(credentials) = &self.env_override {
            debug!("Detected environment variables, ignoring configuration file");
            return Ok(Some(credentials.clone()));
        }

        for folder in &self.folders {
            debug!(path = %folder.display(), "Possible config folder");
        }

        let Some(path) = self.find() else {
            return Ok(None);
        };

        debug!(path = %path.display(), "Found config file");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let credentials: Credentials = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config json {}", path.display()))?;

        debug!(config = ?credentials, "Config loaded");
        Ok(Some(credentials))
    }

    /// 保存凭据
    ///
    /// 依次尝试每个候选目录，返回实际写入的文件路径；全部失败时报告所有尝试过的路径。
    pub fn save(&self, credentials: &Credentials) -> Result<PathBuf> {
        if self.folders.is_empty() {
            bail!("Could not guess a fitting config folder");
        }

        let data = serde_json::to_vec_pretty(credentials)
            .context("Could not convert current config into json")?;

        let mut attempts = Vec::new();
        for folder in &self.folders {
            let path = folder.join(CONFIG_FILE);
            match write_config(folder, &path, &data) {
                Ok(()) => {
                    info!(path = %path.display(), "Config saved");
                    return Ok(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not write config file");
                    attempts.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        Err(anyhow!(
            "Could not write config file to any folder:\n  {}",
            attempts.join("\n  ")
        ))
    }

    /// 删除找到的配置文件，返回被删除的路径
    pub fn clear(&self) -> Result<PathBuf> {
        let path = self
            .find()
            .ok_or_else(|| anyhow!("No config file found"))?;

        fs::remove_file(&path)
            .with_context(|| format!("Could not remove config file {}", path.display()))?;

        Ok(path)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn credentials_from_env(user: Option<String>, token: Option<String>) -> Option<Credentials> {
    match (user, token) {
        (Some(user), Some(token)) if !user.is_empty() && !token.is_empty() => {
            Some(Credentials::new(user, token))
        }
        _ => None,
    }
}

fn write_config(folder: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(folder)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn default_folders() -> Vec<PathBuf> {
    let mut folders = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        folders.push(dir.join(APPLICATION_NAME));
    }

    #[cfg(target_os = "macos")]
    folders.push(PathBuf::from("/Library/Application Support").join(APPLICATION_NAME));

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        let xdg = std::env::var("XDG_CONFIG_DIRS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "/etc/xdg".to_string());
        folders.extend(
            xdg.split(':')
                .filter(|p| !p.is_empty())
                .map(|p| PathBuf::from(p).join(APPLICATION_NAME)),
        );
    }

    folders
}
