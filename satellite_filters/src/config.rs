// satellite_filters/src/config.rs

//! 客户端配置管理模块。
//!
//! 本模块定义过滤状态客户端运行所需的配置参数 (`ClientConfig`)，
//! 并提供从 JSON 配置文件加载、保存配置以及生成默认配置的功能。
//! 配置文件不存在时会写入一份默认配置；文件内容无法解析时返回 `ConfigError::Parse`，
//! 由调用方决定是否回退到默认值。

use crate::error::ConfigError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认的本地存储文件名。
pub const DEFAULT_STORAGE_FILE: &str = "openhamclock_storage.json";
/// 默认的设置同步超时（毫秒）。
pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 5_000;

/// 客户端配置，对应配置文件中的内容。缺失的字段使用默认值补齐。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// 本地键值存储文件的路径。
    pub storage_path: PathBuf,

    /// 设置同步服务的 WebSocket 地址，例如 `"ws://localhost:8080/ws/settings"`。
    /// 为 `None` 或空字符串时不进行同步。
    pub sync_server_url: Option<String>,

    /// 单次设置同步（连接、发送、等待确认）的超时时间，单位毫秒。
    pub sync_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE), // 当前工作目录下的存储文件
            sync_server_url: None,                             // 默认不同步
            sync_timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,          // 连接、发送、确认合计 5 秒
        }
    }
}

impl ClientConfig {
    /// 从 `path` 加载配置。文件不存在时写入并返回默认配置。
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("[配置模块] 未在 {:?} 找到配置文件，将创建默认配置。", path);
            let config = ClientConfig::default();
            if let Err(e) = config.save_to(path) {
                // 默认配置仍然可用，只是下次启动还会重新创建
                warn!("[配置模块] 写入默认配置到 {:?} 失败: {}", path, e);
            }
            return Ok(config);
        }
        let content = fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        info!("[配置模块] 已从 {:?} 加载客户端配置。", path);
        Ok(config)
    }

    /// 将配置以美化后的 JSON 写入 `path`，必要时创建父目录。
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("[配置模块] 已将客户端配置保存到 {:?}.", path);
        Ok(())
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }
}
