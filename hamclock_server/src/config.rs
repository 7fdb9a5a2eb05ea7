// hamclock_server/src/config.rs

//! 开发服务器配置模块。
//!
//! 配置保存在 JSON 文件中（默认为当前目录下的 `hamclock_server.json`，
//! 可通过环境变量 `HAMCLOCK_CONFIG` 指定其他路径）。
//! 文件不存在时写入默认配置；文件损坏时记录警告，使用默认配置并覆盖原文件。
//! 命令行第一个参数可覆盖监听端口。

use crate::error::ServerError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件名。
pub const CONFIG_FILE_NAME: &str = "hamclock_server.json";
/// 指定配置文件路径的环境变量。
pub const CONFIG_PATH_ENV: &str = "HAMCLOCK_CONFIG";
/// 默认监听地址
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// 默认监听端口
pub const DEFAULT_PORT: u16 = 8080;

/// 内置的上游数据源，名称即 `/api/{name}` 中的端点名。
pub fn default_endpoints() -> BTreeMap<String, String> {
    [
        ("solarflux", "https://services.swpc.noaa.gov/json/solar-cycle/observed-solar-flux.json"),
        ("kindex", "https://services.swpc.noaa.gov/json/planetary_k_index_1m.json"),
        ("xray", "https://services.swpc.noaa.gov/json/goes/primary/xrays-7-day.json"),
        ("sunspots", "https://services.swpc.noaa.gov/json/solar-cycle/sunspots.json"),
        ("pota", "https://api.pota.app/spot/activator"),
        ("bands", "https://www.hamqsl.com/solarxml.php"),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), url.to_string()))
    .collect()
}

/// 开发服务器配置。缺失的字段使用默认值补齐。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听的主机地址
    pub host: String,
    /// 监听的端口号
    pub port: u16,
    /// 静态文件根目录
    pub static_dir: PathBuf,
    /// 请求上游数据源的超时时间（单位：秒）
    pub upstream_timeout_secs: u64,
    /// 代理响应的 `Cache-Control: max-age`（单位：秒）
    pub cache_max_age_secs: u64,
    /// 请求上游时使用的 User-Agent
    pub user_agent: String,
    /// 日志级别
    pub log_level: String,
    /// 端点名称到上游 URL 的映射
    pub endpoints: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),               // 默认监听所有网络接口
            port: DEFAULT_PORT,                           // 默认监听 8080 端口
            static_dir: PathBuf::from("."),               // 默认从当前目录提供静态文件
            upstream_timeout_secs: 10,                    // 上游 10 秒无响应即视为失败
            cache_max_age_secs: 60,                       // 浏览器缓存代理数据 60 秒
            user_agent: "OpenHamClock/1.0".to_string(),   // 与原开发服务器相同的 UA
            log_level: "info".to_string(),
            endpoints: default_endpoints(),
        }
    }
}

impl ServerConfig {
    /// 加载配置文件，失败时回退到默认配置并尝试写回磁盘。
    pub fn load_or_create(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ServerConfig>(&content) {
                Ok(config) => {
                    info!("[配置模块] 已成功从配置文件 {:?} 加载服务器配置。", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "[配置模块] 警告：从 {:?} 反序列化配置失败: {}. 文件可能已损坏。将使用默认配置并尝试覆盖。",
                        path, e
                    );
                    let config = ServerConfig::default();
                    config.save(path);
                    config
                }
            },
            Err(e) => {
                info!(
                    "[配置模块] 未在 {:?} 找到配置文件或读取时发生错误 (错误: {}). 将使用默认配置并尝试创建新文件。",
                    path, e
                );
                let config = ServerConfig::default();
                config.save(path);
                config
            }
        }
    }

    /// 把配置写入 `path`，失败只记录日志。
    pub fn save(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("[配置模块] 错误：创建配置目录 {:?} 失败: {}", parent, e);
                    return;
                }
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    warn!("[配置模块] 错误：将配置写入文件 {:?} 时失败: {}", path, e);
                } else {
                    info!("[配置模块] 已将服务器配置保存到 {:?}.", path);
                }
            }
            Err(e) => warn!("[配置模块] 错误：序列化配置信息以便保存时失败: {}", e),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// 解析 `log_level`，无法识别时回退到 `Info`。
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// 配置文件路径：优先使用 `HAMCLOCK_CONFIG`，否则为当前目录下的 `hamclock_server.json`。
pub fn config_file_path() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

/// 从命令行参数（不含程序名）中解析端口覆盖值。
pub fn port_from_args<I, S>(args: I) -> Result<Option<u16>, ServerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match args.into_iter().next() {
        Some(arg) => {
            let arg = arg.as_ref();
            arg.parse::<u16>()
                .map(Some)
                .map_err(|_| ServerError::InvalidPort(arg.to_string()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempDir;

    #[test]
    fn test_load_or_create_config() {
        let dir = TempDir::new("server_config");
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        // 场景 1: 文件不存在，返回默认配置并创建文件
        let created = ServerConfig::load_or_create(&config_path);
        assert_eq!(created, ServerConfig::default());
        assert!(config_path.exists());

        // 场景 2: 修改后保存再加载
        let modified = ServerConfig {
            port: 9090,
            cache_max_age_secs: 5,
            ..created
        };
        modified.save(&config_path);
        assert_eq!(ServerConfig::load_or_create(&config_path), modified);

        // 场景 3: 文件损坏时回退到默认配置并覆盖
        fs::write(&config_path, "{ 不是 JSON").unwrap();
        assert_eq!(ServerConfig::load_or_create(&config_path), ServerConfig::default());
        let rewritten: ServerConfig = serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(rewritten, ServerConfig::default());
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(10));
        assert_eq!(config.user_agent, "OpenHamClock/1.0");
        let names: Vec<&str> = config.endpoints.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["bands", "kindex", "pota", "solarflux", "sunspots", "xray"]);
    }

    #[test]
    fn test_partial_config_keeps_default_endpoints() {
        let config: ServerConfig = serde_json::from_str(r#"{"port": 3000}"#).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.endpoints, default_endpoints());
    }

    #[test]
    fn test_port_from_args() {
        assert_eq!(port_from_args(Vec::<String>::new()).unwrap(), None);
        assert_eq!(port_from_args(["8000"]).unwrap(), Some(8000));
        assert!(matches!(port_from_args(["http"]), Err(ServerError::InvalidPort(p)) if p == "http"));
        assert!(port_from_args(["70000"]).is_err());
    }
}
