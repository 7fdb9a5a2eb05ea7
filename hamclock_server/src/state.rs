// hamclock_server/src/state.rs

//! 服务器全局共享状态。
//!
//! 所有处理器通过 axum 的 `State` 提取器共享同一个 `Arc<AppState>`。

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::ws_server::connection_registry::SessionRegistry;
use common_models::settings::SettingsSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// 请求上游数据源的 HTTP 客户端，已配置超时与 User-Agent。
    pub http_client: reqwest::Client,
    /// 最近一次收到的设置快照，重启后丢失。
    pub settings: RwLock<SettingsSnapshot>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            http_client,
            settings: RwLock::new(SettingsSnapshot::default()),
            sessions: SessionRegistry::new(),
        })
    }

    pub fn shared(config: ServerConfig) -> Result<SharedState, ServerError> {
        Ok(Arc::new(Self::new(config)?))
    }
}
