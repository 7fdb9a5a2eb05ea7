// satellite_filters/src/sync/mod.rs

//! 设置同步协作者。
//!
//! 状态管理器在每次过滤列表变化后调用一次“同步全部设置到服务器”的操作。
//! 该操作不带参数：协作者自己决定同步什么（这里是存储中全部 `openhamclock_` 设置）以及如何传输。
//! 调用方以“发出即忘”的方式使用它：`spawn_sync` 在独立的 tokio 任务中运行同步，
//! 失败只记录日志，永远不会回到状态管理器。

mod ws;

pub use ws::WsSettingsSync;

use crate::config::ClientConfig;
use crate::error::SyncError;
use crate::store::KeyValueStore;
use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 把本地全部设置推送到远端设置服务的协作者。
pub trait SettingsSync: Send + Sync + 'static {
    fn sync_all_settings(&self) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// 未配置同步服务时使用的空实现。
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSync;

impl SettingsSync for DisabledSync {
    async fn sync_all_settings(&self) -> Result<(), SyncError> {
        debug!("[设置同步] 未配置同步服务，跳过本次同步。");
        Ok(())
    }
}

/// 根据客户端配置选择的同步方式。
pub enum ConfiguredSync<K> {
    Disabled(DisabledSync),
    WebSocket(WsSettingsSync<K>),
}

impl<K: KeyValueStore + 'static> ConfiguredSync<K> {
    /// 配置中给出了 `sync_server_url` 时使用 WebSocket 同步，否则禁用同步。
    pub fn from_config(config: &ClientConfig, store: Arc<K>) -> Result<Self, SyncError> {
        match config.sync_server_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(ConfiguredSync::WebSocket(WsSettingsSync::new(
                store,
                url,
                config.sync_timeout(),
            )?)),
            _ => Ok(ConfiguredSync::Disabled(DisabledSync)),
        }
    }
}

impl<K: KeyValueStore + 'static> SettingsSync for ConfiguredSync<K> {
    async fn sync_all_settings(&self) -> Result<(), SyncError> {
        match self {
            ConfiguredSync::Disabled(sync) => sync.sync_all_settings().await,
            ConfiguredSync::WebSocket(sync) => sync.sync_all_settings().await,
        }
    }
}

/// 在后台任务中运行一次同步，不等待其完成。
///
/// 返回的 `JoinHandle` 仅供需要观察任务结束的调用方（例如测试）使用；
/// 状态管理器直接丢弃它。同步失败在任务内部以 `warn!` 记录后丢弃。
pub fn spawn_sync<S: SettingsSync>(sync: Arc<S>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sync.sync_all_settings().await {
            Ok(()) => debug!("[设置同步] 设置同步完成。"),
            Err(e) => warn!("[设置同步] 设置同步失败，已忽略: {}", e),
        }
    })
}
