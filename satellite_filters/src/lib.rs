//! `satellite_filters` 卫星过滤状态库。
//!
//! 本 crate 实现 OpenHamClock 卫星面板背后的状态单元：
//! 保存用户选中的卫星名称列表，在每次变化后把列表持久化到本地键值存储，
//! 并把全部本地设置以“发出即忘”的方式同步到远端设置服务；同时从任意卫星数据集派生过滤视图。
//!
//! 主要模块包括：
//! - `filter_state`: 状态管理器 `SatelliteFilterState`，负责提交、持久化与同步的副作用。
//! - `view`: 纯函数形式的过滤视图派生。
//! - `store`: 注入式的本地键值存储抽象及内存、文件两种实现。
//! - `sync`: 设置同步协作者抽象及 WebSocket 实现。
//! - `config`: 客户端配置的加载与保存。
//! - `error`: 存储、同步、配置相关的错误类型。

pub mod config;
pub mod error;
pub mod filter_state;
pub mod store;
pub mod sync;
pub mod view;

pub use common_models::satellite::{FilterList, NamedRecord, SatelliteRecord};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, StoreError, SyncError};
pub use filter_state::SatelliteFilterState;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use sync::{ConfiguredSync, DisabledSync, SettingsSync, WsSettingsSync};
pub use view::{derive_filtered_view, FilteredView};

use log::info;
use std::sync::Arc;

/// 按客户端配置打开文件存储、选择同步方式并恢复过滤状态。
///
/// 必须在 tokio 运行时中调用。
pub fn open_filter_state(config: &ClientConfig) -> Result<SatelliteFilterState, ClientError> {
    let store = Arc::new(FileStore::open(&config.storage_path)?);
    let sync = Arc::new(ConfiguredSync::from_config(config, Arc::clone(&store))?);
    info!(
        "[过滤状态] 使用存储文件 {:?}，同步服务: {}",
        store.path(),
        config.sync_server_url.as_deref().unwrap_or("未配置")
    );
    Ok(SatelliteFilterState::initialize(store, sync))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// 测试结束时自动删除的临时目录。
    pub(crate) struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        pub(crate) fn new(label: &str) -> Self {
            let path = std::env::temp_dir().join(format!("satellite_filters_{}_{}", label, uuid::Uuid::new_v4()));
            fs::create_dir_all(&path).expect("创建测试临时目录失败");
            Self { path }
        }

        pub(crate) fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                eprintln!("警告：测试后清理临时目录 '{}' 失败: {}", self.path.display(), e);
            }
        }
    }
}
