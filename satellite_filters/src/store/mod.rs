// satellite_filters/src/store/mod.rs

//! 本地键值存储抽象。
//!
//! 浏览器中的本地存储在这里被建模为一个注入的能力：状态管理器只通过 `KeyValueStore`
//! 读写字符串值，从不直接访问全局状态。这样测试可以注入内存实现、故障实现，
//! 桌面或服务端环境则可以使用基于 JSON 文件的实现。

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use common_models::settings::{SettingsSnapshot, SETTINGS_KEY_PREFIX};
use std::sync::Arc;

/// 以字符串为键和值的本地存储。
///
/// 实现必须是线程安全的：状态管理器的副作用任务运行在 tokio 任务中，
/// 设置同步任务也会并发读取存储以构建快照。
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值。键不存在时返回 `Ok(None)`，存储不可访问时返回错误。
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 写入键值。配额不足或存储被禁用时返回错误，且不改变已有内容。
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// 返回所有以 `prefix` 开头的键值对，按键名排序。
    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        (**self).entries_with_prefix(prefix)
    }
}

/// 收集存储中全部 OpenHamClock 设置（`openhamclock_` 前缀）生成快照。
pub fn snapshot_settings<K: KeyValueStore + ?Sized>(store: &K) -> Result<SettingsSnapshot, StoreError> {
    let entries = store.entries_with_prefix(SETTINGS_KEY_PREFIX)?;
    Ok(SettingsSnapshot::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_models::settings::SATELLITE_FILTERS_KEY;

    #[test]
    fn test_snapshot_only_collects_prefixed_keys() {
        let store = MemoryStore::new();
        store.set(SATELLITE_FILTERS_KEY, "[\"ISS\"]").unwrap();
        store.set("openhamclock_units", "\"metric\"").unwrap();
        store.set("unrelated_app_key", "42").unwrap();

        let snapshot = snapshot_settings(&store).expect("生成设置快照失败");
        assert_eq!(snapshot.len(), 2, "只应收集带 openhamclock_ 前缀的键");
        assert_eq!(snapshot.get(SATELLITE_FILTERS_KEY), Some("[\"ISS\"]"));
        assert!(snapshot.get("unrelated_app_key").is_none());
    }

    #[test]
    fn test_snapshot_through_shared_handle() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        store.set("openhamclock_theme", "\"dark\"").unwrap();

        let shared = Arc::clone(&store);
        let snapshot = snapshot_settings(&shared).unwrap();
        assert_eq!(snapshot.get("openhamclock_theme"), Some("\"dark\""));
    }

    #[test]
    fn test_snapshot_fails_when_store_disabled() {
        let store = MemoryStore::new();
        store.disable();
        assert!(matches!(snapshot_settings(&store), Err(StoreError::Unavailable(_))));
    }
}
