// satellite_filters/src/store/memory.rs

//! 进程内的键值存储实现。
//!
//! 除了普通的读写之外，`MemoryStore` 可以模拟浏览器本地存储的两种常见故障：
//! 配额上限 (`with_quota`) 和整体禁用 (`disable`)。

use super::KeyValueStore;
use crate::error::StoreError;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    /// 键和值的总字节数上限，`None` 表示不限制。
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryInner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

/// 基于 `BTreeMap` 的线程安全内存存储。
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个总容量（键与值的字节数之和）受限的存储。
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                quota_bytes: Some(quota_bytes),
                ..MemoryInner::default()
            }),
        }
    }

    /// 禁用存储，此后所有操作都返回 `StoreError::Unavailable`。
    pub fn disable(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.disabled = true;
        }
    }

    pub fn enable(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.disabled = false;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("内存存储锁已中毒: {}", e)))?;
        if guard.disabled {
            return Err(StoreError::Unavailable("内存存储已被禁用".to_string()));
        }
        Ok(guard)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(quota) = inner.quota_bytes {
            let required = inner.used_bytes_with(key, value);
            if required > quota {
                return Err(StoreError::QuotaExceeded { required, quota });
            }
        }
        debug!("[存储] 内存存储写入键 '{}' ({} 字节)", key, value.len());
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.entries.remove(key);
        Ok(())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .lock()?
            .entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
