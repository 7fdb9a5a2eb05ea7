// satellite_filters/src/store/file.rs

//! 基于 JSON 文件的键值存储，在桌面或服务端环境中代替浏览器本地存储。
//!
//! 文件内容是一个 JSON 对象 (`{"键": "值"}`)。打开时整体读入内存，
//! 每次 `set`/`remove` 都先写入临时文件再重命名覆盖，写入成功后才更新内存中的副本。

use super::KeyValueStore;
use crate::error::StoreError;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// 打开（或准备创建）位于 `path` 的存储文件。
    ///
    /// - 文件不存在：以空存储开始，首次写入时创建文件。
    /// - 文件内容不是合法的 JSON 对象：记录警告并以空存储开始，下次写入时覆盖。
    /// - 其他读取错误（例如权限不足）：返回 `StoreError::Io`。
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    info!("[存储] 已从 {:?} 加载 {} 个键。", path, entries.len());
                    entries
                }
                Err(e) => {
                    warn!("[存储] 存储文件 {:?} 内容无法解析 ({}), 将以空存储开始。", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("[存储] 存储文件 {:?} 不存在，将在首次写入时创建。", path);
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("文件存储锁已中毒: {}", e)))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("[存储] 已将 {} 个键写入 {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
