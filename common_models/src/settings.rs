// common_models/src/settings.rs

//! 本地设置的快照模型与存储键名。

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 所有 OpenHamClock 设置在本地键值存储中共用的键前缀。
pub const SETTINGS_KEY_PREFIX: &str = "openhamclock_";

/// 卫星过滤列表在本地键值存储中使用的固定键名。
pub const SATELLITE_FILTERS_KEY: &str = "openhamclock_satelliteFilters";

/// 某一时刻本地全部设置的有序快照。
///
/// 键为完整的存储键名（含 `openhamclock_` 前缀），值为存储中的原始字符串，
/// 快照不会尝试解析这些值。使用 `BTreeMap` 保证序列化结果的键顺序稳定。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SettingsSnapshot {
    /// 键名到原始字符串值的映射。
    pub entries: BTreeMap<String, String>,
    /// 快照生成时间 (Unix epoch milliseconds)。
    pub captured_at: i64,
}

impl SettingsSnapshot {
    /// 从键值对集合创建快照，时间戳取当前时间。
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
            captured_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
