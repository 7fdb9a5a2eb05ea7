// common_models/src/satellite.rs

//! 卫星数据集相关的共享模型。
//!
//! 过滤逻辑只依赖记录的 `name` 字段，因此这里用 `NamedRecord` trait 描述这一最小契约，
//! 同时提供一个具体的 `SatelliteRecord` 模型，保留数据源中的其余字段而不解释它们。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 用户选中的卫星名称列表。
///
/// 顺序仅用于界面显示的稳定性，不影响过滤语义。
pub type FilterList = Vec<String>;

/// 任何带有卫星名称的记录都可以参与按名称过滤。
pub trait NamedRecord {
    /// 返回记录的卫星名称，例如 `"ISS"`、`"NOAA-19"`。
    fn name(&self) -> &str;
}

/// 卫星数据集中的一条记录。
///
/// 除 `name` 之外的字段（轨道根数、可见性、颜色等）由外部数据源决定，
/// 统一保存在 `extra` 中并在序列化时原样展开。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SatelliteRecord {
    /// 卫星名称，过滤时与 `FilterList` 中的条目逐字比较。
    pub name: String,
    /// 数据源附带的其余字段。
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SatelliteRecord {
    /// 创建一个只有名称、没有附加字段的记录。
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// 附加一个字段，返回自身以便链式构造。
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl NamedRecord for SatelliteRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: NamedRecord + ?Sized> NamedRecord for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}
