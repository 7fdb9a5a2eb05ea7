// satellite_filters/src/view.rs

//! 过滤视图的派生逻辑。
//!
//! 过滤视图从不保存，每次都由当前的过滤列表和最新的数据集重新计算：
//! - 过滤列表为空：原样返回数据集（同一个切片引用；数据集缺失时仍为缺失）。
//! - 过滤列表非空：按数据集原有顺序保留名称出现在过滤列表中的记录；数据集缺失时视为空。

use common_models::satellite::NamedRecord;
use std::collections::HashSet;

/// 对某个数据集应用过滤列表之后得到的只读视图。
#[derive(Debug)]
pub enum FilteredView<'a, R> {
    /// 过滤列表为空，视图就是输入数据集本身（可能缺失）。
    Unfiltered(Option<&'a [R]>),
    /// 名称命中过滤列表的记录，保持数据集中的原始顺序。
    Filtered(Vec<&'a R>),
}

impl<'a, R> FilteredView<'a, R> {
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, FilteredView::Unfiltered(_))
    }

    /// 视图是否为“缺失”：只有过滤列表为空且输入数据集缺失时才成立。
    pub fn is_absent(&self) -> bool {
        matches!(self, FilteredView::Unfiltered(None))
    }

    /// 未过滤时返回原始切片，便于调用方判断是否仍是同一份数据。
    pub fn as_unfiltered_slice(&self) -> Option<&'a [R]> {
        match self {
            FilteredView::Unfiltered(dataset) => *dataset,
            FilteredView::Filtered(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FilteredView::Unfiltered(dataset) => dataset.map_or(0, <[R]>::len),
            FilteredView::Filtered(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 视图中的记录引用，按数据集顺序排列。缺失的视图返回空列表。
    pub fn records(&self) -> Vec<&'a R> {
        match self {
            FilteredView::Unfiltered(dataset) => dataset.map(|d| d.iter().collect()).unwrap_or_default(),
            FilteredView::Filtered(records) => records.clone(),
        }
    }
}

impl<'a, R: Clone> FilteredView<'a, R> {
    /// 复制出一份独立的记录列表。缺失的视图返回 `None`。
    pub fn to_owned_records(&self) -> Option<Vec<R>> {
        match self {
            FilteredView::Unfiltered(dataset) => dataset.map(<[R]>::to_vec),
            FilteredView::Filtered(records) => Some(records.iter().map(|r| (*r).clone()).collect()),
        }
    }
}

impl<'a, R: NamedRecord> FilteredView<'a, R> {
    /// 视图中各记录的名称，主要用于日志与测试。
    pub fn names(&self) -> Vec<&'a str> {
        self.records().into_iter().map(NamedRecord::name).collect()
    }
}

/// 根据过滤列表从数据集中派生过滤视图。纯函数，不读写任何状态。
pub fn derive_filtered_view<'a, R: NamedRecord>(
    filters: &[String],
    dataset: Option<&'a [R]>,
) -> FilteredView<'a, R> {
    if filters.is_empty() {
        return FilteredView::Unfiltered(dataset);
    }
    let selected: HashSet<&str> = filters.iter().map(String::as_str).collect();
    let records = dataset
        .unwrap_or_default()
        .iter()
        .filter(|record| selected.contains(record.name()))
        .collect();
    FilteredView::Filtered(records)
}
