// satellite_filters/src/filter_state.rs

//! 卫星过滤状态管理器。
//!
//! `SatelliteFilterState` 持有用户选中的卫星名称列表，并对外提供三件事：
//! 当前列表、替换列表的 setter、以及按列表派生的过滤视图。
//!
//! # 状态提交与副作用
//! `set_filters` 只负责提交新状态：它同步地替换列表并递增修订号，随即返回。
//! 持久化与同步由一个独立的副作用任务完成，该任务通过 `tokio::sync::watch` 观察状态变化：
//! 1. 把最新列表序列化为 JSON 写入本地存储的固定键；失败只记录日志，不重试。
//! 2. 以发出即忘的方式启动一次“同步全部设置到服务器”，从不等待其结果。
//!
//! 副作用总是观察最新一次提交，连续快速的多次提交可能合并为一次副作用执行。
//! 副作用任务在创建时也会针对初始列表运行一次。
//!
//! # 错误策略
//! 管理器不向调用方暴露任何错误：存储读取失败时以空列表启动，
//! 存储写入失败和同步失败都在边界内记录日志后丢弃，过滤与显示永远不会因此中断。

use crate::store::KeyValueStore;
use crate::sync::{spawn_sync, SettingsSync};
use crate::view::{derive_filtered_view, FilteredView};
use common_models::satellite::{FilterList, NamedRecord};
use common_models::settings::SATELLITE_FILTERS_KEY;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};

/// 一次已提交的过滤列表及其修订号。
#[derive(Debug, Clone)]
struct Committed {
    revision: u64,
    filters: Arc<FilterList>,
}

/// 卫星过滤状态管理器。
///
/// 必须在 tokio 运行时中创建，副作用任务会通过 `tokio::spawn` 启动。
#[derive(Debug)]
pub struct SatelliteFilterState {
    committed: watch::Sender<Committed>,
    applied: watch::Receiver<Option<u64>>,
    effects: JoinHandle<()>,
}

impl SatelliteFilterState {
    /// 从本地存储恢复过滤列表并启动副作用任务。
    ///
    /// 存储中没有该键、存储无法访问、或保存的值不是字符串数组时，都以空列表开始。
    pub fn initialize<K, S>(store: Arc<K>, sync: Arc<S>) -> Self
    where
        K: KeyValueStore + ?Sized + 'static,
        S: SettingsSync,
    {
        let initial = load_filters(store.as_ref());
        info!("[过滤状态] 已恢复 {} 个卫星过滤条件。", initial.len());

        let mounted = Committed {
            revision: 0,
            filters: Arc::new(initial),
        };
        let (committed, committed_rx) = watch::channel(mounted.clone());
        // 副作用任务第一次运行之前没有任何已应用的修订
        let (applied_tx, applied) = watch::channel(None);
        let effects = tokio::spawn(run_effects(mounted, committed_rx, applied_tx, store, sync));

        Self {
            committed,
            applied,
            effects,
        }
    }

    /// 当前的过滤列表。
    pub fn filters(&self) -> Arc<FilterList> {
        Arc::clone(&self.committed.borrow().filters)
    }

    /// 替换过滤列表。不校验列表内容，数据集中不存在的名称同样被接受。
    pub fn set_filters(&self, filters: FilterList) {
        let filters = Arc::new(filters);
        self.committed.send_modify(|current| {
            current.revision += 1;
            current.filters = filters;
        });
        debug!("[过滤状态] 已提交过滤列表修订 {}", self.committed.borrow().revision);
    }

    /// 名称已在列表中则移除，否则追加到末尾。
    pub fn toggle_filter(&self, name: &str) {
        let mut next: FilterList = self.filters().as_ref().clone();
        if let Some(pos) = next.iter().position(|n| n == name) {
            next.remove(pos);
        } else {
            next.push(name.to_string());
        }
        self.set_filters(next);
    }

    pub fn clear_filters(&self) {
        self.set_filters(Vec::new());
    }

    /// 用当前过滤列表派生 `dataset` 的过滤视图。
    pub fn filtered_view<'a, R: NamedRecord>(&self, dataset: Option<&'a [R]>) -> FilteredView<'a, R> {
        let filters = self.filters();
        derive_filtered_view(&filters, dataset)
    }

    /// 等待副作用任务处理完截至目前的最新提交（持久化已完成、同步已发出）。
    ///
    /// 过滤视图从不依赖此方法；它用于测试和退出前的收尾。
    pub async fn settled(&self) {
        let target = self.committed.borrow().revision;
        let mut applied = self.applied.clone();
        let _ = applied
            .wait_for(|revision| revision.is_some_and(|r| r >= target))
            .await;
    }

    /// 停止接收新的提交，等待副作用任务处理完最后一次提交后退出。
    pub async fn shutdown(self) {
        let Self {
            committed, effects, ..
        } = self;
        drop(committed);
        if let Err(e) = effects.await {
            warn!("[过滤状态] 副作用任务异常结束: {}", e);
        }
    }
}

/// 副作用任务：先针对创建时的列表运行一次，之后每观察到一次提交，
/// 就持久化最新列表并发出一次同步。
async fn run_effects<K, S>(
    mounted: Committed,
    mut committed: watch::Receiver<Committed>,
    applied: watch::Sender<Option<u64>>,
    store: Arc<K>,
    sync: Arc<S>,
) where
    K: KeyValueStore + ?Sized + 'static,
    S: SettingsSync,
{
    let mut latest = mounted;
    loop {
        // 文件存储的写入是阻塞 I/O，放到阻塞线程池中执行
        let (store_for_write, filters) = (Arc::clone(&store), Arc::clone(&latest.filters));
        if let Err(e) = task::spawn_blocking(move || persist_filters(store_for_write.as_ref(), &filters)).await {
            warn!("[过滤状态] 持久化任务异常结束: {}", e);
        }
        // 发出即忘：不保存 JoinHandle，不等待结果
        drop(spawn_sync(Arc::clone(&sync)));
        applied.send_replace(Some(latest.revision));

        if committed.changed().await.is_err() {
            debug!("[过滤状态] 状态管理器已释放，副作用任务结束。");
            break;
        }
        latest = committed.borrow_and_update().clone();
    }
}

/// 从存储读取过滤列表，任何失败都回退为空列表。
fn load_filters<K: KeyValueStore + ?Sized>(store: &K) -> FilterList {
    match store.get(SATELLITE_FILTERS_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<FilterList>(&raw).unwrap_or_else(|e| {
            warn!("[过滤状态] 已保存的过滤列表无法解析 ({}), 使用空列表。", e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("[过滤状态] 读取本地存储失败 ({}), 使用空列表。", e);
            Vec::new()
        }
    }
}

/// 把过滤列表写入存储。失败只记录日志，不重试。
fn persist_filters<K: KeyValueStore + ?Sized>(store: &K, filters: &[String]) {
    let encoded = match serde_json::to_string(filters) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!("[过滤状态] 序列化过滤列表失败，已忽略: {}", e);
            return;
        }
    };
    match store.set(SATELLITE_FILTERS_KEY, &encoded) {
        Ok(()) => debug!("[过滤状态] 已持久化 {} 个过滤条件。", filters.len()),
        Err(e) => warn!("[过滤状态] 持久化过滤列表失败，已忽略: {}", e),
    }
}
