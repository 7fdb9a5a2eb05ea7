//! `common_models` 公共模型库 crate。
//!
//! 本 crate 集中定义了 OpenHamClock 各个 Rust 组件（`satellite_filters` 客户端状态库、
//! `hamclock_server` 开发服务器）之间共享的核心数据结构。
//!
//! 主要包含以下类型的模型：
//! - **卫星记录 (`satellite`)**: 卫星数据集中的单条记录，以及按名称过滤所需的 `NamedRecord` trait。
//! - **设置快照 (`settings`)**: 本地存储中所有 `openhamclock_` 前缀键值的有序快照，以及固定的存储键名。
//! - **同步消息 (`sync_message`)**: 客户端与服务端之间通过 WebSocket 传输设置快照时使用的消息信封。
//!
//! 所有模型都派生 `serde::Serialize` / `serde::Deserialize`，以 JSON 作为持久化与网络传输格式；
//! 同时派生 `Debug` 与 `Clone`，方便调试输出和创建副本。

pub mod satellite; // 卫星记录与名称过滤相关的模型
pub mod settings; // 设置快照与存储键名常量
pub mod sync_message; // 设置同步 WebSocket 消息信封
