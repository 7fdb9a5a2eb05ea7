// hamclock_server/src/api/mod.rs

//! HTTP API 请求处理模块。
//!
//! - `proxy_handler`: `/api/{endpoint}`，把请求转发到配置的上游数据源。
//! - `settings_handler`: `/api/settings`，返回最近一次同步上来的设置快照。

pub mod proxy_handler;
pub mod settings_handler;
