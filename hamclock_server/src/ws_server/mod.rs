// hamclock_server/src/ws_server/mod.rs

//! 设置同步 WebSocket 服务端逻辑模块。

pub mod connection_registry;
pub mod settings_session;
