// satellite_filters/src/error.rs

//! 定义卫星过滤状态库相关的错误类型。
//!
//! 注意：这些错误只在存储、同步与配置的边界上产生。`SatelliteFilterState` 自身从不向调用方
//! 返回错误，持久化与同步失败都在状态管理器内部记录日志后丢弃。

use thiserror::Error;

/// 本地键值存储的错误类型。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 存储被禁用或当前无法访问（例如浏览器关闭了本地存储、锁已中毒）。
    #[error("存储不可用: {0}")]
    Unavailable(String),

    /// 写入后的数据量超出存储配额。
    #[error("存储配额已满: 需要 {required} 字节，上限 {quota} 字节")]
    QuotaExceeded { required: usize, quota: usize },

    /// 底层文件 I/O 错误。
    #[error("存储 I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 存储内容的序列化或反序列化失败。
    #[error("存储序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 设置同步的错误类型。
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("无效的同步服务 URL: {0}")]
    InvalidUrl(String),

    /// WebSocket 连接或收发过程中的协议错误。
    #[error("WebSocket协议错误: {0}")]
    WebSocketProtocol(#[from] tokio_tungstenite::tungstenite::Error),

    /// 在限定时间内没有收到服务端确认。
    #[error("设置同步超时 ({0} 毫秒)")]
    Timeout(u64),

    /// 服务端明确拒绝了本次同步。
    #[error("服务端拒绝了设置同步: {0}")]
    Rejected(String),

    #[error("连接在收到确认之前已关闭")]
    ConnectionClosed,

    #[error("同步消息序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 构建设置快照时读取本地存储失败。
    #[error("读取本地设置失败: {0}")]
    Store(#[from] StoreError),
}

/// 客户端配置文件的错误类型。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读写配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 按配置打开过滤状态时可能出现的错误。
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
