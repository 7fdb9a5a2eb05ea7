// common_models/src/sync_message.rs

//! 设置同步使用的 WebSocket 消息信封。
//!
//! 客户端在本地设置变化后发送一条 `SyncAllSettings` 消息，携带完整的设置快照；
//! 服务端处理完成后以 `Ack` 回复并引用原消息的 `message_id`，无法处理时回复 `Rejected`。
//! 每条消息都带有 UUID v4 标识和 UTC 毫秒时间戳，便于追踪与调试。

use crate::settings::SettingsSnapshot;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 同步消息的业务负载。
///
/// JSON 形式为 `{"type": "...", "data": ...}`，接收方依据 `type` 解释 `data`。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SyncPayload {
    /// 客户端推送的完整设置快照，服务端用它整体替换已保存的设置。
    SyncAllSettings(SettingsSnapshot),
    /// 服务端确认已保存某条同步消息。
    Ack { message_id: String },
    /// 服务端拒绝处理某条消息（格式错误或类型不受支持）。
    Rejected { reason: String },
}

impl SyncPayload {
    /// 负载类型名称，用于日志。
    pub fn kind(&self) -> &'static str {
        match self {
            SyncPayload::SyncAllSettings(_) => "SyncAllSettings",
            SyncPayload::Ack { .. } => "Ack",
            SyncPayload::Rejected { .. } => "Rejected",
        }
    }
}

/// 客户端与服务端之间交换的设置同步消息。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyncMessage {
    /// 消息的唯一标识符 (UUID v4 字符串)。
    pub message_id: String,
    /// 消息创建时间 (Unix epoch milliseconds, UTC)。
    pub timestamp: i64,
    pub payload: SyncPayload,
}

impl SyncMessage {
    /// 用给定负载创建一条新消息，自动生成 `message_id` 与时间戳。
    pub fn new(payload: SyncPayload) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            payload,
        }
    }

    pub fn sync_all_settings(snapshot: SettingsSnapshot) -> Self {
        Self::new(SyncPayload::SyncAllSettings(snapshot))
    }

    /// 为 `message_id` 对应的消息创建确认回复。
    pub fn ack(message_id: &str) -> Self {
        Self::new(SyncPayload::Ack {
            message_id: message_id.to_string(),
        })
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(SyncPayload::Rejected {
            reason: reason.into(),
        })
    }

    /// 序列化为在 WebSocket 文本帧中发送的 JSON 字符串。
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从收到的 WebSocket 文本帧解析消息。
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
