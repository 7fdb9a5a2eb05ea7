// satellite_filters/src/sync/ws.rs

//! 基于 WebSocket 的设置同步实现。
//!
//! 每次同步都会新建一条到设置服务 (`/ws/settings`) 的连接：发送一条携带完整设置快照的
//! `SyncAllSettings` 消息，等待引用同一 `message_id` 的 `Ack`，随后关闭连接。
//! 整个过程受 `timeout` 限制。

use super::SettingsSync;
use crate::error::SyncError;
use crate::store::{snapshot_settings, KeyValueStore};
use common_models::sync_message::{SyncMessage, SyncPayload};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

pub struct WsSettingsSync<K> {
    store: Arc<K>,
    url: Url,
    timeout: Duration,
}

impl<K: KeyValueStore + 'static> WsSettingsSync<K> {
    /// 创建同步协作者。`url` 必须是 `ws://` 或 `wss://` 地址。
    pub fn new(store: Arc<K>, url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let url = Url::parse(url).map_err(|e| SyncError::InvalidUrl(format!("'{}': {}", url, e)))?;
        if url.scheme() != "ws" && url.scheme() != "wss" {
            return Err(SyncError::InvalidUrl(format!(
                "'{}': 仅支持 ws:// 或 wss:// 协议",
                url
            )));
        }
        Ok(Self { store, url, timeout })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn push_snapshot(&self) -> Result<(), SyncError> {
        let snapshot = snapshot_settings(self.store.as_ref())?;
        let request = SyncMessage::sync_all_settings(snapshot);
        let request_json = request.to_json()?;

        let (mut ws_stream, response) = connect_async(self.url.as_str()).await?;
        debug!(
            "[设置同步] 已连接到 {} (HTTP 状态码: {})",
            self.url,
            response.status()
        );

        ws_stream.send(Message::Text(request_json)).await?;
        debug!("[设置同步] 已发送设置快照 (消息ID: {})", request.message_id);

        let outcome = loop {
            match ws_stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let reply = SyncMessage::from_json(&text)?;
                    match reply.payload {
                        SyncPayload::Ack { message_id } if message_id == request.message_id => {
                            info!("[设置同步] 服务端已确认设置快照 (消息ID: {})", message_id);
                            break Ok(());
                        }
                        SyncPayload::Rejected { reason } => break Err(SyncError::Rejected(reason)),
                        other => {
                            debug!("[设置同步] 忽略与本次同步无关的消息: {}", other.kind());
                        }
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("[设置同步] 服务端关闭了连接: {:?}", frame);
                    break Err(SyncError::ConnectionClosed);
                }
                // Ping/Pong 由 tungstenite 自动处理，二进制帧不属于同步协议
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Err(SyncError::WebSocketProtocol(e)),
                None => break Err(SyncError::ConnectionClosed),
            }
        };

        let _ = ws_stream.close(None).await;
        outcome
    }
}

impl<K: KeyValueStore + 'static> SettingsSync for WsSettingsSync<K> {
    async fn sync_all_settings(&self) -> Result<(), SyncError> {
        match tokio::time::timeout(self.timeout, self.push_snapshot()).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
