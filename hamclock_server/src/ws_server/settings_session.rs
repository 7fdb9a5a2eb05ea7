// hamclock_server/src/ws_server/settings_session.rs

//! `/ws/settings` 设置同步会话。
//!
//! 客户端每次同步发送一条 `SyncAllSettings` 消息，服务端用其中的快照整体替换已保存的设置，
//! 并回复引用同一 `message_id` 的 `Ack`。生成时间 (`captured_at`) 早于已保存快照的消息同样确认，
//! 但不会覆盖已保存的设置。无法解析的文本帧、二进制帧以及其他类型的消息
//! 都以 `Rejected` 回复，连接保持打开。

use crate::state::SharedState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use common_models::sync_message::{SyncMessage, SyncPayload};
use log::{debug, error, info, warn};

pub async fn settings_ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

async fn run_session(mut socket: WebSocket, state: SharedState) {
    let session_id = state.sessions.register();

    while let Some(frame) = socket.recv().await {
        let reply = match frame {
            Ok(Message::Text(text)) => handle_sync_text(&state, &text).await,
            Ok(Message::Binary(_)) => SyncMessage::rejected("仅支持文本帧"),
            Ok(Message::Close(frame)) => {
                debug!("[设置同步] 会话 {} 收到关闭帧: {:?}", session_id, frame);
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("[设置同步] 会话 {} 接收消息出错，连接可能已断开: {}", session_id, e);
                break;
            }
        };
        state.sessions.record_message(&session_id);

        let json = match reply.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("[设置同步] 序列化回复失败: {}", e);
                continue;
            }
        };
        if let Err(e) = socket.send(Message::Text(json)).await {
            warn!("[设置同步] 会话 {} 发送回复失败: {}", session_id, e);
            break;
        }
    }

    state.sessions.unregister(&session_id);
}

/// 处理一条文本同步消息并生成回复。
pub async fn handle_sync_text(state: &SharedState, text: &str) -> SyncMessage {
    let message = match SyncMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("[设置同步] 无法解析同步消息: {}", e);
            return SyncMessage::rejected(format!("无法解析同步消息: {}", e));
        }
    };

    match message.payload {
        SyncPayload::SyncAllSettings(snapshot) => {
            info!(
                "[设置同步] 收到 {} 项设置 (消息ID: {})",
                snapshot.len(),
                message.message_id
            );
            let mut stored = state.settings.write().await;
            // 每次修改都走独立连接，较早生成的快照可能后到；只保留较新的那份，但仍然确认
            if snapshot.captured_at < stored.captured_at {
                debug!(
                    "[设置同步] 忽略过期快照 (生成于 {}，已保存的生成于 {})",
                    snapshot.captured_at, stored.captured_at
                );
            } else {
                *stored = snapshot;
            }
            SyncMessage::ack(&message.message_id)
        }
        other => SyncMessage::rejected(format!("不支持的消息类型: {}", other.kind())),
    }
}
