// hamclock_server/src/ws_server/connection_registry.rs

//! 设置同步 WebSocket 会话登记表。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// 一个活动的设置同步会话。
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub connected_at: DateTime<Utc>,
    /// 该会话已处理的同步消息数。
    pub messages_handled: u64,
}

/// 所有活动会话，使用 `DashMap` 支持并发访问。
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<Uuid, SessionInfo>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个新会话并返回其 ID。
    pub fn register(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.insert(
            session_id,
            SessionInfo {
                session_id,
                connected_at: Utc::now(),
                messages_handled: 0,
            },
        );
        info!("[设置同步] 新会话已连接: id={}", session_id);
        debug!("[设置同步] 当前活动会话总数: {}", self.sessions.len());
        session_id
    }

    pub fn record_message(&self, session_id: &Uuid) {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.messages_handled += 1;
        }
    }

    pub fn get(&self, session_id: &Uuid) -> Option<SessionInfo> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// 移除会话，返回被移除的会话信息。
    pub fn unregister(&self, session_id: &Uuid) -> Option<SessionInfo> {
        match self.sessions.remove(session_id) {
            Some((_, info)) => {
                info!(
                    "[设置同步] 会话断开: id={}, 已处理消息数={}",
                    info.session_id, info.messages_handled
                );
                Some(info)
            }
            None => {
                warn!("[设置同步] 尝试移除不存在的会话: id={}", session_id);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
