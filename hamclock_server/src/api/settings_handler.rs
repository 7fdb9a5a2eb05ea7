// hamclock_server/src/api/settings_handler.rs

use crate::state::SharedState;
use axum::extract::State;
use axum::Json;
use common_models::settings::SettingsSnapshot;
use log::debug;

/// `GET /api/settings`: 返回最近一次通过 `/ws/settings` 同步上来的设置快照。
pub async fn get_settings(State(state): State<SharedState>) -> Json<SettingsSnapshot> {
    let snapshot = state.settings.read().await.clone();
    debug!("[设置同步] 返回 {} 项已保存设置", snapshot.len());
    Json(snapshot)
}
