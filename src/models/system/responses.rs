use serde::Serialize;
use ts_rs::TS;

/// 就绪检查响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct ReadyResponse {
    pub status: String,
    pub time: chrono::DateTime<chrono::Utc>,
    pub uptime_secs: i64,
}
