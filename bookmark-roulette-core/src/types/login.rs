//! 登录状态缓存

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 最近一次身份解析的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    /// 是否已登录
    pub is_logged_in: bool,
    /// 检查时间
    pub checked_at: DateTime<Utc>,
}

impl LoginStatus {
    /// 以当前时间构造
    #[must_use]
    pub fn new(is_logged_in: bool, now: DateTime<Utc>) -> Self {
        Self {
            is_logged_in,
            checked_at: now,
        }
    }
}
