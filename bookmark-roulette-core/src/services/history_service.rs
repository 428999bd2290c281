//! 最近展示历史服务

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::SessionStore;

/// 历史条目上限；追加超出后丢最旧的
pub const RECENT_HISTORY_LIMIT: usize = 10;

/// 有界的最近展示历史（去重用，插入序 FIFO）
///
/// 不按内容去重：同一键重复追加会占多个名额，唯一硬保证是长度上限。
pub struct HistoryService {
    ctx: Arc<ServiceContext>,
}

impl HistoryService {
    /// 创建历史服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 读历史（旧在前）
    pub async fn list(&self) -> CoreResult<Vec<String>> {
        self.ctx.session.get_history().await
    }

    /// 追加一条组合键并裁剪到上限
    pub async fn append(&self, key: &str) -> CoreResult<()> {
        let mut keys = self.ctx.session.get_history().await?;
        keys.push(key.to_string());
        if keys.len() > RECENT_HISTORY_LIMIT {
            let excess = keys.len() - RECENT_HISTORY_LIMIT;
            keys.drain(..excess);
        }
        self.ctx.session.set_history(&keys).await
    }

    /// 删除指定组合键的所有出现（收藏被删除后不再滞留历史）
    pub async fn remove(&self, key: &str) -> CoreResult<()> {
        let mut keys = self.ctx.session.get_history().await?;
        let before = keys.len();
        keys.retain(|k| k != key);
        if keys.len() != before {
            self.ctx.session.set_history(&keys).await?;
        }
        Ok(())
    }
}
