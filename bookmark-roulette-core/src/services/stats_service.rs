//! 收藏统计缓存服务
//!
//! 条目按 (用户, 类型, 可见性, 标签) 存取。扩展升级过两次键形态，
//! 读取时沿旧键链回退，命中后改写到最新键下，避免升级丢掉已有统计。

use std::sync::Arc;

use bookmark_roulette_remote::{BookmarkKind, Visibility};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::SessionStore;
use crate::types::{BookmarkFilters, BookmarkStats};

/// 统计缓存的读写与旧键迁移
pub struct StatsService {
    ctx: Arc<ServiceContext>,
}

impl StatsService {
    /// 创建统计服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 查询统计条目。
    ///
    /// 回退顺序：当前键（含类型与可见性）→ 无类型旧键（仅当类型取默认
    /// 值时适用）→ 仅标签旧键（仅当类型与可见性都取默认值时适用）。
    /// 旧键命中即改写到当前键并删除旧键，先命中者胜出。
    pub async fn get(
        &self,
        user_id: &str,
        filters: &BookmarkFilters,
    ) -> CoreResult<Option<BookmarkStats>> {
        let filters = filters.clone().normalized();
        let current_key =
            BookmarkStats::storage_key(user_id, filters.kind, filters.visibility, &filters.tag_name);

        if let Some(stats) = self.ctx.session.get_stats(&current_key).await? {
            return Ok(Some(stats));
        }

        let mut legacy_keys = Vec::new();
        if filters.kind == BookmarkKind::default() {
            legacy_keys.push(BookmarkStats::legacy_visibility_key(
                user_id,
                filters.visibility,
                &filters.tag_name,
            ));
            if filters.visibility == Visibility::default() {
                legacy_keys.push(BookmarkStats::legacy_tag_key(user_id, &filters.tag_name));
            }
        }

        for legacy_key in legacy_keys {
            if let Some(mut stats) = self.ctx.session.get_stats(&legacy_key).await? {
                log::debug!("Migrating stats entry {legacy_key} -> {current_key}");
                // 旧条目缺失的字段已由 serde 默认值补齐；对齐到查询组合
                stats.visibility = filters.visibility;
                stats.kind = filters.kind;
                self.ctx.session.set_stats(&current_key, &stats).await?;
                self.ctx.session.remove_stats(&legacy_key).await?;
                return Ok(Some(stats));
            }
        }

        Ok(None)
    }

    /// 写入统计条目（键由条目自身字段导出）
    pub async fn put(&self, stats: &BookmarkStats) -> CoreResult<()> {
        self.ctx.session.set_stats(&stats.own_key(), stats).await
    }
}
