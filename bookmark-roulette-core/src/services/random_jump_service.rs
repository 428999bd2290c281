//! 随机收藏采样服务

use std::sync::Arc;

use bookmark_roulette_remote::{BookmarkSource, RemoteError, RemoteWork};
use chrono::Utc;
use rand::Rng;

use crate::error::{CoreError, CoreResult};
use crate::services::{
    HistoryService, IdentityService, RemovalCacheService, ServiceContext, StatsService,
};
use crate::types::{history_key, BookmarkFilters, BookmarkStats};

/// 远端 API 的固定页大小
pub const DEFAULT_PER_PAGE: u64 = 48;

/// 页数计算：`max(1, ceil(total / per_page))`
#[must_use]
pub fn num_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

/// 两级随机采样：先均匀抽一页，再在页内均匀抽一条。
///
/// 远端只提供按页访问，页大小固定；两级抽样在各页等长时等价于全集
/// 均匀抽样。末页较短时存在 (末页长度 / 标准页长) 的偏差，按已知
/// 近似保留，不做校正。
pub struct RandomJumpService {
    ctx: Arc<ServiceContext>,
    identity: IdentityService,
    stats: StatsService,
    history: HistoryService,
    removal_cache: RemovalCacheService,
}

impl RandomJumpService {
    /// 创建采样服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            identity: IdentityService::new(ctx.clone()),
            stats: StatsService::new(ctx.clone()),
            history: HistoryService::new(ctx.clone()),
            removal_cache: RemovalCacheService::new(ctx.clone()),
            ctx,
        }
    }

    /// 确保统计条目可用。
    ///
    /// 缓存缺失或条目归属与当前身份不符时重新计数；重新计数失败
    /// （未登录除外）归为 `MissingStats`。
    async fn ensure_stats(
        &self,
        user_id: &str,
        filters: &BookmarkFilters,
    ) -> CoreResult<BookmarkStats> {
        if let Some(stats) = self.stats.get(user_id, filters).await? {
            if stats.user_id == user_id {
                return Ok(stats);
            }
        }

        let total = match self
            .ctx
            .source
            .fetch_total(
                user_id,
                &filters.tag_name,
                filters.visibility,
                filters.kind,
            )
            .await
        {
            Ok(total) => total,
            Err(RemoteError::LoginRequired) => return Err(RemoteError::LoginRequired.into()),
            Err(e) => return Err(CoreError::MissingStats(e.to_string())),
        };

        let stats = BookmarkStats {
            user_id: user_id.to_string(),
            tag_name: filters.tag_name.clone(),
            visibility: filters.visibility,
            kind: filters.kind,
            total,
            per_page: DEFAULT_PER_PAGE,
            updated_at: Utc::now(),
        };
        self.stats.put(&stats).await?;
        Ok(stats)
    }

    /// 采样一条最近未展示过的收藏，返回其作品 ID。
    ///
    /// 步骤：解析身份 → 确保统计 → 均匀抽页 → 抓取该页 → 按最近历史
    /// 分出未看集合（为空时回退整页）→ 页内均匀抽取 → 记历史 →
    /// 顺手缓存删除关系 ID。
    ///
    /// # Errors
    /// * `CoreError::NoBookmarksFound` - 抽到的页为空（总数为 0，或缓存
    ///   总数过期导致页号越界）
    pub async fn pick_random(&self, filters: &BookmarkFilters) -> CoreResult<String> {
        let filters = filters.clone().normalized();
        let user_id = self.identity.resolve().await?;
        let mut stats = self.ensure_stats(&user_id, &filters).await?;

        let per_page = stats.per_page.max(1);
        let total = if stats.total > 0 {
            stats.total
        } else {
            // 缓存里总数为 0 时每次都重新确认，避免永远卡在空结果上
            self.ctx
                .source
                .fetch_total(
                    &user_id,
                    &filters.tag_name,
                    filters.visibility,
                    filters.kind,
                )
                .await?
        };

        let pages = num_pages(total, per_page);
        let page_index = {
            let mut rng = rand::rng();
            rng.random_range(0..pages)
        };
        log::debug!("Sampling page {page_index}/{pages} (total={total}, perPage={per_page})");

        let page = self
            .ctx
            .source
            .fetch_bookmark_page(
                &user_id,
                &filters.tag_name,
                per_page * page_index,
                per_page,
                filters.visibility,
                filters.kind,
            )
            .await?;

        // 远端总数是事实来源；发现漂移立即回写，保证下次页数计算正确
        if page.total != stats.total {
            log::debug!("Total drifted {} -> {}", stats.total, page.total);
            stats.total = page.total;
            stats.per_page = per_page;
            stats.updated_at = Utc::now();
            self.stats.put(&stats).await?;
        }

        if page.works.is_empty() {
            return Err(CoreError::NoBookmarksFound);
        }

        let recent = self.history.list().await?;
        let unseen: Vec<&RemoteWork> = page
            .works
            .iter()
            .filter(|work| !recent.contains(&history_key(filters.kind, &work.id)))
            .collect();
        // 整页都看过时回退到整页，避免卡死
        let candidates: Vec<&RemoteWork> = if unseen.is_empty() {
            page.works.iter().collect()
        } else {
            unseen
        };

        let chosen = {
            let mut rng = rand::rng();
            candidates[rng.random_range(0..candidates.len())]
        };

        self.history
            .append(&history_key(filters.kind, &chosen.id))
            .await?;

        if let Some(relation_id) = chosen
            .bookmark_data
            .as_ref()
            .and_then(|data| data.id.as_deref())
        {
            self.removal_cache
                .store(&user_id, &chosen.id, relation_id)
                .await?;
        }

        Ok(chosen.id.clone())
    }
}
