//! 收藏清理服务

use std::sync::Arc;

use bookmark_roulette_remote::{urls, BookmarkKind, BookmarkSource, RemoteError};

use crate::error::{CoreError, CoreResult};
use crate::services::{HistoryService, IdentityService, RemovalCacheService, ServiceContext};
use crate::traits::BrowserHost;
use crate::types::history_key;

/// 从当前身份的收藏里删除作品。
///
/// 删除接口要求收藏关系 ID 与认证 token：关系 ID 优先查采样时顺手
/// 建的缓存，缺失时抓详情页（页面里没有再走次级端点，均在数据源层
/// 完成）。两条路都解析不到关系 ID 说明该作品并不在当前身份的收藏
/// 里，报 `BookmarkNotFound`，历史与缓存保持原样。
pub struct CleanupService {
    ctx: Arc<ServiceContext>,
    identity: IdentityService,
    history: HistoryService,
    removal_cache: RemovalCacheService,
}

impl CleanupService {
    /// 创建清理服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            identity: IdentityService::new(ctx.clone()),
            history: HistoryService::new(ctx.clone()),
            removal_cache: RemovalCacheService::new(ctx.clone()),
            ctx,
        }
    }

    /// 删除活动标签页正在展示的作品收藏。
    ///
    /// # Errors
    /// * `CoreError::NoActiveTab` - 没有活动标签页
    /// * `CoreError::WrongSiteTab` - 活动标签页不是目标站点的作品页
    pub async fn remove_current(&self) -> CoreResult<()> {
        let tab = self
            .ctx
            .browser
            .active_tab()
            .await?
            .ok_or(CoreError::NoActiveTab)?;
        let url = tab.url.clone().unwrap_or_default();
        let item_id = urls::parse_artwork_id(&url)
            .ok_or_else(|| CoreError::WrongSiteTab(url))?;

        self.remove_item(&item_id).await?;

        // 页面上的收藏按钮状态已经过期，让标签页自己刷新；失败无妨
        if let Some(tab_id) = tab.id {
            if let Err(e) = self.ctx.browser.reload_tab(tab_id).await {
                log::warn!("Tab reload after removal failed: {e}");
            }
        }
        Ok(())
    }

    /// 删除指定作品的收藏。
    pub async fn remove_item(&self, item_id: &str) -> CoreResult<()> {
        let user_id = self.identity.resolve().await?;

        let cached_relation = self.removal_cache.get(&user_id, item_id).await?;
        let info = self.ctx.source.fetch_bookmark_info(item_id).await?;

        let relation_id = cached_relation
            .or(info.relation_id)
            .ok_or_else(|| CoreError::BookmarkNotFound(item_id.to_string()))?;
        let csrf_token = info
            .csrf_token
            .ok_or(CoreError::Remote(RemoteError::TokenNotFound))?;

        self.ctx
            .source
            .remove_bookmark(&relation_id, &csrf_token)
            .await?;
        log::debug!("Removed bookmark {item_id} (relation {relation_id})");

        self.history
            .remove(&history_key(BookmarkKind::Images, item_id))
            .await?;
        self.removal_cache.evict(&user_id, item_id).await?;
        Ok(())
    }
}
