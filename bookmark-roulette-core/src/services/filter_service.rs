//! 会话过滤状态服务

use std::sync::Arc;

use bookmark_roulette_remote::urls;
use chrono::Utc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::SessionStore;
use crate::types::{BookmarkFilters, FilterUpdate};

/// 当前过滤三元组（标签 / 可见性 / 收藏类型）的读写与同步
pub struct FilterService {
    ctx: Arc<ServiceContext>,
}

impl FilterService {
    /// 创建过滤服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 读当前过滤条件（无记录时返回默认值，总是已归一化）
    pub async fn current(&self) -> CoreResult<BookmarkFilters> {
        Ok(self
            .ctx
            .session
            .get_filters()
            .await?
            .unwrap_or_default()
            .normalized())
    }

    /// 合并部分更新并写回，返回更新后的状态
    pub async fn update(&self, update: FilterUpdate) -> CoreResult<BookmarkFilters> {
        let filters = self.current().await?.merged(update, Utc::now());
        self.ctx.session.set_filters(&filters).await?;
        Ok(filters)
    }

    /// 按活动标签页 URL 同步过滤状态。
    ///
    /// URL 是收藏列表页时，把其中内嵌的标签与收藏类型写入会话
    /// （可见性不在路径里，保持不动）；否则不触碰已存状态。
    /// 返回同步后的状态（未同步时为 `None`）。
    pub async fn apply_tab_url(&self, url: &str) -> CoreResult<Option<BookmarkFilters>> {
        let Some(parsed) = urls::parse_bookmark_filters(url) else {
            return Ok(None);
        };
        log::debug!(
            "Filter sync from tab: kind={}, tag={:?}",
            parsed.kind.as_str(),
            parsed.tag_name
        );
        let filters = self
            .update(FilterUpdate {
                tag_name: Some(parsed.tag_name),
                kind: Some(parsed.kind),
                visibility: None,
            })
            .await?;
        Ok(Some(filters))
    }
}
