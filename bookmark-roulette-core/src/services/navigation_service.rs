//! 跳转分派服务

use std::sync::Arc;

use bookmark_roulette_remote::{urls, BookmarkKind};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::BrowserHost;

/// 把选中的作品变成目标 URL 并应用到标签页
pub struct NavigationService {
    ctx: Arc<ServiceContext>,
}

impl NavigationService {
    /// 创建跳转服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 跳转到指定作品。
    ///
    /// 给了标签页 ID 就原地更新，否则新开标签页。
    ///
    /// # Errors
    /// * `CoreError::TabUpdateFailed` - 标签页 API 拒绝更新（例如标签页
    ///   在途中被关闭）
    pub async fn navigate(
        &self,
        tab_id: Option<u32>,
        item_id: &str,
        kind: BookmarkKind,
    ) -> CoreResult<()> {
        let url = urls::destination_url(kind, item_id);
        log::debug!("Navigate to {url} (tab={tab_id:?})");
        match tab_id {
            Some(tab_id) => self.ctx.browser.update_tab(tab_id, &url).await,
            None => self.ctx.browser.create_tab(&url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::create_test_context;

    #[tokio::test]
    async fn navigate_updates_given_tab() {
        let (ctx, _, _, browser) = create_test_context();
        let svc = NavigationService::new(ctx);

        svc.navigate(Some(5), "42", BookmarkKind::Images)
            .await
            .unwrap();

        assert_eq!(
            browser.updated_tabs().await,
            vec![(5, "https://www.pixiv.net/artworks/42".to_string())]
        );
        assert!(browser.created_tabs().await.is_empty());
    }

    #[tokio::test]
    async fn navigate_without_tab_opens_new_one() {
        let (ctx, _, _, browser) = create_test_context();
        let svc = NavigationService::new(ctx);

        svc.navigate(None, "42", BookmarkKind::Novels).await.unwrap();

        assert_eq!(
            browser.created_tabs().await,
            vec!["https://www.pixiv.net/novel/show.php?id=42".to_string()]
        );
    }

    #[tokio::test]
    async fn navigate_surfaces_tab_failure() {
        let (ctx, _, _, browser) = create_test_context();
        browser.set_fail_update(true).await;
        let svc = NavigationService::new(ctx);

        let result = svc.navigate(Some(5), "42", BookmarkKind::Images).await;
        assert!(matches!(result, Err(CoreError::TabUpdateFailed(_))));
    }
}
