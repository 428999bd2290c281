//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bookmark_roulette_remote::{
    BookmarkData, BookmarkInfo, BookmarkKind, BookmarkPage, BookmarkSource, RemoteError,
    RemoteWork, UserProfile, Visibility,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{BrowserHost, InMemorySessionStore, TabInfo};

// ===== 测试数据工厂 =====

/// 不带收藏关系数据的作品条目
pub fn work(id: &str) -> RemoteWork {
    RemoteWork {
        id: id.to_string(),
        bookmark_data: None,
    }
}

/// 带收藏关系 ID 的作品条目
pub fn work_with_relation(id: &str, relation_id: &str) -> RemoteWork {
    RemoteWork {
        id: id.to_string(),
        bookmark_data: Some(BookmarkData {
            id: Some(relation_id.to_string()),
        }),
    }
}

// ===== MockBookmarkSource =====

/// 一次页请求的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub user_id: String,
    pub tag_name: String,
    pub offset: u64,
    pub limit: u64,
    pub visibility: Visibility,
    pub kind: BookmarkKind,
}

/// 内存收藏数据源：works 列表代表全部收藏，分页从中切片
pub struct MockBookmarkSource {
    user_id: RwLock<Option<String>>,
    works: RwLock<Vec<RemoteWork>>,
    /// 如果 Some，页响应里的 total 用此值（模拟总数漂移）
    total_override: RwLock<Option<u64>>,
    fail_pages: RwLock<bool>,
    resolve_calls: RwLock<u32>,
    page_requests: RwLock<Vec<PageRequest>>,
    bookmark_info: RwLock<HashMap<String, BookmarkInfo>>,
    removed: RwLock<Vec<(String, String)>>,
}

impl MockBookmarkSource {
    pub fn new() -> Self {
        Self {
            user_id: RwLock::new(None),
            works: RwLock::new(Vec::new()),
            total_override: RwLock::new(None),
            fail_pages: RwLock::new(false),
            resolve_calls: RwLock::new(0),
            page_requests: RwLock::new(Vec::new()),
            bookmark_info: RwLock::new(HashMap::new()),
            removed: RwLock::new(Vec::new()),
        }
    }

    pub async fn set_user_id(&self, user_id: &str) {
        *self.user_id.write().await = Some(user_id.to_string());
    }

    pub async fn set_works(&self, works: Vec<RemoteWork>) {
        *self.works.write().await = works;
    }

    pub async fn set_total_override(&self, total: Option<u64>) {
        *self.total_override.write().await = total;
    }

    pub async fn set_fail_pages(&self, fail: bool) {
        *self.fail_pages.write().await = fail;
    }

    pub async fn set_bookmark_info(&self, item_id: &str, info: BookmarkInfo) {
        self.bookmark_info
            .write()
            .await
            .insert(item_id.to_string(), info);
    }

    pub async fn resolve_calls(&self) -> u32 {
        *self.resolve_calls.read().await
    }

    pub async fn page_requests(&self) -> Vec<PageRequest> {
        self.page_requests.read().await.clone()
    }

    pub async fn removed_bookmarks(&self) -> Vec<(String, String)> {
        self.removed.read().await.clone()
    }
}

impl Default for MockBookmarkSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookmarkSource for MockBookmarkSource {
    async fn fetch_bookmark_page(
        &self,
        user_id: &str,
        tag_name: &str,
        offset: u64,
        limit: u64,
        visibility: Visibility,
        kind: BookmarkKind,
    ) -> Result<BookmarkPage, RemoteError> {
        self.page_requests.write().await.push(PageRequest {
            user_id: user_id.to_string(),
            tag_name: tag_name.to_string(),
            offset,
            limit,
            visibility,
            kind,
        });

        if *self.fail_pages.read().await {
            return Err(RemoteError::Status { status: 500 });
        }

        let works = self.works.read().await;
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(works.len());
        let end = start
            .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
            .min(works.len());
        let total = self
            .total_override
            .read()
            .await
            .unwrap_or(works.len() as u64);

        Ok(BookmarkPage {
            works: works[start..end].to_vec(),
            total,
        })
    }

    async fn resolve_user_id(&self) -> Result<String, RemoteError> {
        *self.resolve_calls.write().await += 1;
        self.user_id
            .read()
            .await
            .clone()
            .ok_or(RemoteError::LoginRequired)
    }

    async fn fetch_bookmark_info(&self, item_id: &str) -> Result<BookmarkInfo, RemoteError> {
        Ok(self
            .bookmark_info
            .read()
            .await
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn remove_bookmark(&self, relation_id: &str, csrf_token: &str) -> Result<(), RemoteError> {
        self.removed
            .write()
            .await
            .push((relation_id.to_string(), csrf_token.to_string()));
        Ok(())
    }

    async fn add_bookmark(&self, _item_id: &str) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile, RemoteError> {
        Ok(UserProfile {
            user_id: user_id.to_string(),
            name: "test user".to_string(),
            image_url: String::new(),
        })
    }
}

// ===== MockBrowserHost =====

/// 记录式浏览器宿主 mock
pub struct MockBrowserHost {
    active_tab: RwLock<Option<TabInfo>>,
    updated: RwLock<Vec<(u32, String)>>,
    created: RwLock<Vec<String>>,
    reloaded: RwLock<Vec<u32>>,
    badge: RwLock<Option<(String, String)>>,
    badge_sets: RwLock<u32>,
    fail_update: RwLock<bool>,
}

impl MockBrowserHost {
    pub fn new() -> Self {
        Self {
            active_tab: RwLock::new(None),
            updated: RwLock::new(Vec::new()),
            created: RwLock::new(Vec::new()),
            reloaded: RwLock::new(Vec::new()),
            badge: RwLock::new(None),
            badge_sets: RwLock::new(0),
            fail_update: RwLock::new(false),
        }
    }

    pub async fn set_active_tab(&self, tab: Option<TabInfo>) {
        *self.active_tab.write().await = tab;
    }

    pub async fn set_fail_update(&self, fail: bool) {
        *self.fail_update.write().await = fail;
    }

    pub async fn updated_tabs(&self) -> Vec<(u32, String)> {
        self.updated.read().await.clone()
    }

    pub async fn created_tabs(&self) -> Vec<String> {
        self.created.read().await.clone()
    }

    pub async fn reloaded_tabs(&self) -> Vec<u32> {
        self.reloaded.read().await.clone()
    }

    pub async fn current_badge(&self) -> Option<(String, String)> {
        self.badge.read().await.clone()
    }

    pub async fn badge_sets(&self) -> u32 {
        *self.badge_sets.read().await
    }
}

impl Default for MockBrowserHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserHost for MockBrowserHost {
    async fn active_tab(&self) -> CoreResult<Option<TabInfo>> {
        Ok(self.active_tab.read().await.clone())
    }

    async fn update_tab(&self, tab_id: u32, url: &str) -> CoreResult<()> {
        if *self.fail_update.read().await {
            return Err(CoreError::TabUpdateFailed("tab was closed".to_string()));
        }
        self.updated.write().await.push((tab_id, url.to_string()));
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> CoreResult<()> {
        self.created.write().await.push(url.to_string());
        Ok(())
    }

    async fn reload_tab(&self, tab_id: u32) -> CoreResult<()> {
        self.reloaded.write().await.push(tab_id);
        Ok(())
    }

    async fn set_badge(&self, text: &str, color: &str) -> CoreResult<()> {
        *self.badge.write().await = Some((text.to_string(), color.to_string()));
        *self.badge_sets.write().await += 1;
        Ok(())
    }

    async fn clear_badge(&self) -> CoreResult<()> {
        *self.badge.write().await = None;
        Ok(())
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<InMemorySessionStore>,
    Arc<MockBookmarkSource>,
    Arc<MockBrowserHost>,
) {
    let session = Arc::new(InMemorySessionStore::new());
    let source = Arc::new(MockBookmarkSource::new());
    let browser = Arc::new(MockBrowserHost::new());

    let ctx = Arc::new(ServiceContext::new(
        session.clone(),
        browser.clone(),
        source.clone(),
    ));

    (ctx, session, source, browser)
}
