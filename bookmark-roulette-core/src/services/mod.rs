//! 业务逻辑服务层

mod cleanup_service;
mod filter_service;
mod history_service;
mod identity_service;
mod navigation_service;
mod random_jump_service;
mod removal_cache_service;
mod stats_service;

pub use cleanup_service::CleanupService;
pub use filter_service::FilterService;
pub use history_service::{HistoryService, RECENT_HISTORY_LIMIT};
pub use identity_service::IdentityService;
pub use navigation_service::NavigationService;
pub use random_jump_service::{num_pages, RandomJumpService, DEFAULT_PER_PAGE};
pub use removal_cache_service::RemovalCacheService;
pub use stats_service::StatsService;

use std::sync::Arc;

use bookmark_roulette_remote::BookmarkSource;

use crate::traits::{BrowserHost, SessionStore};

/// 服务上下文 - 持有所有依赖
///
/// 宿主适配层创建此上下文，注入平台特定的存储 / 标签页实现与
/// 远端数据源。
pub struct ServiceContext {
    /// 会话存储
    pub session: Arc<dyn SessionStore>,
    /// 浏览器宿主能力
    pub browser: Arc<dyn BrowserHost>,
    /// 远端收藏数据源
    pub source: Arc<dyn BookmarkSource>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        session: Arc<dyn SessionStore>,
        browser: Arc<dyn BrowserHost>,
        source: Arc<dyn BookmarkSource>,
    ) -> Self {
        Self {
            session,
            browser,
            source,
        }
    }
}
