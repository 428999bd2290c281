//! 会话存储抽象 Trait

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{BookmarkFilters, BookmarkStats, LoginStatus, RemovalCache};

/// 会话存储 Trait
///
/// 每个逻辑表一组类型化的 get/set，注入到各组件，替代环境全局状态。
/// 生命周期与浏览器会话一致（重启即清空）；查不到不是错误，返回
/// `Ok(None)` / 空序列。
///
/// 统计表按存储键读写：键由调用方构造，旧键形态的回退链在服务层实现。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 读当前过滤条件
    async fn get_filters(&self) -> CoreResult<Option<BookmarkFilters>>;

    /// 写当前过滤条件
    async fn set_filters(&self, filters: &BookmarkFilters) -> CoreResult<()>;

    /// 按存储键读统计条目
    async fn get_stats(&self, key: &str) -> CoreResult<Option<BookmarkStats>>;

    /// 按存储键写统计条目
    async fn set_stats(&self, key: &str, stats: &BookmarkStats) -> CoreResult<()>;

    /// 删除统计条目（迁移改写后清理旧键）
    async fn remove_stats(&self, key: &str) -> CoreResult<()>;

    /// 读最近展示历史（组合键序列，旧在前）
    async fn get_history(&self) -> CoreResult<Vec<String>>;

    /// 写最近展示历史
    async fn set_history(&self, keys: &[String]) -> CoreResult<()>;

    /// 读删除关系缓存
    async fn get_removal_cache(&self) -> CoreResult<Option<RemovalCache>>;

    /// 写删除关系缓存
    async fn set_removal_cache(&self, cache: &RemovalCache) -> CoreResult<()>;

    /// 读会话用户 ID
    async fn get_user_id(&self) -> CoreResult<Option<String>>;

    /// 写会话用户 ID
    async fn set_user_id(&self, user_id: &str) -> CoreResult<()>;

    /// 读登录状态
    async fn get_login_status(&self) -> CoreResult<Option<LoginStatus>>;

    /// 写登录状态
    async fn set_login_status(&self, status: &LoginStatus) -> CoreResult<()>;
}

// ===== 表键 =====

const FILTERS_KEY: &str = "bookmarkFilters";
const HISTORY_KEY: &str = "recentHistory";
const REMOVAL_CACHE_KEY: &str = "bookmarkRemovalCache";
const USER_ID_KEY: &str = "sessionUserId";
const LOGIN_STATUS_KEY: &str = "loginStatus";

/// 内存会话存储
///
/// 默认实现，宿主适配层和测试共用。所有表放在一个 JSON 值命名空间里，
/// 与浏览器会话存储的形态一致。
#[derive(Default)]
pub struct InMemorySessionStore {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemorySessionStore {
    /// 创建空存储
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_value<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        match self.values.read().await.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| CoreError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn set_value<T: Serialize>(&self, key: &str, value: &T) -> CoreResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_filters(&self) -> CoreResult<Option<BookmarkFilters>> {
        self.get_value(FILTERS_KEY).await
    }

    async fn set_filters(&self, filters: &BookmarkFilters) -> CoreResult<()> {
        self.set_value(FILTERS_KEY, filters).await
    }

    async fn get_stats(&self, key: &str) -> CoreResult<Option<BookmarkStats>> {
        self.get_value(key).await
    }

    async fn set_stats(&self, key: &str, stats: &BookmarkStats) -> CoreResult<()> {
        self.set_value(key, stats).await
    }

    async fn remove_stats(&self, key: &str) -> CoreResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn get_history(&self) -> CoreResult<Vec<String>> {
        Ok(self.get_value(HISTORY_KEY).await?.unwrap_or_default())
    }

    async fn set_history(&self, keys: &[String]) -> CoreResult<()> {
        self.set_value(HISTORY_KEY, &keys).await
    }

    async fn get_removal_cache(&self) -> CoreResult<Option<RemovalCache>> {
        self.get_value(REMOVAL_CACHE_KEY).await
    }

    async fn set_removal_cache(&self, cache: &RemovalCache) -> CoreResult<()> {
        self.set_value(REMOVAL_CACHE_KEY, cache).await
    }

    async fn get_user_id(&self) -> CoreResult<Option<String>> {
        self.get_value(USER_ID_KEY).await
    }

    async fn set_user_id(&self, user_id: &str) -> CoreResult<()> {
        self.set_value(USER_ID_KEY, &user_id).await
    }

    async fn get_login_status(&self) -> CoreResult<Option<LoginStatus>> {
        self.get_value(LOGIN_STATUS_KEY).await
    }

    async fn set_login_status(&self, status: &LoginStatus) -> CoreResult<()> {
        self.set_value(LOGIN_STATUS_KEY, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn filters_round_trip() {
        let store = InMemorySessionStore::new();
        assert!(store.get_filters().await.unwrap().is_none());

        let filters = BookmarkFilters {
            tag_name: "cats".to_string(),
            ..BookmarkFilters::default()
        };
        store.set_filters(&filters).await.unwrap();
        assert_eq!(store.get_filters().await.unwrap(), Some(filters));
    }

    #[tokio::test]
    async fn stats_keyed_independently() {
        let store = InMemorySessionStore::new();
        let stats = BookmarkStats {
            user_id: "7".to_string(),
            tag_name: String::new(),
            visibility: Default::default(),
            kind: Default::default(),
            total: 10,
            per_page: 48,
            updated_at: Utc::now(),
        };
        store.set_stats("key-a", &stats).await.unwrap();
        assert!(store.get_stats("key-a").await.unwrap().is_some());
        assert!(store.get_stats("key-b").await.unwrap().is_none());

        store.remove_stats("key-a").await.unwrap();
        assert!(store.get_stats("key-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_defaults_to_empty() {
        let store = InMemorySessionStore::new();
        assert!(store.get_history().await.unwrap().is_empty());

        let keys = vec!["images:1".to_string(), "images:2".to_string()];
        store.set_history(&keys).await.unwrap();
        assert_eq!(store.get_history().await.unwrap(), keys);
    }

    #[tokio::test]
    async fn user_id_round_trip() {
        let store = InMemorySessionStore::new();
        assert!(store.get_user_id().await.unwrap().is_none());
        store.set_user_id("7").await.unwrap();
        assert_eq!(store.get_user_id().await.unwrap().as_deref(), Some("7"));
    }
}
