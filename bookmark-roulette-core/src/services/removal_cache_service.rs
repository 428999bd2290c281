//! 删除关系缓存服务

use std::sync::Arc;

use chrono::Utc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::SessionStore;
use crate::types::RemovalCache;

/// 收藏关系 ID 缓存的读写（按用户隔离）
pub struct RemovalCacheService {
    ctx: Arc<ServiceContext>,
}

impl RemovalCacheService {
    /// 创建缓存服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 查询作品的关系 ID；缓存属于其他用户时视为未命中
    pub async fn get(&self, user_id: &str, item_id: &str) -> CoreResult<Option<String>> {
        let Some(cache) = self.ctx.session.get_removal_cache().await? else {
            return Ok(None);
        };
        if cache.user_id != user_id {
            return Ok(None);
        }
        Ok(cache.get(item_id).map(str::to_string))
    }

    /// 写入一条映射。活动用户变化时整体重建缓存。
    pub async fn store(&self, user_id: &str, item_id: &str, relation_id: &str) -> CoreResult<()> {
        let now = Utc::now();
        let mut cache = match self.ctx.session.get_removal_cache().await? {
            Some(cache) if cache.user_id == user_id => cache,
            _ => RemovalCache::empty(user_id, now),
        };
        cache.insert(item_id, relation_id, now);
        self.ctx.session.set_removal_cache(&cache).await
    }

    /// 删除一条映射（缓存缺失或属于其他用户时静默）
    pub async fn evict(&self, user_id: &str, item_id: &str) -> CoreResult<()> {
        let Some(mut cache) = self.ctx.session.get_removal_cache().await? else {
            return Ok(());
        };
        if cache.user_id != user_id {
            return Ok(());
        }
        cache.remove(item_id, Utc::now());
        self.ctx.session.set_removal_cache(&cache).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_context;

    #[tokio::test]
    async fn store_then_get() {
        let (ctx, ..) = create_test_context();
        let svc = RemovalCacheService::new(ctx);

        svc.store("7", "42", "9001").await.unwrap();
        assert_eq!(
            svc.get("7", "42").await.unwrap().as_deref(),
            Some("9001")
        );
        assert!(svc.get("7", "43").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn other_user_misses_and_rebuilds() {
        let (ctx, ..) = create_test_context();
        let svc = RemovalCacheService::new(ctx);

        svc.store("7", "42", "9001").await.unwrap();
        // 其他用户查不到
        assert!(svc.get("8", "42").await.unwrap().is_none());

        // 其他用户写入时整体重建
        svc.store("8", "50", "x").await.unwrap();
        assert!(svc.get("7", "42").await.unwrap().is_none());
        assert_eq!(svc.get("8", "50").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn evict_removes_entry() {
        let (ctx, ..) = create_test_context();
        let svc = RemovalCacheService::new(ctx);

        svc.store("7", "42", "9001").await.unwrap();
        svc.evict("7", "42").await.unwrap();
        assert!(svc.get("7", "42").await.unwrap().is_none());

        // 空缓存 / 他人缓存上的 evict 静默
        svc.evict("7", "42").await.unwrap();
        svc.evict("8", "42").await.unwrap();
    }
}
