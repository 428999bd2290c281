//! 会话身份服务

use std::sync::Arc;

use bookmark_roulette_remote::BookmarkSource;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::SessionStore;

/// 会话内的用户身份解析。
///
/// 远端身份解析是一次跨站重定向往返，代价不小；解析结果缓存在会话
/// 存储里，会话期间不再重复请求。
pub struct IdentityService {
    ctx: Arc<ServiceContext>,
}

impl IdentityService {
    /// 创建身份服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 解析当前用户 ID（优先读会话缓存）
    ///
    /// # Errors
    /// * `CoreError::Remote(RemoteError::LoginRequired)` - 未登录
    pub async fn resolve(&self) -> CoreResult<String> {
        if let Some(user_id) = self.ctx.session.get_user_id().await? {
            return Ok(user_id);
        }
        let user_id = self.ctx.source.resolve_user_id().await?;
        self.ctx.session.set_user_id(&user_id).await?;
        Ok(user_id)
    }
}
