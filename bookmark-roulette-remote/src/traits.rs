use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BookmarkInfo, BookmarkKind, BookmarkPage, UserProfile, Visibility};

/// 远端收藏数据源 Trait
///
/// 会话层只依赖这个抽象；生产实现为 [`PixivClient`](crate::PixivClient)，
/// 测试里用内存 mock 代替网络。
#[async_trait]
pub trait BookmarkSource: Send + Sync {
    /// 获取一页收藏
    ///
    /// # Arguments
    /// * `user_id` - 用户 ID
    /// * `tag_name` - 标签过滤（画册类型忽略）
    /// * `offset` - 页内偏移
    /// * `limit` - 页大小
    /// * `visibility` - 公开 / 非公开
    /// * `kind` - 收藏类型
    async fn fetch_bookmark_page(
        &self,
        user_id: &str,
        tag_name: &str,
        offset: u64,
        limit: u64,
        visibility: Visibility,
        kind: BookmarkKind,
    ) -> Result<BookmarkPage>;

    /// 获取过滤条件下的收藏总数
    ///
    /// 默认实现请求第 0 页、页大小 1，只取 `total`。
    async fn fetch_total(
        &self,
        user_id: &str,
        tag_name: &str,
        visibility: Visibility,
        kind: BookmarkKind,
    ) -> Result<u64> {
        let page = self
            .fetch_bookmark_page(user_id, tag_name, 0, 1, visibility, kind)
            .await?;
        Ok(page.total)
    }

    /// 解析当前凭证对应的用户 ID
    ///
    /// # Errors
    /// * [`RemoteError::LoginRequired`](crate::RemoteError::LoginRequired) -
    ///   凭证缺失或已失效
    async fn resolve_user_id(&self) -> Result<String>;

    /// 抓取作品的认证 token 与收藏关系 ID
    ///
    /// 先抓详情页 HTML；页面里找不到关系 ID 时回退到次级 JSON 详情端点。
    /// 两个字段都可能缺失，由调用方决定如何处置。
    async fn fetch_bookmark_info(&self, item_id: &str) -> Result<BookmarkInfo>;

    /// 删除一条收藏
    ///
    /// # Arguments
    /// * `relation_id` - 收藏关系 ID（非作品 ID）
    /// * `csrf_token` - 认证 token
    async fn remove_bookmark(&self, relation_id: &str, csrf_token: &str) -> Result<()>;

    /// 添加一条收藏（公开、无评论、无标签）
    async fn add_bookmark(&self, item_id: &str) -> Result<()>;

    /// 获取用户资料
    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile>;
}
