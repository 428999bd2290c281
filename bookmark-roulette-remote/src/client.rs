//! `BookmarkSource` trait 的 reqwest 实现

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{scrape_bookmark_info, scrape_csrf_token};
use crate::error::{RemoteError, Result};
use crate::traits::BookmarkSource;
use crate::types::{
    BookmarkInfo, BookmarkKind, BookmarkPage, BookmarkPageBody, SessionCredentials, UserProfile,
    Visibility,
};
use crate::urls;

/// 远端收藏数据源客户端
///
/// 所有请求携带注入的会话凭证（Cookie 头）。不设请求超时、不做重试。
pub struct PixivClient {
    pub(crate) client: Client,
    pub(crate) credentials: SessionCredentials,
}

impl PixivClient {
    /// 创建客户端
    ///
    /// # Errors
    /// * [`RemoteError::Network`] - 底层 HTTP 客户端构建失败
    pub fn new(credentials: SessionCredentials) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RemoteError::Network {
                detail: format!("构建 HTTP 客户端失败: {e}"),
            })?;
        Ok(Self {
            client,
            credentials,
        })
    }
}

/// 作品详情端点响应体（只取收藏关系字段）
#[derive(Deserialize)]
struct IllustDetailBody {
    #[serde(default, rename = "bookmarkData")]
    bookmark_data: Option<crate::types::BookmarkData>,
}

/// 用户资料端点响应体
#[derive(Deserialize)]
struct UserProfileBody {
    #[serde(rename = "userId")]
    user_id: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, rename = "imageBig")]
    image_big: Option<String>,
}

#[async_trait]
impl BookmarkSource for PixivClient {
    async fn fetch_bookmark_page(
        &self,
        user_id: &str,
        tag_name: &str,
        offset: u64,
        limit: u64,
        visibility: Visibility,
        kind: BookmarkKind,
    ) -> Result<BookmarkPage> {
        let url = urls::bookmarks_api_url(user_id, tag_name, offset, limit, visibility, kind);
        let body: BookmarkPageBody = self.get_envelope(&url).await?;

        let total = body.total.ok_or_else(|| RemoteError::Parse {
            detail: "响应中缺少 total 字段".to_string(),
        })?;

        Ok(BookmarkPage {
            works: body.works,
            total,
        })
    }

    async fn resolve_user_id(&self) -> Result<String> {
        let (status, _, final_url) = self.get_text(urls::IDENTITY_PROBE_URL).await?;
        if !(200..300).contains(&status) {
            log::warn!("身份解析请求失败: HTTP {status}");
            return Err(RemoteError::Status { status });
        }
        // 已登录时重定向到 /users/{id}/...，否则落在登录页
        urls::parse_user_id(&final_url).ok_or_else(|| {
            log::warn!("身份解析重定向未命中用户页: {final_url}");
            RemoteError::LoginRequired
        })
    }

    async fn fetch_bookmark_info(&self, item_id: &str) -> Result<BookmarkInfo> {
        let html = self.get_html(&urls::artwork_url(item_id)).await?;
        let mut info = scrape_bookmark_info(&html, item_id);

        if info.relation_id.is_none() {
            // 页面负载里没有关系 ID，走次级详情端点
            let detail: IllustDetailBody = self
                .get_envelope(&urls::illust_detail_api_url(item_id))
                .await?;
            info.relation_id = detail.bookmark_data.and_then(|data| data.id);
        }

        Ok(info)
    }

    async fn remove_bookmark(&self, relation_id: &str, csrf_token: &str) -> Result<()> {
        let url = urls::remove_bookmark_api_url();
        let request = self
            .client
            .post(&url)
            .header("X-CSRF-TOKEN", csrf_token)
            .form(&[("bookmark_id", relation_id)]);
        self.post_ack(&url, request).await
    }

    async fn add_bookmark(&self, item_id: &str) -> Result<()> {
        // 添加接口同样要求认证 token，从作品页现抓
        let html = self.get_html(&urls::artwork_url(item_id)).await?;
        let csrf_token = scrape_csrf_token(&html).ok_or(RemoteError::TokenNotFound)?;

        let illust_id: u64 = item_id.parse().map_err(|_| RemoteError::Parse {
            detail: format!("无效的作品 ID: {item_id}"),
        })?;

        let url = urls::add_bookmark_api_url();
        let request = self
            .client
            .post(&url)
            .header("X-CSRF-TOKEN", csrf_token)
            .json(&json!({
                "illust_id": illust_id,
                "restrict": 0,
                "comment": "",
                "tags": [],
            }));
        self.post_ack(&url, request).await
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile> {
        let body: UserProfileBody = self
            .get_envelope(&urls::user_profile_api_url(user_id))
            .await?;
        Ok(UserProfile {
            user_id: body.user_id,
            name: body.name,
            image_url: body.image_big.or(body.image).unwrap_or_default(),
        })
    }
}
