//! URL 构造与解析
//!
//! 站点 URL 形态集中在这里：ajax API 端点、作品/小说/画册跳转页、
//! 收藏列表页模式匹配。

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::types::{BookmarkKind, Visibility};

/// 站点根地址
pub const WWW_BASE: &str = "https://www.pixiv.net";

/// 身份解析入口：携带凭证请求后重定向到 `/users/{id}/...`
pub const IDENTITY_PROBE_URL: &str = "https://www.pixiv.net/bookmark.php";

static USER_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pixiv\.net/users/(\d+)").expect("valid regex")
});

static ARTWORK_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pixiv\.net/artworks/(\d+)").expect("valid regex")
});

static BOOKMARKS_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https://www\.pixiv\.net/users/(\d+)/bookmarks(?:/(artworks|novels|collections))?(?:/([^/?#]+))?",
    )
    .expect("valid regex")
});

/// 收藏列表页 URL 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBookmarkFilters {
    /// 页面所属用户 ID
    pub user_id: String,
    /// 收藏类型
    pub kind: BookmarkKind,
    /// 标签（已百分号解码；画册固定为空）
    pub tag_name: String,
}

/// 收藏列表 ajax API 基础路径（按类型分派）
fn bookmarks_api_base(user_id: &str, kind: BookmarkKind) -> String {
    format!("{WWW_BASE}/ajax/user/{user_id}/{}/bookmarks", kind.api_segment())
}

/// 构造一页收藏的 ajax API URL。
///
/// 画册不携带 `tag` 参数；其余类型即使标签为空也显式携带。
#[must_use]
pub fn bookmarks_api_url(
    user_id: &str,
    tag_name: &str,
    offset: u64,
    limit: u64,
    visibility: Visibility,
    kind: BookmarkKind,
) -> String {
    let mut url = match Url::parse(&bookmarks_api_base(user_id, kind)) {
        Ok(url) => url,
        // WWW_BASE 为常量，实际不可达
        Err(_) => return bookmarks_api_base(user_id, kind),
    };
    {
        let mut pairs = url.query_pairs_mut();
        if kind.supports_tag() {
            pairs.append_pair("tag", tag_name);
        }
        pairs.append_pair("offset", &offset.to_string());
        pairs.append_pair("limit", &limit.to_string());
        pairs.append_pair("rest", visibility.as_rest());
        pairs.append_pair("lang", "en");
    }
    url.into()
}

/// 作品详情 ajax API（次级 relation id 来源）
#[must_use]
pub fn illust_detail_api_url(item_id: &str) -> String {
    format!("{WWW_BASE}/ajax/illust/{item_id}")
}

/// 用户资料 ajax API
#[must_use]
pub fn user_profile_api_url(user_id: &str) -> String {
    format!("{WWW_BASE}/ajax/user/{user_id}")
}

/// 删除收藏端点
#[must_use]
pub fn remove_bookmark_api_url() -> String {
    format!("{WWW_BASE}/ajax/illusts/bookmarks/delete")
}

/// 添加收藏端点
#[must_use]
pub fn add_bookmark_api_url() -> String {
    format!("{WWW_BASE}/ajax/illusts/bookmarks/add")
}

/// 作品跳转页
#[must_use]
pub fn artwork_url(item_id: &str) -> String {
    format!("{WWW_BASE}/artworks/{item_id}")
}

/// 小说跳转页
#[must_use]
pub fn novel_url(item_id: &str) -> String {
    format!("{WWW_BASE}/novel/show.php?id={item_id}")
}

/// 画册跳转页
#[must_use]
pub fn collection_url(item_id: &str) -> String {
    format!("{WWW_BASE}/collections/{item_id}")
}

/// 按收藏类型构造跳转目标 URL
#[must_use]
pub fn destination_url(kind: BookmarkKind, item_id: &str) -> String {
    match kind {
        BookmarkKind::Images => artwork_url(item_id),
        BookmarkKind::Novels => novel_url(item_id),
        BookmarkKind::Collections => collection_url(item_id),
    }
}

/// 用户收藏列表页
#[must_use]
pub fn bookmarks_page_url(user_id: &str, kind: BookmarkKind) -> String {
    format!("{WWW_BASE}/users/{user_id}/bookmarks/{}", kind.page_segment())
}

/// URL 是否是收藏列表页
#[must_use]
pub fn is_bookmarks_url(url: Option<&str>) -> bool {
    url.is_some_and(|u| BOOKMARKS_PAGE_RE.is_match(u))
}

/// 从任意站内 URL 提取用户 ID
#[must_use]
pub fn parse_user_id(url: &str) -> Option<String> {
    USER_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// 从作品页 URL 提取作品 ID
#[must_use]
pub fn parse_artwork_id(url: &str) -> Option<String> {
    ARTWORK_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// 解析收藏列表页 URL 中内嵌的过滤条件。
///
/// 匹配 `/users/{id}/bookmarks/{kind}?/{tag}?`；URL 不是收藏列表页时返回
/// `None`（调用方不应改动已存过滤状态）。标签段做百分号解码，解码失败时
/// 保留原文。
#[must_use]
pub fn parse_bookmark_filters(url: &str) -> Option<ParsedBookmarkFilters> {
    let caps = BOOKMARKS_PAGE_RE.captures(url)?;
    let user_id = caps[1].to_string();
    let kind = caps
        .get(2)
        .and_then(|m| BookmarkKind::from_page_segment(m.as_str()))
        .unwrap_or_default();
    let tag_name = if kind.supports_tag() {
        caps.get(3)
            .map(|m| {
                urlencoding::decode(m.as_str())
                    .map_or_else(|_| m.as_str().to_string(), |s| s.into_owned())
            })
            .unwrap_or_default()
    } else {
        String::new()
    };
    Some(ParsedBookmarkFilters {
        user_id,
        kind,
        tag_name,
    })
}
