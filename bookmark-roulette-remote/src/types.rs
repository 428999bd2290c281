//! Wire 类型与过滤枚举定义

use serde::{Deserialize, Deserializer, Serialize};

// ============ 过滤枚举 ============

/// 收藏类型（三套子 API，URL 形态各不相同）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    /// 插画/漫画收藏
    Images,
    /// 小说收藏
    Novels,
    /// 画册收藏（无标签过滤）
    Collections,
}

impl BookmarkKind {
    /// ajax API 路径段
    #[must_use]
    pub fn api_segment(self) -> &'static str {
        match self {
            Self::Images => "illusts",
            Self::Novels => "novels",
            Self::Collections => "collections",
        }
    }

    /// 收藏列表页面 URL 路径段
    #[must_use]
    pub fn page_segment(self) -> &'static str {
        match self {
            Self::Images => "artworks",
            Self::Novels => "novels",
            Self::Collections => "collections",
        }
    }

    /// 序列化名称（用于组合键等字符串场景）
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Novels => "novels",
            Self::Collections => "collections",
        }
    }

    /// 从页面 URL 路径段解析
    #[must_use]
    pub fn from_page_segment(segment: &str) -> Option<Self> {
        match segment {
            "artworks" => Some(Self::Images),
            "novels" => Some(Self::Novels),
            "collections" => Some(Self::Collections),
            _ => None,
        }
    }

    /// 画册不支持标签过滤
    #[must_use]
    pub fn supports_tag(self) -> bool {
        !matches!(self, Self::Collections)
    }

    /// 宽松归一化：未知输入回退为插画
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value {
            Some("novels") => Self::Novels,
            Some("collections") => Self::Collections,
            _ => Self::Images,
        }
    }
}

impl Default for BookmarkKind {
    fn default() -> Self {
        Self::Images
    }
}

/// 收藏可见性（公开 / 非公开），对应 `rest=` 查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// 公开收藏
    Show,
    /// 非公开收藏
    Hide,
}

impl Visibility {
    /// `rest=` 查询参数取值
    #[must_use]
    pub fn as_rest(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }

    /// 宽松归一化：未知输入回退为公开
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value {
            Some("hide") => Self::Hide,
            _ => Self::Show,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Show
    }
}

// ============ 会话凭证 ============

/// 显式的环境凭证能力。
///
/// 浏览器宿主里所有认证请求都隐式携带 Cookie；脱离浏览器后该能力必须
/// 显式注入。凭证以 `Cookie:` 请求头原文的形式保存，附加到每个请求上。
#[derive(Clone)]
pub struct SessionCredentials {
    cookie_header: String,
}

impl SessionCredentials {
    /// 从 `Cookie:` 请求头原文构造
    #[must_use]
    pub fn from_cookie_header(cookie_header: impl Into<String>) -> Self {
        Self {
            cookie_header: cookie_header.into(),
        }
    }

    /// 请求头取值
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        &self.cookie_header
    }
}

// Cookie 含登录态，Debug 输出必须脱敏
impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("cookie_header", &"<redacted>")
            .finish()
    }
}

// ============ Wire 类型 ============

/// ajax API 统一响应信封 `{error, message, body}`
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEnvelope<T> {
    /// API 层错误标志
    #[serde(default)]
    pub error: bool,
    /// 错误消息（成功时为空字符串）
    #[serde(default)]
    pub message: String,
    /// 响应数据
    pub body: Option<T>,
}

/// 收藏列表页响应体
#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkPageBody {
    /// 当前页的作品
    #[serde(default)]
    pub works: Vec<RemoteWork>,
    /// 过滤条件下的收藏总数
    pub total: Option<u64>,
}

/// 列表页里的单个作品条目（只保留本层关心的字段）
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteWork {
    /// 作品 ID（API 偶尔返回数字，统一转为字符串）
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// 收藏关系数据；携带删除收藏所需的 relation id
    #[serde(default, rename = "bookmarkData")]
    pub bookmark_data: Option<BookmarkData>,
}

/// 作品上的收藏关系数据
#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkData {
    /// 收藏关系 ID（删除接口要求的标识，区别于作品 ID）
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
}

/// 一页收藏（已去掉信封）
#[derive(Debug, Clone)]
pub struct BookmarkPage {
    /// 当前页的作品
    pub works: Vec<RemoteWork>,
    /// 过滤条件下的收藏总数
    pub total: u64,
}

/// 作品详情页抓取结果
#[derive(Debug, Clone, Default)]
pub struct BookmarkInfo {
    /// 认证 token（删除/添加收藏的 `X-CSRF-TOKEN`）
    pub csrf_token: Option<String>,
    /// 收藏关系 ID
    pub relation_id: Option<String>,
}

/// 用户资料（弹窗资料卡使用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 用户 ID
    pub user_id: String,
    /// 昵称
    pub name: String,
    /// 头像 URL
    pub image_url: String,
}

// ============ 反序列化辅助 ============

/// API 的 ID 字段既可能是字符串也可能是数字，统一成 `String`。
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        U64(u64),
        I64(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::U64(n) => n.to_string(),
        StringOrNumber::I64(n) => n.to_string(),
    })
}

/// `Option` 版本的 [`string_or_number`]
fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeId {
        String(String),
        U64(u64),
        I64(i64),
        None,
    }

    Ok(match Option::<MaybeId>::deserialize(deserializer)? {
        Some(MaybeId::String(s)) if !s.is_empty() => Some(s),
        Some(MaybeId::U64(n)) => Some(n.to_string()),
        Some(MaybeId::I64(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_segments() {
        assert_eq!(BookmarkKind::Images.api_segment(), "illusts");
        assert_eq!(BookmarkKind::Images.page_segment(), "artworks");
        assert_eq!(BookmarkKind::Novels.api_segment(), "novels");
        assert_eq!(BookmarkKind::Collections.page_segment(), "collections");
    }

    #[test]
    fn kind_normalize_unknown_falls_back_to_images() {
        assert_eq!(BookmarkKind::normalize(None), BookmarkKind::Images);
        assert_eq!(BookmarkKind::normalize(Some("bogus")), BookmarkKind::Images);
        assert_eq!(BookmarkKind::normalize(Some("novels")), BookmarkKind::Novels);
        assert_eq!(
            BookmarkKind::normalize(Some("collections")),
            BookmarkKind::Collections
        );
    }

    #[test]
    fn kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&BookmarkKind::Images).unwrap(),
            "\"images\""
        );
        let k: BookmarkKind = serde_json::from_str("\"collections\"").unwrap();
        assert_eq!(k, BookmarkKind::Collections);
    }

    #[test]
    fn collections_do_not_support_tags() {
        assert!(BookmarkKind::Images.supports_tag());
        assert!(BookmarkKind::Novels.supports_tag());
        assert!(!BookmarkKind::Collections.supports_tag());
    }

    #[test]
    fn visibility_normalize() {
        assert_eq!(Visibility::normalize(Some("hide")), Visibility::Hide);
        assert_eq!(Visibility::normalize(Some("anything")), Visibility::Show);
        assert_eq!(Visibility::normalize(None), Visibility::Show);
    }

    #[test]
    fn credentials_debug_redacted() {
        let creds = SessionCredentials::from_cookie_header("PHPSESSID=secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn deserialize_page_body_with_numeric_ids() {
        let json = r#"{
            "works": [
                {"id": 123, "bookmarkData": {"id": 456}},
                {"id": "789", "bookmarkData": null}
            ],
            "total": 2
        }"#;
        let body: BookmarkPageBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.works[0].id, "123");
        assert_eq!(
            body.works[0].bookmark_data.as_ref().unwrap().id.as_deref(),
            Some("456")
        );
        assert_eq!(body.works[1].id, "789");
        assert!(body.works[1].bookmark_data.is_none());
        assert_eq!(body.total, Some(2));
    }

    #[test]
    fn deserialize_envelope_missing_body() {
        let json = r#"{"error": true, "message": "invalid user"}"#;
        let envelope: RemoteEnvelope<BookmarkPageBody> = serde_json::from_str(json).unwrap();
        assert!(envelope.error);
        assert_eq!(envelope.message, "invalid user");
        assert!(envelope.body.is_none());
    }

    #[test]
    fn deserialize_body_missing_total() {
        let json = r#"{"works": []}"#;
        let body: BookmarkPageBody = serde_json::from_str(json).unwrap();
        assert!(body.total.is_none());
    }
}
