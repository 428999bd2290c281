//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use bookmark_roulette_remote::RemoteError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No browser tab is active
    #[error("No active tab")]
    NoActiveTab,

    /// Active tab is not on a usable page of the target site
    #[error("Active tab is not on a supported page: {0}")]
    WrongSiteTab(String),

    /// The drawn bookmark page came back empty
    #[error("No bookmarks found")]
    NoBookmarksFound,

    /// Statistics cache missed and the recount fetch failed too
    #[error("No bookmark statistics available: {0}")]
    MissingStats(String),

    /// No removal-relation id could be resolved for the item
    #[error("Item {0} is not in your bookmarks")]
    BookmarkNotFound(String),

    /// Tab API rejected the navigation
    #[error("Tab update failed: {0}")]
    TabUpdateFailed(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Remote source error (converted from library)
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// 面向 UI 的错误分类。
///
/// 在抛出点就带上明确类别，替代对错误文案做子串嗅探的做法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// 未登录或凭证失效
    LoginRequired,
    /// 没有活动标签页
    NoActiveTab,
    /// 活动标签页不在目标站点的可用页面上
    WrongSiteTab,
    /// 候选集为空
    NoBookmarksFound,
    /// 统计缓存缺失且重新计数失败
    MissingStats,
    /// 远端 API 失败（网络、非 2xx、信封错误、解析失败）
    RemoteApi,
    /// 找不到收藏关系 ID
    BookmarkNotFound,
    /// 标签页 API 拒绝更新
    TabUpdateFailed,
    /// 会话存储失败
    Storage,
    /// 其余未分类错误
    Unknown,
}

impl CoreError {
    /// Whether it is expected behavior (not logged in, empty result, etc.),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NoActiveTab
            | Self::WrongSiteTab(_)
            | Self::NoBookmarksFound
            | Self::MissingStats(_)
            | Self::BookmarkNotFound(_) => true,
            Self::Remote(e) => e.is_expected(),
            _ => false,
        }
    }

    /// 错误分类（在抛出点确定，供 UI 映射状态文案）
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActiveTab => ErrorKind::NoActiveTab,
            Self::WrongSiteTab(_) => ErrorKind::WrongSiteTab,
            Self::NoBookmarksFound => ErrorKind::NoBookmarksFound,
            Self::MissingStats(_) => ErrorKind::MissingStats,
            Self::BookmarkNotFound(_) => ErrorKind::BookmarkNotFound,
            Self::TabUpdateFailed(_) => ErrorKind::TabUpdateFailed,
            Self::StorageError(_) => ErrorKind::Storage,
            Self::SerializationError(_) => ErrorKind::Unknown,
            Self::Remote(RemoteError::LoginRequired) => ErrorKind::LoginRequired,
            Self::Remote(_) => ErrorKind::RemoteApi,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_login_required_through_remote() {
        let e = CoreError::Remote(RemoteError::LoginRequired);
        assert_eq!(e.kind(), ErrorKind::LoginRequired);
    }

    #[test]
    fn kind_maps_remote_failures_to_remote_api() {
        let e = CoreError::Remote(RemoteError::Status { status: 500 });
        assert_eq!(e.kind(), ErrorKind::RemoteApi);
        let e = CoreError::Remote(RemoteError::TokenNotFound);
        assert_eq!(e.kind(), ErrorKind::RemoteApi);
    }

    #[test]
    fn kind_maps_core_variants() {
        assert_eq!(CoreError::NoActiveTab.kind(), ErrorKind::NoActiveTab);
        assert_eq!(
            CoreError::NoBookmarksFound.kind(),
            ErrorKind::NoBookmarksFound
        );
        assert_eq!(
            CoreError::BookmarkNotFound("1".into()).kind(),
            ErrorKind::BookmarkNotFound
        );
        assert_eq!(
            CoreError::TabUpdateFailed("closed".into()).kind(),
            ErrorKind::TabUpdateFailed
        );
    }

    #[test]
    fn expected_classification() {
        assert!(CoreError::NoBookmarksFound.is_expected());
        assert!(CoreError::Remote(RemoteError::LoginRequired).is_expected());
        assert!(!CoreError::StorageError("x".into()).is_expected());
        assert!(!CoreError::Remote(RemoteError::Status { status: 500 }).is_expected());
    }

    #[test]
    fn serialize_tagged() {
        let e = CoreError::BookmarkNotFound("42".to_string());
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"BookmarkNotFound\""));
    }
}
