//! 每个过滤组合的收藏统计缓存条目

use bookmark_roulette_remote::{BookmarkKind, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// serde 默认时间戳（旧条目缺失该字段）
pub(crate) fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// 一个过滤组合下的收藏规模缓存。
///
/// 远端总数会随用户增删收藏漂移；条目不做主动失效，由下一次页面
/// 抓取发现不一致时自行纠正。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStats {
    /// 统计所属用户
    pub user_id: String,
    /// 标签过滤
    #[serde(default)]
    pub tag_name: String,
    /// 可见性（旧条目缺失时默认公开）
    #[serde(default)]
    pub visibility: Visibility,
    /// 收藏类型（旧条目缺失时默认插画）
    #[serde(default)]
    pub kind: BookmarkKind,
    /// 收藏总数
    pub total: u64,
    /// 页大小
    pub per_page: u64,
    /// 最后一次确认时间
    #[serde(default = "unix_epoch")]
    pub updated_at: DateTime<Utc>,
}

impl BookmarkStats {
    /// 当前键形态：用户 + 类型 + 可见性 + 标签
    #[must_use]
    pub fn storage_key(
        user_id: &str,
        kind: BookmarkKind,
        visibility: Visibility,
        tag_name: &str,
    ) -> String {
        format!(
            "bookmarkStats:{user_id}:{}:{}:{tag_name}",
            kind.as_str(),
            visibility.as_rest()
        )
    }

    /// 旧键形态（引入收藏类型之前）：用户 + 可见性 + 标签
    #[must_use]
    pub fn legacy_visibility_key(user_id: &str, visibility: Visibility, tag_name: &str) -> String {
        format!("bookmarkStats:{user_id}:{}:{tag_name}", visibility.as_rest())
    }

    /// 最旧键形态（引入可见性之前）：用户 + 标签
    #[must_use]
    pub fn legacy_tag_key(user_id: &str, tag_name: &str) -> String {
        format!("bookmarkStats:{user_id}:{tag_name}")
    }

    /// 本条目的当前存储键
    #[must_use]
    pub fn own_key(&self) -> String {
        Self::storage_key(&self.user_id, self.kind, self.visibility, &self.tag_name)
    }
}
