//! 当前过滤条件（标签 / 可见性 / 收藏类型）

use bookmark_roulette_remote::{BookmarkKind, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会话内的当前过滤三元组
///
/// 不变式：`kind == Collections` 时 `tag_name` 恒为空字符串。
/// 所有读写路径都经过 [`normalized`](Self::normalized)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkFilters {
    /// 标签过滤（空 = 不过滤）
    #[serde(default)]
    pub tag_name: String,
    /// 公开 / 非公开
    #[serde(default)]
    pub visibility: Visibility,
    /// 收藏类型
    #[serde(default)]
    pub kind: BookmarkKind,
    /// 最后一次变更时间
    #[serde(default = "super::stats::unix_epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Default for BookmarkFilters {
    fn default() -> Self {
        Self {
            tag_name: String::new(),
            visibility: Visibility::Show,
            kind: BookmarkKind::Images,
            updated_at: super::stats::unix_epoch(),
        }
    }
}

impl BookmarkFilters {
    /// 强制执行画册无标签的不变式
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.kind.supports_tag() {
            self.tag_name.clear();
        }
        self
    }

    /// 合并部分更新并打时间戳
    #[must_use]
    pub fn merged(mut self, update: FilterUpdate, now: DateTime<Utc>) -> Self {
        if let Some(tag_name) = update.tag_name {
            self.tag_name = tag_name;
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        self.updated_at = now;
        self.normalized()
    }
}

/// 过滤条件的部分更新
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    /// 新标签（`None` = 保留）
    pub tag_name: Option<String>,
    /// 新可见性（`None` = 保留）
    pub visibility: Option<Visibility>,
    /// 新收藏类型（`None` = 保留）
    pub kind: Option<BookmarkKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters() {
        let filters = BookmarkFilters::default();
        assert_eq!(filters.tag_name, "");
        assert_eq!(filters.visibility, Visibility::Show);
        assert_eq!(filters.kind, BookmarkKind::Images);
    }

    #[test]
    fn collections_clear_tag() {
        let filters = BookmarkFilters {
            tag_name: "cats".to_string(),
            kind: BookmarkKind::Collections,
            ..BookmarkFilters::default()
        }
        .normalized();
        assert_eq!(filters.tag_name, "");
    }

    #[test]
    fn images_keep_tag() {
        let filters = BookmarkFilters {
            tag_name: "cats".to_string(),
            ..BookmarkFilters::default()
        }
        .normalized();
        assert_eq!(filters.tag_name, "cats");
    }

    #[test]
    fn merge_partial_update() {
        let now = Utc::now();
        let filters = BookmarkFilters {
            tag_name: "cats".to_string(),
            ..BookmarkFilters::default()
        }
        .merged(
            FilterUpdate {
                visibility: Some(Visibility::Hide),
                ..FilterUpdate::default()
            },
            now,
        );
        assert_eq!(filters.tag_name, "cats");
        assert_eq!(filters.visibility, Visibility::Hide);
        assert_eq!(filters.updated_at, now);
    }

    #[test]
    fn merge_to_collections_normalizes_tag() {
        let filters = BookmarkFilters {
            tag_name: "cats".to_string(),
            ..BookmarkFilters::default()
        }
        .merged(
            FilterUpdate {
                kind: Some(BookmarkKind::Collections),
                ..FilterUpdate::default()
            },
            Utc::now(),
        );
        assert_eq!(filters.tag_name, "");
        assert_eq!(filters.kind, BookmarkKind::Collections);
    }

    #[test]
    fn deserialize_with_missing_fields() {
        let filters: BookmarkFilters = serde_json::from_str(r#"{"tagName":"x"}"#).unwrap();
        assert_eq!(filters.tag_name, "x");
        assert_eq!(filters.visibility, Visibility::Show);
        assert_eq!(filters.kind, BookmarkKind::Images);
    }
}
