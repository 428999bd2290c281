//! 最近展示历史的组合键

use bookmark_roulette_remote::BookmarkKind;

/// 历史条目组合键 `"{kind}:{item_id}"`。
///
/// 不同收藏类型的 ID 空间互不相干，键里必须带上类型。
#[must_use]
pub fn history_key(kind: BookmarkKind, item_id: &str) -> String {
    format!("{}:{item_id}", kind.as_str())
}
