//! 收藏删除关系缓存
//!
//! 删除接口要求的关系 ID 与列表接口返回的作品 ID 不同；采样时顺手
//! 记下来，删除时优先查这里，省掉一次详情页抓取。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 缓存条目上限；超出时从队头（最早插入）淘汰
pub const REMOVAL_CACHE_LIMIT: usize = 300;

/// 单条缓存：作品 ID → 收藏关系 ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalEntry {
    /// 作品 ID
    pub item_id: String,
    /// 收藏关系 ID
    pub relation_id: String,
}

/// 单个用户的关系 ID 缓存。
///
/// 条目按插入顺序保存，淘汰策略是 FIFO（按插入时间，不是按访问时间）。
/// 活动用户变化时整体重建。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCache {
    /// 缓存所属用户
    pub user_id: String,
    /// 按插入顺序的条目
    #[serde(default)]
    pub entries: Vec<RemovalEntry>,
    /// 最后一次写入时间
    #[serde(default = "super::stats::unix_epoch")]
    pub updated_at: DateTime<Utc>,
}

impl RemovalCache {
    /// 指定用户的空缓存
    #[must_use]
    pub fn empty(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: Vec::new(),
            updated_at: now,
        }
    }

    /// 查找作品对应的关系 ID
    #[must_use]
    pub fn get(&self, item_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.item_id == item_id)
            .map(|entry| entry.relation_id.as_str())
    }

    /// 写入一条映射。
    ///
    /// 已存在的作品 ID 原位更新（保留插入位置）；新条目追加到队尾，
    /// 随后按上限从队头裁剪。
    pub fn insert(&mut self, item_id: &str, relation_id: &str, now: DateTime<Utc>) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.item_id == item_id)
        {
            entry.relation_id = relation_id.to_string();
        } else {
            self.entries.push(RemovalEntry {
                item_id: item_id.to_string(),
                relation_id: relation_id.to_string(),
            });
            if self.entries.len() > REMOVAL_CACHE_LIMIT {
                let excess = self.entries.len() - REMOVAL_CACHE_LIMIT;
                self.entries.drain(..excess);
            }
        }
        self.updated_at = now;
    }

    /// 删除一条映射（不存在时静默）
    pub fn remove(&mut self, item_id: &str, now: DateTime<Utc>) {
        self.entries.retain(|entry| entry.item_id != item_id);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> RemovalCache {
        RemovalCache::empty("7", Utc::now())
    }

    #[test]
    fn insert_and_get() {
        let mut cache = cache();
        cache.insert("42", "9001", Utc::now());
        assert_eq!(cache.get("42"), Some("9001"));
        assert_eq!(cache.get("43"), None);
    }

    #[test]
    fn insert_existing_updates_in_place() {
        let mut cache = cache();
        cache.insert("1", "a", Utc::now());
        cache.insert("2", "b", Utc::now());
        cache.insert("1", "c", Utc::now());
        assert_eq!(cache.get("1"), Some("c"));
        // 原位更新不改变插入位置
        assert_eq!(cache.entries[0].item_id, "1");
        assert_eq!(cache.entries.len(), 2);
    }

    #[test]
    fn trim_drops_oldest_first() {
        let mut cache = cache();
        let now = Utc::now();
        for i in 0..REMOVAL_CACHE_LIMIT + 5 {
            cache.insert(&i.to_string(), "r", now);
        }
        assert_eq!(cache.entries.len(), REMOVAL_CACHE_LIMIT);
        // 最早插入的 0..5 被淘汰
        assert_eq!(cache.get("0"), None);
        assert_eq!(cache.get("4"), None);
        assert_eq!(cache.get("5"), Some("r"));
        assert_eq!(
            cache.get(&(REMOVAL_CACHE_LIMIT + 4).to_string()),
            Some("r")
        );
    }

    #[test]
    fn eviction_is_fifo_not_lru() {
        let mut cache = cache();
        let now = Utc::now();
        for i in 0..REMOVAL_CACHE_LIMIT {
            cache.insert(&i.to_string(), "r", now);
        }
        // 触碰最老的条目（原位更新），随后插入新条目仍应淘汰它
        cache.insert("0", "touched", now);
        cache.insert("new", "r", now);
        assert_eq!(cache.get("0"), None);
        assert_eq!(cache.get("new"), Some("r"));
    }

    #[test]
    fn remove_entry() {
        let mut cache = cache();
        cache.insert("42", "9001", Utc::now());
        cache.remove("42", Utc::now());
        assert_eq!(cache.get("42"), None);
        // 不存在时静默
        cache.remove("42", Utc::now());
    }
}
