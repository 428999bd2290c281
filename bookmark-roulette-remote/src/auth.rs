//! 详情页抓取：认证 token 与收藏关系 ID
//!
//! 站点页面把初始状态内嵌在一段 bootstrap JSON 里。认证 token 与当前
//! 作品的收藏关系 ID 都只能从这段 JSON（或 `csrf-token` meta 标签）里挖。
//! 负载结构没有公开契约，这里按"递归找形状"的方式容错解析。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::BookmarkInfo;

/// token 的最短可信长度，短于此的字符串按噪声处理
const MIN_TOKEN_LEN: usize = 9;

static BOOTSTRAP_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]+id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).expect("valid regex")
});

static META_CSRF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="csrf-token" content="([^"]+)""#).expect("valid regex")
});

/// 提取页面内嵌的 bootstrap JSON
#[must_use]
pub fn extract_bootstrap_json(html: &str) -> Option<Value> {
    let raw = BOOTSTRAP_SCRIPT_RE.captures(html)?.get(1)?.as_str();
    serde_json::from_str(raw).ok()
}

/// bootstrap 负载里进一步嵌套的序列化状态（JSON 字符串字段）
fn server_serialized_state(bootstrap: &Value) -> Option<Value> {
    let state = bootstrap
        .get("props")?
        .get("pageProps")?
        .get("serverSerializedPreloadedState")?
        .as_str()?;
    serde_json::from_str(state).ok()
}

/// 递归查找认证 token：`{"api": {"token": "..."}}` 形状
fn find_csrf_token(node: &Value) -> Option<String> {
    match node {
        Value::Object(map) => {
            if let Some(token) = map
                .get("api")
                .and_then(|api| api.get("token"))
                .and_then(Value::as_str)
                && token.len() >= MIN_TOKEN_LEN
            {
                return Some(token.to_string());
            }
            map.values().find_map(find_csrf_token)
        }
        Value::Array(items) => items.iter().find_map(find_csrf_token),
        _ => None,
    }
}

/// 递归查找指定作品的收藏关系 ID：`{"id": work_id, "bookmarkData": {"id": ...}}`
fn find_relation_id(node: &Value, item_id: &str) -> Option<String> {
    match node {
        Value::Object(map) => {
            let id_matches = map.get("id").is_some_and(|id| match id {
                Value::String(s) => s == item_id,
                Value::Number(n) => n.to_string() == item_id,
                _ => false,
            });
            if id_matches
                && let Some(relation) = map.get("bookmarkData").and_then(|data| data.get("id"))
            {
                match relation {
                    Value::String(s) if !s.is_empty() => return Some(s.clone()),
                    Value::Number(n) => return Some(n.to_string()),
                    _ => {}
                }
            }
            map.values().find_map(|value| find_relation_id(value, item_id))
        }
        Value::Array(items) => items.iter().find_map(|value| find_relation_id(value, item_id)),
        _ => None,
    }
}

/// `csrf-token` meta 标签兜底
fn meta_csrf_token(html: &str) -> Option<String> {
    META_CSRF_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// 从作品详情页 HTML 抓取认证 token 与收藏关系 ID。
///
/// token 优先级：序列化状态 → bootstrap 负载 → meta 标签。
/// 关系 ID 只在序列化状态里找；找不到时由调用方走次级详情端点。
#[must_use]
pub fn scrape_bookmark_info(html: &str, item_id: &str) -> BookmarkInfo {
    let bootstrap = extract_bootstrap_json(html);
    let state = bootstrap.as_ref().and_then(server_serialized_state);

    let csrf_token = state
        .as_ref()
        .and_then(find_csrf_token)
        .or_else(|| bootstrap.as_ref().and_then(find_csrf_token))
        .or_else(|| meta_csrf_token(html));
    let relation_id = state.as_ref().and_then(|s| find_relation_id(s, item_id));

    BookmarkInfo {
        csrf_token,
        relation_id,
    }
}

/// 从任意站内页面 HTML 抓取认证 token（添加收藏等场景）
#[must_use]
pub fn scrape_csrf_token(html: &str) -> Option<String> {
    let bootstrap = extract_bootstrap_json(html);
    bootstrap
        .as_ref()
        .and_then(server_serialized_state)
        .as_ref()
        .and_then(find_csrf_token)
        .or_else(|| bootstrap.as_ref().and_then(find_csrf_token))
        .or_else(|| meta_csrf_token(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_state(state: &serde_json::Value) -> String {
        let bootstrap = serde_json::json!({
            "props": {
                "pageProps": {
                    "serverSerializedPreloadedState": state.to_string(),
                }
            }
        });
        format!(
            r#"<html><head></head><body><script id="__NEXT_DATA__" type="application/json">{bootstrap}</script></body></html>"#
        )
    }

    #[test]
    fn token_and_relation_from_serialized_state() {
        let state = serde_json::json!({
            "api": {"token": "0123456789abcdef"},
            "entities": {
                "works": {
                    "42": {"id": "42", "bookmarkData": {"id": "9001"}}
                }
            }
        });
        let html = page_with_state(&state);
        let info = scrape_bookmark_info(&html, "42");
        assert_eq!(info.csrf_token.as_deref(), Some("0123456789abcdef"));
        assert_eq!(info.relation_id.as_deref(), Some("9001"));
    }

    #[test]
    fn relation_matches_numeric_id() {
        let state = serde_json::json!({
            "list": [
                {"id": 41, "bookmarkData": {"id": 1}},
                {"id": 42, "bookmarkData": {"id": 9002}}
            ]
        });
        let html = page_with_state(&state);
        let info = scrape_bookmark_info(&html, "42");
        assert_eq!(info.relation_id.as_deref(), Some("9002"));
    }

    #[test]
    fn missing_relation_yields_none() {
        let state = serde_json::json!({
            "api": {"token": "0123456789abcdef"},
            "works": {"42": {"id": "42", "bookmarkData": null}}
        });
        let html = page_with_state(&state);
        let info = scrape_bookmark_info(&html, "42");
        assert!(info.relation_id.is_none());
        assert!(info.csrf_token.is_some());
    }

    #[test]
    fn short_tokens_are_rejected() {
        let state = serde_json::json!({"api": {"token": "short"}});
        let html = page_with_state(&state);
        assert!(scrape_csrf_token(&html).is_none());
    }

    #[test]
    fn meta_tag_fallback() {
        let html = r#"<html><head><meta name="csrf-token" content="meta-token-value"></head></html>"#;
        assert_eq!(
            scrape_csrf_token(html).as_deref(),
            Some("meta-token-value")
        );
    }

    #[test]
    fn no_sources_yields_none() {
        let info = scrape_bookmark_info("<html><body>plain</body></html>", "42");
        assert!(info.csrf_token.is_none());
        assert!(info.relation_id.is_none());
    }

    #[test]
    fn broken_bootstrap_json_is_ignored() {
        let html = r#"<script id="__NEXT_DATA__">{not json</script>"#;
        assert!(extract_bootstrap_json(html).is_none());
    }
}
