//! `PixivClient` HTTP 请求方法
//!
//! 统一处理：附加 Cookie 凭证、发送请求、日志、状态码检查、信封解包。
//! 按规约不设请求超时、不做重试：首个失败原样上抛。

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::client::PixivClient;
use crate::error::{RemoteError, Result};
use crate::types::RemoteEnvelope;

/// 日志里响应体的最大长度
const LOG_BODY_LIMIT: usize = 200;

/// 截断响应体用于日志输出（避免整页 HTML 刷屏）
pub(crate) fn truncate_for_log(s: &str) -> &str {
    if s.len() <= LOG_BODY_LIMIT {
        return s;
    }
    let mut end = LOG_BODY_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl PixivClient {
    /// 给请求附加会话凭证
    pub(crate) fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::COOKIE, self.credentials.cookie_header())
    }

    /// 执行 GET，返回 `(状态码, 响应文本, 最终 URL)`
    ///
    /// 跟随重定向；最终 URL 供身份解析使用。
    pub(crate) async fn get_text(&self, url: &str) -> Result<(u16, String, String)> {
        log::debug!("GET {url}");

        let response = self
            .with_credentials(self.client.get(url))
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        log::debug!("Response Status: {status}");

        let text = response.text().await.map_err(|e| RemoteError::Network {
            detail: format!("读取响应失败: {e}"),
        })?;

        Ok((status, text, final_url))
    }

    /// 执行 GET，要求 2xx，返回响应文本
    pub(crate) async fn get_html(&self, url: &str) -> Result<String> {
        let (status, text, _) = self.get_text(url).await?;
        if !(200..300).contains(&status) {
            return Err(RemoteError::Status { status });
        }
        Ok(text)
    }

    /// 执行 GET 并解包 `{error, message, body}` 信封
    pub(crate) async fn get_envelope<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get_html(url).await?;
        Self::unwrap_envelope(&text)
    }

    /// 执行 POST，只校验信封的 `error` 标志。
    ///
    /// 删除/添加收藏的响应是 `{error, message}`，不保证携带 `body`。
    pub(crate) async fn post_ack(&self, url: &str, request: RequestBuilder) -> Result<()> {
        log::debug!("POST {url}");

        let response = self
            .with_credentials(request)
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status().as_u16();
        log::debug!("Response Status: {status}");

        if !(200..300).contains(&status) {
            return Err(RemoteError::Status { status });
        }

        let text = response.text().await.map_err(|e| RemoteError::Network {
            detail: format!("读取响应失败: {e}"),
        })?;
        Self::check_envelope(&text)
    }

    /// 解包统一响应信封
    fn unwrap_envelope<T: DeserializeOwned>(text: &str) -> Result<T> {
        let envelope: RemoteEnvelope<T> = serde_json::from_str(text).map_err(|e| {
            log::error!("JSON 解析失败: {e}");
            log::error!("原始响应: {}", truncate_for_log(text));
            RemoteError::Parse {
                detail: e.to_string(),
            }
        })?;

        if envelope.error {
            let message = if envelope.message.is_empty() {
                "Unknown error".to_string()
            } else {
                envelope.message
            };
            log::warn!("API 错误: {message}");
            return Err(RemoteError::Api { message });
        }

        envelope.body.ok_or_else(|| RemoteError::Parse {
            detail: "响应中缺少 body 字段".to_string(),
        })
    }

    /// 校验信封的 `error` 标志（忽略 `body`）
    fn check_envelope(text: &str) -> Result<()> {
        let envelope: RemoteEnvelope<serde_json::Value> =
            serde_json::from_str(text).map_err(|e| {
                log::error!("JSON 解析失败: {e}");
                RemoteError::Parse {
                    detail: e.to_string(),
                }
            })?;

        if envelope.error {
            let message = if envelope.message.is_empty() {
                "Unknown error".to_string()
            } else {
                envelope.message
            };
            log::warn!("API 错误: {message}");
            return Err(RemoteError::Api { message });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_for_log("hello"), "hello");
    }

    #[test]
    fn truncate_long_string() {
        let s = "a".repeat(LOG_BODY_LIMIT + 50);
        assert_eq!(truncate_for_log(&s).len(), LOG_BODY_LIMIT);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "猫".repeat(100);
        let truncated = truncate_for_log(&s);
        assert!(s.starts_with(truncated));
    }

    #[test]
    fn unwrap_envelope_success() {
        #[derive(serde::Deserialize)]
        struct Body {
            total: u64,
        }
        let body: Body =
            PixivClient::unwrap_envelope(r#"{"error":false,"message":"","body":{"total":7}}"#)
                .unwrap();
        assert_eq!(body.total, 7);
    }

    #[test]
    fn unwrap_envelope_api_error() {
        let result: Result<serde_json::Value> =
            PixivClient::unwrap_envelope(r#"{"error":true,"message":"invalid user"}"#);
        assert!(
            matches!(result, Err(RemoteError::Api { ref message }) if message == "invalid user")
        );
    }

    #[test]
    fn unwrap_envelope_error_without_message() {
        let result: Result<serde_json::Value> =
            PixivClient::unwrap_envelope(r#"{"error":true,"message":""}"#);
        assert!(
            matches!(result, Err(RemoteError::Api { ref message }) if message == "Unknown error")
        );
    }

    #[test]
    fn unwrap_envelope_missing_body() {
        let result: Result<serde_json::Value> =
            PixivClient::unwrap_envelope(r#"{"error":false,"message":""}"#);
        assert!(matches!(result, Err(RemoteError::Parse { .. })));
    }

    #[test]
    fn unwrap_envelope_malformed_json() {
        let result: Result<serde_json::Value> = PixivClient::unwrap_envelope("not json");
        assert!(matches!(result, Err(RemoteError::Parse { .. })));
    }

    #[test]
    fn check_envelope_tolerates_missing_body() {
        assert!(PixivClient::check_envelope(r#"{"error":false,"message":""}"#).is_ok());
    }

    #[test]
    fn check_envelope_surfaces_api_error() {
        let result = PixivClient::check_envelope(r#"{"error":true,"message":"denied"}"#);
        assert!(matches!(result, Err(RemoteError::Api { ref message }) if message == "denied"));
    }
}
