use serde::{Deserialize, Serialize};

/// Unified error type for all remote bookmark-source operations.
///
/// All variants are serializable for structured error reporting across the
/// host boundary. Failures are never retried: the first error aborts the
/// operation and propagates to the caller (the session layer decides how to
/// surface it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum RemoteError {
    /// A network-level error occurred (connection refused, broken stream, etc.).
    Network {
        /// Error details.
        detail: String,
    },

    /// The remote endpoint answered with a non-2xx HTTP status.
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The remote API answered 2xx but its envelope carried `error: true`.
    Api {
        /// Message from the API envelope.
        message: String,
    },

    /// Failed to parse the remote response (malformed JSON, missing `total`,
    /// missing `body`).
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// Identity resolution failed: the redirect did not land on a user page,
    /// or pointed at the login page. The session cookie is missing or stale.
    LoginRequired,

    /// No authenticity token could be scraped from the item detail page.
    TokenNotFound,
}

impl RemoteError {
    /// 是否为预期行为（未登录、页面无 token 等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::LoginRequired | Self::TokenNotFound)
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Status { status } => write!(f, "Remote API error: HTTP {status}"),
            Self::Api { message } => write!(f, "Remote API error: {message}"),
            Self::Parse { detail } => write!(f, "Parse error: {detail}"),
            Self::LoginRequired => write!(f, "Login required"),
            Self::TokenNotFound => write!(f, "Authenticity token not found"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Convenience type alias for `Result<T, RemoteError>`.
pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network() {
        let e = RemoteError::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "Network error: connection refused");
    }

    #[test]
    fn display_status() {
        let e = RemoteError::Status { status: 404 };
        assert_eq!(e.to_string(), "Remote API error: HTTP 404");
    }

    #[test]
    fn display_api() {
        let e = RemoteError::Api {
            message: "invalid request".to_string(),
        };
        assert_eq!(e.to_string(), "Remote API error: invalid request");
    }

    #[test]
    fn display_parse() {
        let e = RemoteError::Parse {
            detail: "missing total".to_string(),
        };
        assert_eq!(e.to_string(), "Parse error: missing total");
    }

    #[test]
    fn display_login_required() {
        assert_eq!(RemoteError::LoginRequired.to_string(), "Login required");
    }

    #[test]
    fn expected_variants() {
        assert!(RemoteError::LoginRequired.is_expected());
        assert!(RemoteError::TokenNotFound.is_expected());
        assert!(
            !RemoteError::Network {
                detail: "x".into()
            }
            .is_expected()
        );
        assert!(!RemoteError::Status { status: 500 }.is_expected());
    }

    #[test]
    fn serialize_json_tagged() {
        let e = RemoteError::Status { status: 429 };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"Status\""));
        assert!(json.contains("\"status\":429"));
    }

    #[test]
    fn deserialize_all_variants() {
        let variants: Vec<RemoteError> = vec![
            RemoteError::Network {
                detail: "d".into(),
            },
            RemoteError::Status { status: 502 },
            RemoteError::Api {
                message: "m".into(),
            },
            RemoteError::Parse {
                detail: "p".into(),
            },
            RemoteError::LoginRequired,
            RemoteError::TokenNotFound,
        ];

        for v in &variants {
            let json = serde_json::to_string(v).unwrap();
            let back: RemoteError = serde_json::from_str(&json).unwrap();
            assert_eq!(back.to_string(), v.to_string());
        }
    }
}
