//! # bookmark-roulette-remote
//!
//! Typed client for the pixiv bookmark ajax API, consumed by the
//! `bookmark-roulette-core` session layer.
//!
//! ## What it covers
//!
//! - Paginated bookmark pages per filter tuple (tag, visibility, kind),
//!   returning `{works, total}`.
//! - Identity resolution: a credentialed request to the legacy bookmarks
//!   page whose redirect target embeds the numeric user id.
//! - Bookmark removal: scraping the authenticity token and the
//!   removal-relation id from the artwork detail page's embedded bootstrap
//!   payload, with a secondary JSON detail endpoint as fallback.
//! - Bookmark creation and user-profile lookup.
//!
//! ## Credentials
//!
//! A browser attaches session cookies implicitly; outside a browser that
//! ambient capability must be explicit. Every request carries the
//! [`SessionCredentials`] cookie header injected at construction:
//!
//! ```rust,no_run
//! use bookmark_roulette_remote::{
//!     BookmarkKind, BookmarkSource, PixivClient, SessionCredentials, Visibility,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PixivClient::new(SessionCredentials::from_cookie_header(
//!     "PHPSESSID=...",
//! ))?;
//! let user_id = client.resolve_user_id().await?;
//! let page = client
//!     .fetch_bookmark_page(&user_id, "", 0, 48, Visibility::Show, BookmarkKind::Images)
//!     .await?;
//! println!("{} bookmarks", page.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure semantics
//!
//! Operations return [`Result<T, RemoteError>`](RemoteError). There are no
//! retries and no request timeouts: the first failure aborts the operation
//! and propagates to the caller unchanged.

mod auth;
mod client;
mod error;
mod http;
mod traits;
mod types;
pub mod urls;

// Re-export error types
pub use error::{RemoteError, Result};

// Re-export the source trait and its production implementation
pub use client::PixivClient;
pub use traits::BookmarkSource;

// Re-export types
pub use types::{
    BookmarkData, BookmarkInfo, BookmarkKind, BookmarkPage, BookmarkPageBody, RemoteEnvelope,
    RemoteWork, SessionCredentials, UserProfile, Visibility,
};
