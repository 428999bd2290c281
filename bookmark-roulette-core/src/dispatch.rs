//! 消息分发层
//!
//! 暴露给 UI 的请求/响应协议：随机跳转、身份解析、UI 事件上报。
//! 错误在这里按 [`ErrorKind`] 归类并映射成面向用户的状态文案；
//! 快捷键触发的失败只记日志（那一刻没有可见的 UI），成功则闪一下
//! 徽标，固定延迟后自动清除。

use std::sync::Arc;
use std::time::Duration;

use bookmark_roulette_remote::{BookmarkKind, BookmarkSource, Visibility};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ErrorKind};
use crate::services::{
    FilterService, NavigationService, RandomJumpService, ServiceContext, StatsService,
    DEFAULT_PER_PAGE,
};
use crate::traits::{BrowserHost, SessionStore};
use crate::types::{BookmarkFilters, BookmarkStats, FilterUpdate, LoginStatus};

/// 徽标显示时长
const BADGE_CLEAR_DELAY: Duration = Duration::from_millis(1500);
/// 跳转成功徽标
const BADGE_TEXT: &str = "✓";
/// 徽标背景色
const BADGE_COLOR: &str = "#0096fa";

/// 跳转触发来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpTrigger {
    /// 弹窗按钮
    Popup,
    /// 全局快捷键
    Shortcut,
}

/// UI 请求消息
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// 执行一次随机跳转
    #[serde(rename_all = "camelCase")]
    RandomJump {
        /// 标签过滤（`None` = 保留当前值）
        #[serde(default)]
        tag_name: Option<String>,
        /// 可见性（`None` = 保留当前值）
        #[serde(default)]
        visibility: Option<Visibility>,
        /// 收藏类型（`None` = 保留当前值）
        #[serde(default)]
        kind: Option<BookmarkKind>,
        /// 触发来源
        trigger: JumpTrigger,
    },
    /// 解析当前身份
    ResolveIdentity,
    /// UI 事件上报（fire-and-forget）
    #[serde(rename_all = "camelCase")]
    TrackEvent {
        /// 事件名
        name: String,
        /// 事件参数
        #[serde(default)]
        params: serde_json::Value,
    },
}

/// UI 响应消息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// 是否成功
    pub ok: bool,
    /// 解析出的用户 ID（仅身份解析）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// 错误分类
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// 面向用户的状态文案
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    fn ok() -> Self {
        Self {
            ok: true,
            user_id: None,
            error_kind: None,
            message: None,
        }
    }

    fn ok_with_user(user_id: String) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::ok()
        }
    }

    fn from_error(error: &CoreError) -> Self {
        let kind = error.kind();
        Self {
            ok: false,
            user_id: None,
            error_kind: Some(kind),
            message: Some(status_message(kind).to_string()),
        }
    }
}

/// 错误分类到状态文案的映射
#[must_use]
pub fn status_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::LoginRequired => "Please log in to pixiv first.",
        ErrorKind::NoActiveTab => "No active tab.",
        ErrorKind::WrongSiteTab => "Open a pixiv page first.",
        ErrorKind::NoBookmarksFound => "No bookmarks found.",
        ErrorKind::MissingStats => "Visit a bookmarks page and try again.",
        ErrorKind::RemoteApi => "pixiv request failed. Try again later.",
        ErrorKind::BookmarkNotFound => "This work is not in your bookmarks.",
        ErrorKind::TabUpdateFailed => "Could not open the bookmark.",
        ErrorKind::Storage | ErrorKind::Unknown => "An unknown error occurred.",
    }
}

/// 消息分发器
pub struct Dispatcher {
    ctx: Arc<ServiceContext>,
    filters: FilterService,
    stats: StatsService,
    jump: RandomJumpService,
    navigation: NavigationService,
}

impl Dispatcher {
    /// 创建分发器
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            filters: FilterService::new(ctx.clone()),
            stats: StatsService::new(ctx.clone()),
            jump: RandomJumpService::new(ctx.clone()),
            navigation: NavigationService::new(ctx.clone()),
            ctx,
        }
    }

    /// 处理一条 UI 请求
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::RandomJump {
                tag_name,
                visibility,
                kind,
                trigger,
            } => {
                self.handle_jump(
                    FilterUpdate {
                        tag_name,
                        visibility,
                        kind,
                    },
                    trigger,
                )
                .await
            }
            Request::ResolveIdentity => self.handle_resolve().await,
            Request::TrackEvent { name, params } => {
                log::debug!("UI event: {name} {params}");
                Response::ok()
            }
        }
    }

    async fn handle_jump(&self, update: FilterUpdate, trigger: JumpTrigger) -> Response {
        match self.perform_jump(update).await {
            Ok(()) => {
                if trigger == JumpTrigger::Shortcut {
                    self.flash_badge().await;
                }
                Response::ok()
            }
            Err(e) => self.fail(&e, trigger).await,
        }
    }

    async fn perform_jump(&self, update: FilterUpdate) -> CoreResult<()> {
        let tab = self
            .ctx
            .browser
            .active_tab()
            .await?
            .ok_or(CoreError::NoActiveTab)?;
        let filters = self.filters.update(update).await?;
        let item_id = self.jump.pick_random(&filters).await?;
        self.navigation.navigate(tab.id, &item_id, filters.kind).await
    }

    async fn handle_resolve(&self) -> Response {
        match self.resolve_identity().await {
            Ok(user_id) => Response::ok_with_user(user_id),
            Err(e) => self.fail(&e, JumpTrigger::Popup).await,
        }
    }

    /// 身份解析总是走远端（UI 用它来确认登录态），成功后回填会话
    /// 缓存并为默认过滤组合预热统计。
    async fn resolve_identity(&self) -> CoreResult<String> {
        let user_id = self.ctx.source.resolve_user_id().await?;
        self.ctx.session.set_user_id(&user_id).await?;
        self.write_login_status(true).await;

        let filters = BookmarkFilters::default();
        let total = self
            .ctx
            .source
            .fetch_total(&user_id, &filters.tag_name, filters.visibility, filters.kind)
            .await?;
        self.stats
            .put(&BookmarkStats {
                user_id: user_id.clone(),
                tag_name: filters.tag_name,
                visibility: filters.visibility,
                kind: filters.kind,
                total,
                per_page: DEFAULT_PER_PAGE,
                updated_at: Utc::now(),
            })
            .await?;
        Ok(user_id)
    }

    /// 统一的失败出口：分级记日志、维护登录态、组装响应
    async fn fail(&self, error: &CoreError, trigger: JumpTrigger) -> Response {
        if error.is_expected() {
            log::warn!("Request failed: {error}");
        } else {
            log::error!("Request failed: {error}");
        }
        if error.kind() == ErrorKind::LoginRequired {
            self.write_login_status(false).await;
        }
        if trigger == JumpTrigger::Shortcut {
            // 快捷键没有 UI 可回显，响应只为统一返回形态
            log::warn!("Shortcut-triggered request failed silently");
        }
        Response::from_error(error)
    }

    async fn write_login_status(&self, is_logged_in: bool) {
        let status = LoginStatus::new(is_logged_in, Utc::now());
        if let Err(e) = self.ctx.session.set_login_status(&status).await {
            log::error!("Failed to persist login status: {e}");
        }
    }

    /// 跳转成功的徽标反馈：显示固定时长后清除
    async fn flash_badge(&self) {
        if let Err(e) = self.ctx.browser.set_badge(BADGE_TEXT, BADGE_COLOR).await {
            log::warn!("Badge set failed: {e}");
            return;
        }
        tokio::time::sleep(BADGE_CLEAR_DELAY).await;
        if let Err(e) = self.ctx.browser.clear_badge().await {
            log::warn!("Badge clear failed: {e}");
        }
    }
}
