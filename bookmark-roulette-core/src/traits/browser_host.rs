//! 浏览器宿主能力抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// 活动标签页信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabInfo {
    /// 标签页 ID（宿主可能给不出来，例如 devtools 窗口）
    pub id: Option<u32>,
    /// 当前 URL
    pub url: Option<String>,
}

/// 浏览器宿主 Trait
///
/// 标签页与徽标操作的最小集合。实现方把底层标签页 API 的失败以
/// [`CoreError::TabUpdateFailed`](crate::CoreError::TabUpdateFailed)
/// 形式上抛（例如更新时标签页已关闭）。
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// 查询当前窗口的活动标签页
    async fn active_tab(&self) -> CoreResult<Option<TabInfo>>;

    /// 原地更新标签页 URL
    async fn update_tab(&self, tab_id: u32, url: &str) -> CoreResult<()>;

    /// 新开标签页
    async fn create_tab(&self, url: &str) -> CoreResult<()>;

    /// 重新加载标签页
    async fn reload_tab(&self, tab_id: u32) -> CoreResult<()>;

    /// 设置扩展徽标文本与背景色
    async fn set_badge(&self, text: &str, color: &str) -> CoreResult<()>;

    /// 清除徽标
    async fn clear_badge(&self) -> CoreResult<()>;
}
