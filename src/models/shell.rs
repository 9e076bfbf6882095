//! # 视图外壳数据模型
//!
//! 描述主界面（"NEURAL_OS"）的面板、侧边导航和各面板的视图模型。
//! 前端拿到 `ShellView` 后只负责排版和样式，不再做任何业务判断。

use serde::{Deserialize, Serialize};

use crate::models::chat::ChatMessage;
use crate::models::portfolio::{DashboardStat, ExperienceEntry, SocialLinks};

/// 四个固定面板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    #[default]
    Dashboard,
    Projects,
    Experience,
    /// 终端聊天
    Terminal,
}

impl Panel {
    /// 侧边栏顺序
    pub const ALL: [Panel; 4] = [
        Panel::Dashboard,
        Panel::Projects,
        Panel::Experience,
        Panel::Terminal,
    ];

    /// 侧边栏和面板标题上显示的名称
    pub fn label(self) -> &'static str {
        match self {
            Panel::Dashboard => "DASHBOARD",
            Panel::Projects => "PROJECTS",
            Panel::Experience => "LOGS",
            Panel::Terminal => "TERMINAL",
        }
    }
}

/// 图片的显示方式
///
/// 远程图片加载失败后切换为本地占位图标，之后不会再切回（避免闪烁循环）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageView {
    Remote { url: String },
    Placeholder { glyph: String },
}

/// 侧边栏按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub panel: Panel,
    pub label: String,
    pub active: bool,
}

/// 仪表盘面板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub avatar: ImageView,
    pub social: SocialLinks,
    pub stats: Vec<DashboardStat>,
    pub skills: Vec<String>,
}

/// 项目卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ImageView,
    /// 最多三个技术标签
    pub tags: Vec<String>,
    /// 未显示的标签数量（前端显示为 "+N"），为 0 时不显示
    pub hidden_tag_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// 面板主体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", content = "content", rename_all = "snake_case")]
pub enum PanelBody {
    Dashboard(DashboardView),
    Projects(Vec<ProjectCard>),
    Experience(Vec<ExperienceEntry>),
    Terminal(Vec<ChatMessage>),
}

/// 主界面视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellView {
    pub active: Panel,
    /// 面板标题（与侧边栏名称一致）
    pub heading: String,
    pub nav: Vec<NavItem>,
    pub body: PanelBody,
}
