//! # 作品集内容数据模型
//!
//! 定义了个人资料（Profile）、项目（Project）、经历（ExperienceEntry）等只读结构体，
//! 对应前端 TypeScript 中的 `Project`、`Experience` 接口以及 `PORTFOLIO_DATA` 常量。
//!
//! 这些数据在启动时从内置 YAML（或用户覆盖文件）加载一次，之后不再修改。
//! 列表的顺序即作者编写时的展示顺序，不存在可排序的字段。

use serde::{Deserialize, Serialize};

/// 作品集的完整内容
///
/// 既是 Content Store 的根节点，也是 `get_portfolio` command 的返回值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// 个人资料
    pub profile: Profile,

    /// 技能标签：按展示顺序排列
    pub skills: Vec<String>,

    /// 仪表盘统计卡片（如 "PROJECTS / 5+"）
    #[serde(default)]
    pub stats: Vec<DashboardStat>,

    /// 项目列表：按展示顺序排列，`id` 在列表内唯一
    pub projects: Vec<Project>,

    /// 经历列表：按作者编写顺序排列，`id` 在列表内唯一
    pub experience: Vec<ExperienceEntry>,
}

/// 个人资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    /// 头像 URL：加载失败时前端显示占位图标
    pub avatar_url: String,
    pub bio: String,
    pub social: SocialLinks,
}

/// 社交链接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub github: String,
    pub linkedin: String,
    /// `mailto:` 形式的邮箱链接
    pub email: String,
}

/// 仪表盘统计卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStat {
    pub label: String,
    pub value: String,
}

/// 项目数据结构
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface Project {
///   id: string;
///   title: string;
///   description: string;
///   techStack: string[];
///   imageUrl: string;
///   repoUrl?: string;
///   demoUrl?: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,

    /// 技术栈标签：有序，卡片上只展示前三个
    pub tech_stack: Vec<String>,

    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// 经历条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub role: String,
    pub organization: String,
    /// 时间段标签（如 "2024"），仅用于展示
    pub period: String,
    /// 描述要点：有序
    pub description: Vec<String>,
}
