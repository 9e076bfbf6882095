//! # 主界面外壳（View Shell）
//!
//! 开机完成前只显示 3D 场景；进入后显示侧边导航和四个面板之一。
//! 默认面板为仪表盘，重复选择当前面板不产生任何变化。

use crate::models::shell::{DashboardView, NavItem, Panel, PanelBody, ProjectCard, ShellView};
use crate::services::assets::{ImageRegistry, ImageSlot};
use crate::services::chat::transcript::Transcript;
use crate::services::content::ContentStore;

/// 项目卡片上最多显示的技术标签数
pub const MAX_VISIBLE_TAGS: usize = 3;

#[derive(Debug, Default)]
pub struct ShellState {
    active: Panel,
    entered: bool,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// 切换面板
    ///
    /// # 返回值
    /// 面板是否发生了变化
    pub fn select(&mut self, panel: Panel) -> bool {
        if self.active == panel {
            return false;
        }
        self.active = panel;
        true
    }

    /// 开机序列结束，主界面出现
    pub fn enter(&mut self) {
        if !self.entered {
            log::info!("进入主界面");
        }
        self.entered = true;
    }

    /// 生成主界面视图
    ///
    /// # 返回值
    /// 尚未进入主界面时返回 `None`
    pub fn render(
        &self,
        content: &ContentStore,
        images: &ImageRegistry,
        transcript: &Transcript,
    ) -> Option<ShellView> {
        if !self.entered {
            return None;
        }

        let nav = Panel::ALL
            .iter()
            .map(|&panel| NavItem {
                panel,
                label: panel.label().to_string(),
                active: panel == self.active,
            })
            .collect();

        let body = match self.active {
            Panel::Dashboard => PanelBody::Dashboard(dashboard(content, images)),
            Panel::Projects => PanelBody::Projects(project_cards(content, images)),
            Panel::Experience => PanelBody::Experience(content.portfolio().experience.clone()),
            Panel::Terminal => PanelBody::Terminal(transcript.messages().to_vec()),
        };

        Some(ShellView {
            active: self.active,
            heading: self.active.label().to_string(),
            nav,
            body,
        })
    }
}

fn dashboard(content: &ContentStore, images: &ImageRegistry) -> DashboardView {
    let portfolio = content.portfolio();
    let profile = &portfolio.profile;
    DashboardView {
        name: profile.name.clone(),
        title: profile.title.clone(),
        bio: profile.bio.clone(),
        avatar: images.view(&ImageSlot::Avatar, &profile.avatar_url),
        social: profile.social.clone(),
        stats: portfolio.stats.clone(),
        skills: portfolio.skills.clone(),
    }
}

fn project_cards(content: &ContentStore, images: &ImageRegistry) -> Vec<ProjectCard> {
    content
        .portfolio()
        .projects
        .iter()
        .map(|project| ProjectCard {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            image: images.view(&ImageSlot::Project(project.id.clone()), &project.image_url),
            tags: project
                .tech_stack
                .iter()
                .take(MAX_VISIBLE_TAGS)
                .cloned()
                .collect(),
            hidden_tag_count: project.tech_stack.len().saturating_sub(MAX_VISIBLE_TAGS),
            repo_url: project.repo_url.clone(),
            demo_url: project.demo_url.clone(),
        })
        .collect()
}
