//! # 图片加载失败回退
//!
//! 头像和项目封面都是远程图片。前端报告某张图片加载失败后，该图片切换为
//! 本地占位图标，并且不再切回远程地址，避免"失败 → 重试 → 失败"的闪烁循环。
//!
//! 回退状态跟随面板的生命周期：离开面板时该面板的图片状态被清除，
//! 下次进入时重新尝试加载远程图片。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::shell::{ImageView, Panel};

/// 头像加载失败时的占位图标
pub const AVATAR_PLACEHOLDER: &str = "user";
/// 项目封面加载失败时的占位文字
pub const PROJECT_PLACEHOLDER: &str = "IMG_NOT_FOUND";

/// 界面上的一个图片位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ImageSlot {
    /// 仪表盘头像
    Avatar,
    /// 项目卡片封面（项目 id）
    Project(String),
}

impl ImageSlot {
    /// 图片所在的面板
    pub fn panel(&self) -> Panel {
        match self {
            ImageSlot::Avatar => Panel::Dashboard,
            ImageSlot::Project(_) => Panel::Projects,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            ImageSlot::Avatar => AVATAR_PLACEHOLDER,
            ImageSlot::Project(_) => PROJECT_PLACEHOLDER,
        }
    }
}

/// 已回退为占位图标的图片集合
#[derive(Debug, Default)]
pub struct ImageRegistry {
    failed: HashSet<ImageSlot>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次加载失败
    ///
    /// # 返回值
    /// 本次调用是否使图片切换为占位图标（同一图片重复报告返回 `false`）
    pub fn report_failure(&mut self, slot: ImageSlot) -> bool {
        let switched = self.failed.insert(slot.clone());
        if switched {
            log::debug!("图片加载失败，切换为占位图标: {:?}", slot);
        }
        switched
    }

    pub fn is_fallback(&self, slot: &ImageSlot) -> bool {
        self.failed.contains(slot)
    }

    /// 图片当前的显示方式
    pub fn view(&self, slot: &ImageSlot, url: &str) -> ImageView {
        if self.is_fallback(slot) {
            ImageView::Placeholder {
                glyph: slot.placeholder().to_string(),
            }
        } else {
            ImageView::Remote {
                url: url.to_string(),
            }
        }
    }

    /// 清除某个面板内全部图片的回退状态
    pub fn reset_panel(&mut self, panel: Panel) {
        self.failed.retain(|slot| slot.panel() != panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_switches_once() {
        let mut images = ImageRegistry::new();
        let slot = ImageSlot::Project("3".into());

        assert_eq!(
            images.view(&slot, "https://img"),
            ImageView::Remote {
                url: "https://img".into()
            }
        );
        assert!(images.report_failure(slot.clone()));
        assert!(!images.report_failure(slot.clone()));
        assert_eq!(
            images.view(&slot, "https://img"),
            ImageView::Placeholder {
                glyph: PROJECT_PLACEHOLDER.into()
            }
        );
    }

    #[test]
    fn test_slots_are_independent() {
        let mut images = ImageRegistry::new();
        images.report_failure(ImageSlot::Avatar);
        assert!(images.is_fallback(&ImageSlot::Avatar));
        assert!(!images.is_fallback(&ImageSlot::Project("2".into())));
        assert_eq!(
            images.view(&ImageSlot::Avatar, "u"),
            ImageView::Placeholder {
                glyph: AVATAR_PLACEHOLDER.into()
            }
        );
    }

    #[test]
    fn test_reset_panel_only_clears_its_slots() {
        let mut images = ImageRegistry::new();
        images.report_failure(ImageSlot::Avatar);
        images.report_failure(ImageSlot::Project("2".into()));

        images.reset_panel(Panel::Projects);
        assert!(images.is_fallback(&ImageSlot::Avatar));
        assert!(!images.is_fallback(&ImageSlot::Project("2".into())));

        // 清除后可以再次回退
        assert!(images.report_failure(ImageSlot::Project("2".into())));
    }
}
