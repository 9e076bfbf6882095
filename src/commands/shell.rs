//! # 主界面 Tauri Commands

use tauri::State;

use crate::models::shell::{Panel, ShellView};
use crate::services::app_state::AppState;
use crate::services::assets::ImageSlot;

/// 切换面板
///
/// # 返回值
/// 面板是否发生了变化（重复选择当前面板返回 `false`）
#[tauri::command]
pub fn select_panel(panel: Panel, state: State<'_, AppState>) -> Result<bool, String> {
    state.select_panel(panel)
}

/// 获取主界面视图；开机序列结束前为 `null`
#[tauri::command]
pub fn get_shell_view(state: State<'_, AppState>) -> Result<Option<ShellView>, String> {
    state.shell_view()
}

/// 前端报告图片加载失败，返回该图片是否切换为占位图标
#[tauri::command]
pub fn report_image_error(slot: ImageSlot, state: State<'_, AppState>) -> Result<bool, String> {
    state.report_image_error(slot)
}
