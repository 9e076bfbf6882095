//! # 作品集内容 Tauri Commands

use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use crate::models::portfolio::Portfolio;
use crate::services::app_state::AppState;

/// 获取完整的作品集内容
#[tauri::command]
pub fn get_portfolio(state: State<'_, AppState>) -> Portfolio {
    state.content().portfolio().clone()
}

/// 在系统浏览器中打开链接
///
/// 只允许打开作品集内容中出现过的链接（社交链接、项目仓库和演示地址）。
///
/// # 错误
/// 链接不在作品集内容中或系统无法打开时返回错误
#[tauri::command]
pub fn open_link(app: AppHandle, url: String, state: State<'_, AppState>) -> Result<(), String> {
    let url = state.resolve_link(&url)?;
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| format!("打开链接失败: {}", e))
}
