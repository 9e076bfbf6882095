//! # Neural Portfolio - 应用核心
//!
//! 复古电脑 3D 作品集的全部状态和逻辑都在本 crate 中，前端 webview 只负责绘制：
//! - 作品集内容库（个人资料、项目、经历）
//! - 终端聊天：转发到 Gemini 的流式回复
//! - 开机序列状态机和 3D 场景逐帧更新
//! - 主界面外壳：面板切换、图片回退
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop` feature）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑
//! - `utils/` - 通用工具函数
//!
//! 默认构建只包含核心库，`desktop` feature 额外编译 Tauri 外壳和 `run()`。

#[cfg(feature = "desktop")]
mod commands;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
use std::time::Duration;

#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};

#[cfg(feature = "desktop")]
use models::boot::BootEvent;
#[cfg(feature = "desktop")]
use services::app_state::AppState;
#[cfg(feature = "desktop")]
use services::boot::BootDriver;
#[cfg(feature = "desktop")]
use utils::clock::SystemClock;

/// 开机序列的驱动间隔（约 60 帧/秒）
#[cfg(feature = "desktop")]
const BOOT_TICK: Duration = Duration::from_millis(16);

/// 推送给前端的开机事件名
#[cfg(feature = "desktop")]
pub const BOOT_EVENT: &str = "boot://event";

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册 Tauri 插件（文件系统、对话框、Opener）
/// 2. 在 `setup` 钩子中初始化应用状态（设置、作品集内容、Gemini 后端）
/// 3. 启动开机序列的后台驱动任务
/// 4. 注册所有 IPC commands 并启动主事件循环
///
/// # Panics
/// 应用状态初始化失败（如作品集内容无效）或窗口创建失败时 panic
pub fn run() {
    tauri::Builder::default()
        // 导出对话记录：前端选择保存位置并写入文件
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_dialog::init())
        // 在系统浏览器中打开 GitHub / LinkedIn / 项目链接
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            // 作品集内容 commands
            commands::content::get_portfolio,
            commands::content::open_link,
            // 终端聊天 commands
            commands::chat::send_chat_message,
            commands::chat::get_transcript,
            commands::chat::export_transcript,
            // 开机序列和 3D 场景 commands
            commands::scene::power_on,
            commands::scene::get_boot_snapshot,
            commands::scene::advance_scene,
            commands::scene::set_walk_target,
            commands::scene::press_key,
            // 主界面 commands
            commands::shell::select_panel,
            commands::shell::get_shell_view,
            commands::shell::report_image_error,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            let state = tauri::async_runtime::block_on(AppState::bootstrap())?;
            app.manage(state);
            spawn_boot_driver(app.handle().clone());
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// 后台驱动开机序列，把每个事件推送给前端，进入主界面后退出
#[cfg(feature = "desktop")]
fn spawn_boot_driver(app: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        let mut driver = BootDriver::new(SystemClock::new());
        let mut interval = tokio::time::interval(BOOT_TICK);
        loop {
            interval.tick().await;

            let state = app.state::<AppState>();
            let events = match state.drive_boot(&mut driver) {
                Ok(events) => events,
                Err(e) => {
                    log::warn!("开机序列驱动失败: {}", e);
                    break;
                }
            };

            for event in &events {
                if let Err(e) = app.emit(BOOT_EVENT, event) {
                    log::warn!("推送开机事件失败: {}", e);
                }
            }
            if events.contains(&BootEvent::Entered) {
                log::info!("开机序列完成");
                break;
            }
        }
    });
}
