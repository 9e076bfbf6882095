//! # 开机序列和 3D 场景 Tauri Commands
//!
//! 开机序列由后台任务按系统时钟驱动，事件通过 `boot://event` 推送；
//! 这里的 commands 只负责电源键、快照查询和逐帧场景更新。

use tauri::State;

use crate::models::boot::{BootEvent, BootSnapshot};
use crate::models::scene::FrameInput;
use crate::services::app_state::{AppState, SceneFrame};
use crate::services::audio::KeystrokeTone;
use crate::utils::math::Vec3;

/// 按下电源键
///
/// # 返回值
/// 本次触发产生的事件；已开机时为空
#[tauri::command]
pub fn power_on(state: State<'_, AppState>) -> Result<Vec<BootEvent>, String> {
    state.power_on()
}

#[tauri::command]
pub fn get_boot_snapshot(state: State<'_, AppState>) -> Result<BootSnapshot, String> {
    state.boot_snapshot()
}

/// 更新一帧场景，返回姿态和需要播放的按键音
#[tauri::command]
pub fn advance_scene(input: FrameInput, state: State<'_, AppState>) -> Result<SceneFrame, String> {
    state.advance_scene(input)
}

/// 点击地板
///
/// # 返回值
/// 机器人是否接受了行走目标（只有 idle 时接受）
#[tauri::command]
pub fn set_walk_target(point: Vec3, state: State<'_, AppState>) -> Result<bool, String> {
    state.set_walk_target(point)
}

#[tauri::command]
pub fn press_key(state: State<'_, AppState>) -> Result<KeystrokeTone, String> {
    state.press_key()
}
