//! # 终端聊天 Tauri Commands
//!
//! 回复片段通过 IPC `Channel` 逐个推送，前端不需要轮询。

use tauri::State;
use tauri::ipc::Channel;

use crate::models::chat::{ChatEvent, ChatMessage};
use crate::services::app_state::AppState;
use crate::services::export::ExportFormat;

/// 发送一条消息并流式接收回复
///
/// # 参数
/// - `input` - 用户输入
/// - `on_event` - 聊天事件通道：开始 → 若干片段 → 结束
///
/// # 返回值
/// 完整的回复消息
///
/// # 错误
/// 输入为空或上一条回复尚未结束时返回错误
#[tauri::command]
pub async fn send_chat_message(
    input: String,
    on_event: Channel<ChatEvent>,
    state: State<'_, AppState>,
) -> Result<ChatMessage, String> {
    state
        .send_chat(&input, |event| {
            if let Err(e) = on_event.send(event) {
                log::warn!("推送聊天事件失败: {}", e);
            }
        })
        .await
}

#[tauri::command]
pub fn get_transcript(state: State<'_, AppState>) -> Result<Vec<ChatMessage>, String> {
    state.transcript()
}

/// 导出对话记录，返回文件内容，由前端选择保存位置
#[tauri::command]
pub fn export_transcript(
    format: ExportFormat,
    state: State<'_, AppState>,
) -> Result<String, String> {
    state.export_transcript(format)
}
