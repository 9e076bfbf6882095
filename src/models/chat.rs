//! # 聊天消息数据模型
//!
//! 定义了终端聊天面板中的消息（ChatMessage）、角色（ChatRole）以及
//! 发送给聊天桥的历史记录条目（HistoryTurn）。
//!
//! 消息只保存在内存中，刷新或重启后不保留。

use serde::{Deserialize, Serialize};

/// 消息角色
///
/// 序列化为 `"user"` / `"model"`，与 Gemini API 的角色名保持一致，
/// 前端也直接使用这两个值决定气泡的左右位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Assistant,
}

impl ChatRole {
    /// Gemini API 中使用的角色名
    pub fn as_api_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

/// 聊天消息
///
/// 生命周期：提交时创建 → 流式片段到达时原地追加 `text` → 流结束时冻结（`streaming = false`）。
/// `text` 只会被追加，不会被改写。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface ChatMessage {
///   id: string;
///   role: 'user' | 'model';
///   text: string;
///   isStreaming?: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// 唯一标识符：在同一份对话记录内唯一
    pub id: String,

    pub role: ChatRole,

    pub text: String,

    /// 是否仍在接收流式片段（前端据此显示闪烁光标）
    #[serde(rename = "isStreaming")]
    pub streaming: bool,
}

/// 发送给聊天桥的一条历史记录（角色 + 文本）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: ChatRole,
    pub text: String,
}

/// 推送给前端的聊天流事件
///
/// 通过 Tauri IPC Channel 逐个发送，前端据此增量渲染回复。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChatEvent {
    /// 用户消息和空的助手消息已加入对话记录
    #[serde(rename_all = "camelCase")]
    Started { user_id: String, reply_id: String },
    /// 收到一个文本片段
    Fragment { id: String, text: String },
    /// 回复结束，消息已冻结
    Finished { message: ChatMessage },
}
