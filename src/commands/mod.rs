//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `content` - 作品集内容和外部链接
//! - `chat` - 终端聊天：发送消息、读取和导出对话记录
//! - `scene` - 开机序列和 3D 场景
//! - `shell` - 主界面面板和图片回退

pub mod chat;
pub mod content;
pub mod scene;
pub mod shell;
