//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize` 和 `Deserialize`，用于 Tauri IPC 传输和配置文件读写。
//! - `portfolio` - 作品集内容（个人资料、项目、经历）
//! - `chat` - 聊天消息和流事件
//! - `boot` - 开机序列状态、机器人动作和日志行
//! - `scene` - 3D 场景每帧输入和姿态
//! - `shell` - 主界面面板和视图模型
//! - `settings` - 应用设置

pub mod boot;
pub mod chat;
pub mod portfolio;
pub mod scene;
pub mod settings;
pub mod shell;
