//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `content` - 作品集内容库：加载、校验、只读访问
//! - `settings` - 应用设置与 API 密钥
//! - `chat` - 聊天桥：系统提示词、Gemini 流式请求、对话记录
//! - `export` - 对话记录导出：Markdown/JSON 格式
//! - `boot` - 开机序列状态机
//! - `scene` - 3D 场景逐帧更新（相机、机器人、键盘、天空）
//! - `audio` - 键盘按键音合成
//! - `shell` - 主界面外壳：面板切换和视图模型
//! - `assets` - 图片加载失败回退
//! - `app_state` - 应用全局状态，组合以上各服务

pub mod app_state;
pub mod assets;
pub mod audio;
pub mod boot;
pub mod chat;
pub mod content;
pub mod export;
pub mod scene;
pub mod settings;
pub mod shell;
