//! # 设置与环境配置服务
//!
//! - `load_settings` - 读取 `~/.neural-portfolio/settings.json`，文件不存在时使用默认值
//! - `read_api_key` / `api_key_from_env` - 从环境变量读取 Gemini API Key
//!
//! API Key 只在启动时读取一次，不写入任何文件。

use std::path::Path;

use crate::models::settings::AppSettings;
use crate::utils::path;

/// 依次查找的 API Key 环境变量
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// 读取应用设置文件
///
/// # 返回值
/// 设置文件不存在时返回默认设置
///
/// # 错误
/// 无法定位主目录、文件存在但无法读取或 JSON 解析失败时返回错误
pub async fn load_settings() -> Result<AppSettings, String> {
    let settings_path = path::get_settings_file_path()?;
    load_settings_from(&settings_path).await
}

/// 从指定路径读取应用设置
pub async fn load_settings_from(settings_path: &Path) -> Result<AppSettings, String> {
    if !settings_path.exists() {
        return Ok(AppSettings::default());
    }

    let content = tokio::fs::read_to_string(settings_path)
        .await
        .map_err(|e| format!("读取设置文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析设置文件失败: {}", e))
}

/// 按 `API_KEY_VARS` 的顺序查找第一个非空的 API Key
///
/// # 参数
/// - `lookup` - 变量查找函数（桌面端传入 `std::env::var`，测试中传入固定表）
pub fn read_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// 从进程环境变量读取 API Key
pub fn api_key_from_env() -> Option<String> {
    let key = read_api_key(|name| std::env::var(name).ok());
    if key.is_none() {
        log::warn!("未配置 API_KEY / GEMINI_API_KEY，聊天请求将返回系统错误提示");
    }
    key
}
