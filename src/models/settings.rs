//! # 应用设置数据模型
//!
//! 定义了可选设置文件 `~/.neural-portfolio/settings.json` 的结构（AppSettings）。
//! 所有字段都有默认值，文件不存在或缺少某个字段时使用默认值。
//!
//! API Key 不写入设置文件，只从进程环境变量读取。

use serde::{Deserialize, Serialize};

/// 默认使用的 Gemini 模型
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 默认采样温度
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Gemini REST API 的模型根路径
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 应用设置
///
/// 对应设置文件内容：
/// ```json
/// {
///   "model": "gemini-2.5-flash",
///   "temperature": 0.7,
///   "apiBaseUrl": "https://generativelanguage.googleapis.com/v1beta/models",
///   "contentPath": "/path/to/portfolio.yaml"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// 聊天使用的模型名称
    pub model: String,

    /// 采样温度
    pub temperature: f32,

    /// API 根路径：测试或代理场景下可以替换
    pub api_base_url: String,

    /// 替换内置作品集内容的 YAML 文件路径（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_path: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            content_path: None,
        }
    }
}
