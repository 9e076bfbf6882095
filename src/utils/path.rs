//! # 路径工具函数
//!
//! 提供应用配置目录相关的路径：
//! - 应用配置目录（`~/.neural-portfolio/`）
//! - 设置文件（`~/.neural-portfolio/settings.json`）

use std::path::PathBuf;

/// 配置目录名（位于用户主目录下）
const CONFIG_DIR_NAME: &str = ".neural-portfolio";

/// 获取应用配置目录的绝对路径
///
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 错误
/// 如果无法确定用户主目录（如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.neural-portfolio`
/// - Linux/macOS: `/home/username/.neural-portfolio`
pub fn get_app_config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// 获取设置文件的绝对路径
pub fn get_settings_file_path() -> Result<PathBuf, String> {
    Ok(get_app_config_path()?.join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_file_lives_in_config_dir() {
        // 没有主目录的环境下两者都会报错，此时无需断言
        if let (Ok(dir), Ok(file)) = (get_app_config_path(), get_settings_file_path()) {
            assert!(dir.ends_with(CONFIG_DIR_NAME));
            assert_eq!(file.parent(), Some(dir.as_path()));
            assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("settings.json"));
        }
    }
}
