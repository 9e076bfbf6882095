//! # Neural Portfolio - Cargo 构建脚本
//!
//! 仅在启用 `desktop` feature 时执行 Tauri 的构建前处理：
//! 生成运行时资源绑定、处理图标和权限清单。
//! 默认构建（核心库 + 测试）不依赖 Tauri，也不需要 `tauri.conf.json` 之外的任何资源。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
