//! # 通用工具模块
//!
//! - `path` - 配置目录路径
//! - `clock` - 可注入的时钟（系统时钟 / 手动时钟）
//! - `math` - 场景动画用的三维向量和插值

pub mod clock;
pub mod math;
pub mod path;
