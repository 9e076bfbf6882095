//! # 可注入时钟
//!
//! 开机序列只通过 `advance(dt)` 感知时间。桌面端用 `SystemClock` 计算真实的 dt，
//! 测试中用 `ManualClock` 直接快进，不需要真实等待。

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 单调时钟：返回自某个固定起点以来经过的时间
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// 基于 `Instant` 的系统时钟，起点为创建时刻
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// 手动推进的时钟
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将时钟向前拨动 `dt`
    pub fn advance(&self, dt: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += dt;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}
