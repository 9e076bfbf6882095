//! # 开机序列状态机
//!
//! 3D 复古电脑场景的开机流程，状态只前进不后退：
//!
//! ```text
//! standby ──power_on──▶ (按键 1.2s) ──▶ welcome ──3.5s──▶ booting ──日志结束 +0.8s──▶ ready
//! ```
//!
//! - `power_on` 之后机器人先走向电源键（agent = pressing），公开状态仍为 standby
//! - 进入 welcome 时机器人转向键盘打字（agent = typing），欢迎语每 50ms 显示一个字符
//! - 进入 booting 时一次性排好 18 行开机日志，每行比上一行晚 100~400ms
//! - 最后一行出现 0.8s 后进入 ready：触发进入回调（只触发一次），机器人回到 idle
//!
//! 状态机不读取时钟，只通过 `advance(dt)` 感知时间。所有转换都锚定在预定时刻上，
//! 因此一次推进 20 秒和每帧推进 16ms 得到的事件序列完全相同。

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::boot::{AgentAction, BootEvent, BootSnapshot, BootState, LogLine};
use crate::utils::clock::Clock;

/// 机器人走到电源键并按下所需时间
pub const PRESS_DURATION: Duration = Duration::from_millis(1200);

/// 欢迎语停留时间
pub const WELCOME_DURATION: Duration = Duration::from_millis(3500);

/// 最后一行日志之后到 ready 的等待时间
pub const SETTLE_DURATION: Duration = Duration::from_millis(800);

/// 欢迎语每个字符的显示间隔
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(50);

/// 屏幕上保留的日志行数
pub const LOG_WINDOW: usize = 13;

/// 相邻两行日志的间隔范围（毫秒，左闭右开）
pub const JITTER_RANGE_MS: std::ops::Range<u64> = 100..400;

/// 开机日志脚本
pub const BOOT_SCRIPT: [&str; 18] = [
    "BIOS DATE 09/22/2099 14:22:54 VER 1.0.4",
    "CPU: QUANTUM CORE i9-9900K @ 8.0GHZ",
    "DETECTING NVRAM... 64GB OK",
    "LOADING KERNEL... NEURAL_OS_V4.2",
    "> CHECKING PERIPHERALS...",
    "  [OK] NVIDIA T1000 DETECTED",
    "  [OK] GOOGLE_TPU_V5 POD CONNECTED",
    "> LOADING ML_DRIVERS...",
    "  ... TENSORFLOW_BACKEND [INIT]",
    "  ... PYTORCH_CUDA_STREAMS [ACTIVE]",
    "> MOUNTING DATASETS...",
    "  ... /mnt/experience... [MOUNTED]",
    "  ... /mnt/projects... [MOUNTED]",
    "> STARTING SERVICES...",
    "  ... GEMINI_AGENT.EXE [LISTENING]",
    "  ... REACT_RENDERER_D [READY]",
    "> EXECUTING USER_PROFILE...",
    "SYSTEM READY.",
];

/// 欢迎语全文
pub fn welcome_message(first_name: &str) -> String {
    format!("Welcome to {}'s Portfolio.....", first_name)
}

// ============ 日志间隔 ============

/// 相邻日志行的间隔来源
pub trait Jitter: Send {
    fn next_delay(&mut self) -> Duration;
}

/// 在 `JITTER_RANGE_MS` 内均匀随机
pub struct RandomJitter<R: Rng + Send> {
    rng: R,
}

impl<R: Rng + Send> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<StdRng> {
    /// 以系统熵初始化
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> Jitter for RandomJitter<R> {
    fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(JITTER_RANGE_MS))
    }
}

/// 固定间隔
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn next_delay(&mut self) -> Duration {
        self.0
    }
}

// ============ 状态机 ============

enum Phase {
    Standby,
    /// 机器人正走向电源键
    Pressing { welcome_at: Duration },
    Welcome { since: Duration, booting_at: Duration },
    Booting {
        pending: VecDeque<(Duration, &'static str)>,
        ready_at: Duration,
    },
    Ready,
}

type EnteredCallback = Box<dyn FnOnce() + Send>;

/// 开机序列
pub struct BootSequence {
    greeting: String,
    phase: Phase,
    elapsed: Duration,
    agent: AgentAction,
    logs: VecDeque<LogLine>,
    jitter: Box<dyn Jitter>,
    on_entered: Option<EnteredCallback>,
}

impl BootSequence {
    /// 创建处于 standby 的状态机
    ///
    /// # 参数
    /// - `first_name` - 欢迎语中显示的名字
    /// - `jitter` - 日志行间隔来源（桌面端用 `RandomJitter`，测试用 `FixedJitter`）
    pub fn new(first_name: &str, jitter: impl Jitter + 'static) -> Self {
        Self {
            greeting: welcome_message(first_name),
            phase: Phase::Standby,
            elapsed: Duration::ZERO,
            agent: AgentAction::Idle,
            logs: VecDeque::with_capacity(LOG_WINDOW),
            jitter: Box::new(jitter),
            on_entered: None,
        }
    }

    /// 注册进入主界面的回调
    ///
    /// 回调在进入 ready 时调用一次；注册时已经是 ready 则立即调用。
    pub fn on_entered(&mut self, callback: impl FnOnce() + Send + 'static) {
        if matches!(self.phase, Phase::Ready) {
            callback();
        } else {
            self.on_entered = Some(Box::new(callback));
        }
    }

    /// 触发开机（点击电源键或显示器）
    ///
    /// # 返回值
    /// 只有在 standby 且尚未触发时才开始序列并返回事件；其他情况为空操作
    pub fn power_on(&mut self) -> Vec<BootEvent> {
        if !matches!(self.phase, Phase::Standby) {
            log::debug!("开机序列已触发，忽略重复的开机请求");
            return Vec::new();
        }

        self.phase = Phase::Pressing {
            welcome_at: self.elapsed + PRESS_DURATION,
        };
        self.agent = AgentAction::Pressing;
        vec![BootEvent::AgentChanged(AgentAction::Pressing)]
    }

    /// 推进时间并处理期间到期的全部转换
    ///
    /// # 返回值
    /// 按发生顺序排列的事件
    pub fn advance(&mut self, dt: Duration) -> Vec<BootEvent> {
        self.elapsed += dt;
        let now = self.elapsed;
        let mut events = Vec::new();

        loop {
            match &mut self.phase {
                Phase::Pressing { welcome_at } if now >= *welcome_at => {
                    let since = *welcome_at;
                    self.phase = Phase::Welcome {
                        since,
                        booting_at: since + WELCOME_DURATION,
                    };
                    self.agent = AgentAction::Typing;
                    events.push(BootEvent::StateChanged(BootState::Welcome));
                    events.push(BootEvent::AgentChanged(AgentAction::Typing));
                }
                Phase::Welcome { booting_at, .. } if now >= *booting_at => {
                    let start = *booting_at;
                    self.phase = self.schedule_script(start);
                    events.push(BootEvent::StateChanged(BootState::Booting));
                }
                Phase::Booting { pending, ready_at } => {
                    while let Some(&(due, text)) = pending.front() {
                        if due > now {
                            break;
                        }
                        pending.pop_front();
                        let line = LogLine::new(text);
                        if self.logs.len() == LOG_WINDOW {
                            self.logs.pop_front();
                        }
                        self.logs.push_back(line.clone());
                        events.push(BootEvent::LogAppended(line));
                    }
                    if !pending.is_empty() || now < *ready_at {
                        break;
                    }
                    self.enter_ready(&mut events);
                }
                _ => break,
            }
        }

        events
    }

    /// 以 `start` 为起点排好全部日志行
    fn schedule_script(&mut self, start: Duration) -> Phase {
        let mut due = start;
        let pending: VecDeque<(Duration, &'static str)> = BOOT_SCRIPT
            .iter()
            .map(|&text| {
                due += self.jitter.next_delay();
                (due, text)
            })
            .collect();
        Phase::Booting {
            pending,
            ready_at: due + SETTLE_DURATION,
        }
    }

    fn enter_ready(&mut self, events: &mut Vec<BootEvent>) {
        self.phase = Phase::Ready;
        events.push(BootEvent::StateChanged(BootState::Ready));

        if let Some(callback) = self.on_entered.take() {
            callback();
        }
        events.push(BootEvent::Entered);

        self.agent = AgentAction::Idle;
        events.push(BootEvent::AgentChanged(AgentAction::Idle));
        log::info!("开机序列完成，用时 {} ms", self.elapsed.as_millis());
    }

    pub fn state(&self) -> BootState {
        match self.phase {
            Phase::Standby | Phase::Pressing { .. } => BootState::Standby,
            Phase::Welcome { .. } => BootState::Welcome,
            Phase::Booting { .. } => BootState::Booting,
            Phase::Ready => BootState::Ready,
        }
    }

    pub fn agent(&self) -> AgentAction {
        self.agent
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 当前已显示的欢迎语：进入 welcome 后每 50ms 多显示一个字符
    pub fn greeting_text(&self) -> &str {
        let Phase::Welcome { since, .. } = self.phase else {
            return "";
        };
        let shown = ((self.elapsed - since).as_millis() / REVEAL_INTERVAL.as_millis()) as usize;
        match self.greeting.char_indices().nth(shown) {
            Some((end, _)) => &self.greeting[..end],
            None => &self.greeting,
        }
    }

    /// 屏幕上的日志行（最多 `LOG_WINDOW` 行，旧行在前）
    pub fn logs(&self) -> impl Iterator<Item = &LogLine> {
        self.logs.iter()
    }

    pub fn snapshot(&self) -> BootSnapshot {
        BootSnapshot {
            state: self.state(),
            agent: self.agent,
            greeting: self.greeting_text().to_string(),
            logs: self.logs.iter().cloned().collect(),
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// 把时钟读数转换为 `advance` 的步长
pub struct BootDriver<C: Clock> {
    clock: C,
    last: Duration,
}

impl<C: Clock> BootDriver<C> {
    pub fn new(clock: C) -> Self {
        let last = clock.now();
        Self { clock, last }
    }

    /// 距上次调用经过的时间
    pub fn delta(&mut self) -> Duration {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last);
        self.last = now;
        dt
    }

    /// 按时钟推进状态机
    pub fn tick(&mut self, boot: &mut BootSequence) -> Vec<BootEvent> {
        let dt = self.delta();
        boot.advance(dt)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
