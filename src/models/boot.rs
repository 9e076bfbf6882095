//! # 开机序列数据模型
//!
//! 3D 复古电脑场景的开机状态（BootState）、机器人动作（AgentAction）、
//! 屏幕日志行（LogLine）以及状态机对外发出的事件（BootEvent）。

use serde::{Deserialize, Serialize};

/// 开机状态：决定显示器上显示哪一层文字
///
/// `standby → welcome → booting → ready`，只前进不后退。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootState {
    /// "SYSTEM STANDBY / WAITING FOR INPUT"
    Standby,
    /// 欢迎语逐字显示
    Welcome,
    /// 开机日志滚动
    Booting,
    /// 开机完成，主界面已进入
    Ready,
}

/// 机器人操作员的动作标签
///
/// 与开机状态在时间上相关，但不是由开机状态推导出来的。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    #[default]
    Idle,
    /// 走向电源键并按下
    Pressing,
    /// 坐在键盘前打字
    Typing,
}

/// 日志行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// 以 `>` 开头的命令行（黄色高亮）
    Command,
    /// 普通输出行
    Output,
}

/// 显示器上的一行开机日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub kind: LogKind,
}

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if text.starts_with('>') {
            LogKind::Command
        } else {
            LogKind::Output
        };
        Self { text, kind }
    }
}

/// 状态机在一次 `advance` / `power_on` 调用中产生的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BootEvent {
    StateChanged(BootState),
    AgentChanged(AgentAction),
    LogAppended(LogLine),
    /// 进入 ready，主界面应当出现（整个生命周期只发出一次）
    Entered,
}

/// 开机序列的只读快照，供前端绘制显示器内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootSnapshot {
    pub state: BootState,
    pub agent: AgentAction,
    /// 当前已显示的欢迎语（仅 welcome 状态下非空）
    pub greeting: String,
    /// 保留在屏幕上的最近日志行
    pub logs: Vec<LogLine>,
    pub elapsed_ms: u64,
}
