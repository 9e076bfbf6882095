//! # 3D 场景每帧数据模型
//!
//! 场景的绘制在前端完成，这里只描述每帧的输入（FrameInput）和
//! 每帧更新后的姿态（SceneSnapshot），二者都通过 IPC 以 JSON 传输。

use serde::{Deserialize, Serialize};

use crate::utils::math::Vec3;

/// 归一化的指针位置：x、y 都在 [-1, 1]，右上为正
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

/// 一帧的输入
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInput {
    /// 距上一帧的秒数
    pub dt: f32,
    /// 场景时钟的累计秒数
    pub elapsed: f32,
    #[serde(default)]
    pub pointer: Pointer,
    /// 是否已进入主界面（相机飞入"虚空"）
    #[serde(default)]
    pub entered: bool,
    #[serde(default)]
    pub scroll_progress: f32,
}

/// 一帧更新的副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameOutput {
    /// 机器人本帧敲击键盘的次数（每次需要播放一个按键音）
    pub keystrokes: u32,
}

/// 相机姿态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: Vec3,
    /// 视线目标点的 z 坐标（x、y 固定为 0）
    pub look_at_z: f32,
}

/// 俯仰（x）/ 偏航（y）/ 翻滚（z）欧拉角，单位弧度
pub type Euler = Vec3;

/// 机器人操作员的骨骼姿态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPose {
    /// 根节点位置（脚底中心，y 固定在地板高度）
    pub position: Vec3,
    /// 绕 y 轴的朝向
    pub heading: f32,
    /// 头部高度（上下浮动）
    pub head_height: f32,
    pub head: Euler,
    pub torso: Euler,
    pub left_arm: Euler,
    pub right_arm: Euler,
    pub left_forearm: f32,
    pub right_forearm: f32,
    pub left_hand: f32,
    pub right_hand: f32,
    pub left_leg: f32,
    pub right_leg: f32,
    /// 眼睛纵向缩放：眨眼时趋近 0.1
    pub eye_scale: f32,
}

/// 流星状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShootingStarPose {
    pub visible: bool,
    pub position: Vec3,
    /// 单位飞行方向
    pub direction: Vec3,
}

/// 一帧更新后的完整场景姿态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub camera: CameraPose,
    pub agent: AgentPose,
    /// 键盘按键区的高度（按下时下沉）
    pub keys_height: f32,
    /// 显示器的轻微左右摆动
    pub monitor_sway: f32,
    pub star_field: Euler,
    pub shooting_star: ShootingStarPose,
    /// 漂浮的数学符号只在进入主界面后显示
    pub floating_data_visible: bool,
}
