//! # 3D 场景逐帧更新
//!
//! 前端每帧调用一次 `SceneState::update`，传入帧间隔、场景时钟和指针位置，
//! 再用 `snapshot` 取回相机、机器人、键盘和天空的姿态进行绘制。
//! 除了注入的随机数源之外没有任何隐藏状态，同样的种子和输入得到同样的结果。

pub mod agent;
pub mod ambient;
pub mod camera;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::models::boot::AgentAction;
use crate::models::scene::{FrameInput, FrameOutput, SceneSnapshot};
use crate::utils::math::Vec3;
use agent::AgentRig;
use ambient::{KeyboardRig, Sky};
use camera::CameraRig;

pub struct SceneState {
    camera: CameraRig,
    agent: AgentRig,
    keyboard: KeyboardRig,
    sky: Sky,
    rng: StdRng,
    elapsed: f32,
    entered: bool,
}

impl SceneState {
    /// 以固定种子创建场景
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// 以系统熵创建场景
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            camera: CameraRig::new(),
            agent: AgentRig::new(),
            keyboard: KeyboardRig::new(),
            sky: Sky::new(),
            rng,
            elapsed: 0.0,
            entered: false,
        }
    }

    /// 更新一帧
    ///
    /// # 参数
    /// - `input` - 帧输入（dt 为负数时按 0 处理）
    /// - `action` - 开机序列给出的机器人动作
    ///
    /// # 返回值
    /// 本帧的副作用（需要播放的按键音次数）
    pub fn update(&mut self, input: &FrameInput, action: AgentAction) -> FrameOutput {
        let dt = input.dt.max(0.0);
        let t = input.elapsed;
        self.elapsed = t;
        self.entered = input.entered;

        self.camera.update(dt, input.entered, input.scroll_progress);
        let keystrokes = self.agent.update(
            dt,
            t,
            (input.pointer.x, input.pointer.y),
            action,
            &mut self.rng,
        );
        self.keyboard.update(dt, t);
        self.sky.update(dt, t, &mut self.rng);

        FrameOutput { keystrokes }
    }

    /// 点击地板设置行走目标
    ///
    /// # 返回值
    /// 只有机器人处于 idle 时才接受
    pub fn set_walk_target(&mut self, point: Vec3, action: AgentAction) -> bool {
        if action != AgentAction::Idle {
            return false;
        }
        self.agent.set_walk_target(point);
        true
    }

    /// 用户按下键盘：按键区下沉 100ms
    pub fn press_key(&mut self) {
        self.keyboard.press(self.elapsed);
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            camera: self.camera.pose(),
            agent: self.agent.pose(),
            keys_height: self.keyboard.height(),
            monitor_sway: ambient::monitor_sway(self.elapsed),
            star_field: self.sky.star_field(),
            shooting_star: self.sky.shooting_star(),
            floating_data_visible: self.entered,
        }
    }
}
