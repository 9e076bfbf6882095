//! # 机器人操作员
//!
//! 根据开机序列给出的动作标签（idle / pressing / typing）逐帧更新骨骼姿态：
//! - idle：有行走目标时以 2 u/s 走过去，否则头部和躯干跟随指针
//! - pressing：走到电源键前，伸出右臂
//! - typing：坐到键盘前打字，每 50~150ms 敲击一次键盘
//!
//! 各关节使用按帧系数的平滑逼近，系数按 60fps 换算为每秒速率，不依赖实际帧率。

use std::f32::consts::PI;

use rand::Rng;

use crate::models::boot::AgentAction;
use crate::models::scene::AgentPose;
use crate::utils::math::{Vec3, damp};

/// 地板高度（机器人根节点的 y）
pub const FLOOR_Y: f32 = -1.5;
pub const START_POSITION: Vec3 = Vec3::new(-1.4, FLOOR_Y, 3.0);
pub const START_HEADING: f32 = -0.4;
pub const BUTTON_POSITION: Vec3 = Vec3::new(1.0, FLOOR_Y, 2.4);
pub const BUTTON_HEADING: f32 = -0.8;
pub const KEYBOARD_POSITION: Vec3 = Vec3::new(0.0, FLOOR_Y, 3.2);
pub const KEYBOARD_HEADING: f32 = -PI;

/// 行走速度（单位 / 秒）
pub const WALK_SPEED: f32 = 2.0;
/// 距离目标小于该值视为到达
pub const ARRIVAL_EPSILON: f32 = 0.1;
/// 眨眼持续时间（秒）
pub const BLINK_DURATION: f32 = 0.15;

const REFERENCE_FPS: f32 = 60.0;

/// 按帧系数的平滑逼近
fn follow(current: f32, target: f32, factor: f32, dt: f32) -> f32 {
    damp(current, target, factor * REFERENCE_FPS, dt)
}

pub struct AgentRig {
    pose: AgentPose,
    walk_target: Option<Vec3>,
    next_blink: f32,
    blink_until: Option<f32>,
    next_keystroke: f32,
}

impl AgentRig {
    pub fn new() -> Self {
        Self {
            pose: AgentPose {
                position: START_POSITION,
                heading: START_HEADING,
                head_height: 1.2,
                head: Vec3::ZERO,
                torso: Vec3::ZERO,
                left_arm: Vec3::ZERO,
                right_arm: Vec3::ZERO,
                left_forearm: 0.0,
                right_forearm: 0.0,
                left_hand: 0.0,
                right_hand: 0.0,
                left_leg: 0.0,
                right_leg: 0.0,
                eye_scale: 1.0,
            },
            walk_target: None,
            next_blink: 0.0,
            blink_until: None,
            next_keystroke: 0.0,
        }
    }

    pub fn pose(&self) -> AgentPose {
        self.pose
    }

    pub fn walk_target(&self) -> Option<Vec3> {
        self.walk_target
    }

    /// 设置地板上的行走目标；y 固定为地板高度
    pub fn set_walk_target(&mut self, point: Vec3) {
        self.walk_target = Some(Vec3::new(point.x, FLOOR_Y, point.z));
    }

    /// 更新一帧
    ///
    /// # 参数
    /// - `dt` - 帧间隔（秒）
    /// - `t` - 场景累计时间（秒）
    /// - `pointer` - 归一化指针位置
    /// - `action` - 当前动作标签
    ///
    /// # 返回值
    /// 本帧的键盘敲击次数
    pub fn update(
        &mut self,
        dt: f32,
        t: f32,
        pointer: (f32, f32),
        action: AgentAction,
        rng: &mut impl Rng,
    ) -> u32 {
        self.update_blink(dt, t, rng);
        self.pose.head_height = 1.2 + (t * 1.5).sin() * 0.02;

        match action {
            AgentAction::Idle => {
                self.update_idle(dt, t, pointer);
                0
            }
            AgentAction::Pressing => {
                self.update_pressing(dt);
                0
            }
            AgentAction::Typing => self.update_typing(dt, t, rng),
        }
    }

    fn update_blink(&mut self, dt: f32, t: f32, rng: &mut impl Rng) {
        match self.blink_until {
            Some(until) if t >= until => {
                self.blink_until = None;
                let started = until - BLINK_DURATION;
                self.next_blink = started + rng.gen_range(2.0_f32..6.0);
            }
            None if t > self.next_blink => {
                self.blink_until = Some(t + BLINK_DURATION);
            }
            _ => {}
        }

        let target = if self.blink_until.is_some() { 0.1 } else { 1.0 };
        self.pose.eye_scale = follow(self.pose.eye_scale, target, 0.4, dt);
    }

    fn update_idle(&mut self, dt: f32, t: f32, (mouse_x, mouse_y): (f32, f32)) {
        let pose = &mut self.pose;

        let walking = self
            .walk_target
            .filter(|target| pose.position.distance(*target) > ARRIVAL_EPSILON);

        if let Some(target) = walking {
            let offset = target - pose.position;
            let distance = offset.length();
            let step = (WALK_SPEED * dt).min(distance);
            pose.position = pose.position + offset.normalize() * step;
            pose.heading = offset.x.atan2(offset.z);

            let cycle = t * 15.0;
            pose.left_leg = cycle.sin() * 0.5;
            pose.right_leg = cycle.cos() * 0.5;
            pose.left_arm.x = cycle.cos() * 0.3;
            pose.right_arm.x = cycle.sin() * 0.3;
            pose.torso = Vec3::ZERO;
            pose.head = Vec3::ZERO;
            return;
        }

        pose.left_leg = (t * 0.8).sin() * 0.05;
        pose.right_leg = (t * 0.8).cos() * 0.05;

        // 头和躯干朝指针的反方向转动
        pose.torso.z = follow(pose.torso.z, -mouse_x * 0.1, 0.05, dt);
        pose.torso.x = follow(pose.torso.x, mouse_y * 0.1, 0.05, dt);
        pose.head.y = follow(pose.head.y, -mouse_x * 0.8, 0.1, dt);
        pose.head.x = follow(pose.head.x, mouse_y * 0.5, 0.1, dt);

        pose.left_arm.x = follow(pose.left_arm.x, -0.5 + (t * 0.5).sin() * 0.05, 0.1, dt);
        pose.right_arm.x = follow(pose.right_arm.x, -0.5 + (t * 0.5).cos() * 0.05, 0.1, dt);
        pose.right_arm.y = follow(pose.right_arm.y, 0.0, 0.1, dt);
        pose.right_arm.z = follow(pose.right_arm.z, 0.0, 0.1, dt);
    }

    fn update_pressing(&mut self, dt: f32) {
        let pose = &mut self.pose;
        let t = (0.05 * REFERENCE_FPS * dt).clamp(0.0, 1.0);
        pose.position = pose.position.lerp(BUTTON_POSITION, t);
        pose.heading = follow(pose.heading, BUTTON_HEADING, 0.05, dt);

        pose.torso.x = follow(pose.torso.x, 0.4, 0.05, dt);
        pose.torso.z = follow(pose.torso.z, -0.3, 0.05, dt);
        pose.head.y = follow(pose.head.y, -0.5, 0.1, dt);
        pose.head.x = follow(pose.head.x, 0.5, 0.1, dt);

        pose.right_arm.x = follow(pose.right_arm.x, -1.1, 0.05, dt);
        pose.right_arm.y = follow(pose.right_arm.y, 0.6, 0.05, dt);
        pose.right_arm.z = follow(pose.right_arm.z, 0.3, 0.05, dt);
        pose.right_forearm = follow(pose.right_forearm, -0.1, 0.05, dt);
        pose.right_hand = follow(pose.right_hand, 0.8, 0.1, dt);
        pose.left_arm.x = follow(pose.left_arm.x, -0.2, 0.05, dt);
    }

    fn update_typing(&mut self, dt: f32, t: f32, rng: &mut impl Rng) -> u32 {
        let mut keystrokes = 0;
        if t > self.next_keystroke {
            keystrokes = 1;
            self.next_keystroke = t + rng.gen_range(0.05_f32..0.15);
        }

        let pose = &mut self.pose;
        let factor = (0.05 * REFERENCE_FPS * dt).clamp(0.0, 1.0);
        pose.position = pose.position.lerp(KEYBOARD_POSITION, factor);
        pose.heading = follow(pose.heading, KEYBOARD_HEADING, 0.05, dt);

        let scan = (t * 3.0).sin() * 0.25;
        pose.head.y = follow(pose.head.y, scan, 0.1, dt);
        let look = if (t * 0.5).sin() > 0.5 { 0.3 } else { -0.15 };
        pose.head.x = follow(pose.head.x, look, 0.1, dt);

        pose.torso.x = follow(pose.torso.x, 0.3, 0.05, dt);
        pose.torso.z = follow(pose.torso.z, 0.0, 0.05, dt);

        let speed = 25.0;
        let chaos_l = (t * speed).sin() * 0.1 + (t * speed * 1.5).cos() * 0.05;
        let chaos_r = (t * speed).cos() * 0.1 + (t * speed * 0.8).sin() * 0.05;

        pose.left_arm.x = follow(pose.left_arm.x, -0.9 + chaos_l * 0.5, 0.2, dt);
        pose.left_arm.y = follow(pose.left_arm.y, -0.3 + chaos_l * 0.5, 0.2, dt);
        pose.left_forearm = follow(pose.left_forearm, -0.5, 0.1, dt);
        pose.left_hand = 0.5 + chaos_l * 2.0;

        pose.right_arm.x = follow(pose.right_arm.x, -0.9 + chaos_r * 0.5, 0.2, dt);
        pose.right_arm.y = follow(pose.right_arm.y, 0.3 + chaos_r * 0.5, 0.2, dt);
        pose.right_arm.z = follow(pose.right_arm.z, 0.0, 0.1, dt);
        pose.right_forearm = follow(pose.right_forearm, -0.5, 0.1, dt);
        pose.right_hand = 0.5 + chaos_r * 2.0;

        keystrokes
    }
}

impl Default for AgentRig {
    fn default() -> Self {
        Self::new()
    }
}
