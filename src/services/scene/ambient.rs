//! 环境动画：键盘按键下沉、显示器摆动、星空旋转和流星

use rand::Rng;

use crate::models::scene::{Euler, ShootingStarPose};
use crate::utils::math::{Vec3, damp};

/// 按键区静止高度
pub const KEYS_REST: f32 = 0.16;
/// 按下时的高度
pub const KEYS_PRESSED: f32 = 0.14;
/// 按下状态持续时间（秒）
pub const KEY_PRESS_DURATION: f32 = 0.1;
const KEYS_RATE: f32 = 20.0;

/// 流星第一次出现的时间（秒）
pub const FIRST_STAR_AT: f32 = 2.0;
/// 流星离开画面后的再次出现间隔（秒）
pub const STAR_RESPAWN_DELAY: f32 = 5.0;
/// 低于该高度视为离开画面
pub const STAR_FLOOR_Y: f32 = -20.0;

/// 键盘按键区
pub struct KeyboardRig {
    height: f32,
    pressed_until: f32,
}

impl KeyboardRig {
    pub fn new() -> Self {
        Self {
            height: KEYS_REST,
            pressed_until: f32::NEG_INFINITY,
        }
    }

    /// 在场景时刻 `elapsed` 按下按键
    pub fn press(&mut self, elapsed: f32) {
        self.pressed_until = elapsed + KEY_PRESS_DURATION;
    }

    pub fn update(&mut self, dt: f32, elapsed: f32) {
        let target = if elapsed < self.pressed_until {
            KEYS_PRESSED
        } else {
            KEYS_REST
        };
        self.height = damp(self.height, target, KEYS_RATE, dt);
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Default for KeyboardRig {
    fn default() -> Self {
        Self::new()
    }
}

/// 星空与流星
pub struct Sky {
    star_field: Euler,
    star: ShootingStarPose,
    speed: f32,
    next_spawn: f32,
}

impl Sky {
    pub fn new() -> Self {
        Self {
            star_field: Vec3::ZERO,
            star: ShootingStarPose {
                visible: false,
                position: Vec3::ZERO,
                direction: Vec3::ZERO,
            },
            speed: 0.0,
            next_spawn: FIRST_STAR_AT,
        }
    }

    pub fn update(&mut self, dt: f32, elapsed: f32, rng: &mut impl Rng) {
        self.star_field.y -= dt * 0.02;
        self.star_field.z += dt * 0.005;

        if !self.star.visible && elapsed > self.next_spawn {
            self.spawn(rng);
        }

        if self.star.visible {
            self.star.position = self.star.position + self.star.direction * (self.speed * dt);
            if self.star.position.y < STAR_FLOOR_Y {
                self.star.visible = false;
                self.next_spawn = elapsed + STAR_RESPAWN_DELAY;
            }
        }
    }

    /// 在天空高处随机出生，朝地平线以下随机一点飞行
    fn spawn(&mut self, rng: &mut impl Rng) {
        self.speed = rng.gen_range(40.0..60.0);
        let start = Vec3::new(
            rng.gen_range(-40.0..40.0),
            rng.gen_range(30.0..40.0),
            rng.gen_range(-60.0..-40.0),
        );
        let target = Vec3::new(
            start.x + rng.gen_range(-20.0_f32..20.0),
            STAR_FLOOR_Y,
            start.z + rng.gen_range(-10.0_f32..10.0),
        );
        self.star = ShootingStarPose {
            visible: true,
            position: start,
            direction: (target - start).normalize(),
        };
    }

    pub fn star_field(&self) -> Euler {
        self.star_field
    }

    pub fn shooting_star(&self) -> ShootingStarPose {
        self.star
    }
}

impl Default for Sky {
    fn default() -> Self {
        Self::new()
    }
}

/// 显示器的轻微左右摆动
pub fn monitor_sway(elapsed: f32) -> f32 {
    (elapsed * 0.1).sin() * 0.05
}
