//! 相机：未进入时停在房间视角（z = 9.5，看向电脑），进入后飞入"虚空"（z = -5，看向远处）

use crate::models::scene::CameraPose;
use crate::utils::math::{Vec3, damp};

/// 房间视角的相机 z
pub const ROOM_Z: f32 = 9.5;
/// 进入主界面后的相机 z
pub const VOID_Z: f32 = -5.0;
/// 进入后视线目标的 z
pub const VOID_LOOK_Z: f32 = -100.0;
/// 每秒逼近速率
pub const CAMERA_RATE: f32 = 1.5;
/// 滚动进度对相机 z 的影响系数
pub const SCROLL_FACTOR: f32 = 0.5;

pub struct CameraRig {
    pose: CameraPose,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            pose: CameraPose {
                position: Vec3::new(0.0, 2.0, ROOM_Z),
                look_at_z: 0.0,
            },
        }
    }

    pub fn update(&mut self, dt: f32, entered: bool, scroll_progress: f32) {
        let (target_z, target_look_z) = if entered {
            (VOID_Z - scroll_progress * SCROLL_FACTOR, VOID_LOOK_Z)
        } else {
            (ROOM_Z, 0.0)
        };
        self.pose.position.z = damp(self.pose.position.z, target_z, CAMERA_RATE, dt);
        self.pose.look_at_z = damp(self.pose.look_at_z, target_look_z, CAMERA_RATE, dt);
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flies_into_void_after_entering() {
        let mut camera = CameraRig::new();
        for _ in 0..600 {
            camera.update(1.0 / 60.0, true, 0.0);
        }
        let pose = camera.pose();
        assert!((pose.position.z - VOID_Z).abs() < 0.01);
        assert!((pose.look_at_z - VOID_LOOK_Z).abs() < 0.1);
    }

    #[test]
    fn test_scroll_pushes_camera_further() {
        let mut camera = CameraRig::new();
        camera.update(10.0, true, 2.0);
        assert_eq!(camera.pose().position.z, VOID_Z - 1.0);

        // 未进入时滚动不影响相机
        let mut room = CameraRig::new();
        room.update(10.0, false, 2.0);
        assert_eq!(room.pose().position.z, ROOM_Z);
    }
}
