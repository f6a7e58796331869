//=========================================================================
// Camera Rig
//=========================================================================
//
// Third-person follow camera built from three nested frames.
//
// Architecture:
// ```text
//   root   (position follows the player, yaw turns at corners)
//     └─ tilt   (x rotation looks down at the player)
//          └─ camera (fixed local offset behind the tilt frame)
// ```
//
// The rig only moves through `apply_triggers`, `follow` and
// `set_win_pose`; the renderer reads the resulting `CameraPose`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{EulerRot, Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::input::InputFrame;
use super::triggers::{TriggerKind, TriggerReport};

//=== Constants ===========================================================

/// Tilt used over the festival so the player stays in view.
pub const DOWN_TILT: Vec3 = Vec3::new(0.829_031_4, 0.0, 0.0);

/// Default tilt behind the player.
pub const DEFAULT_TILT: Vec3 = Vec3::new(0.593_411_96, 0.0, 0.0);

/// Per-tick blend factor for every camera lerp.
const CAMERA_LERP: f32 = 0.4;

/// Root sits this far above the player's feet.
const ROOT_HEIGHT: f32 = 2.0;

const CAMERA_LOCAL: Vec3 = Vec3::new(0.0, 0.0, -30.0);

const WIN_TILT: Vec3 = Vec3::new(5.689_773_4, 0.237_364_78, 0.0);
const WIN_TILT_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 0.0);
const WIN_CAMERA_HEIGHT: f32 = 17.0;

//=== CameraPose ==========================================================

/// Snapshot of the rig's frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub root: Vec3,
    /// Root rotation around y.
    pub yaw: f32,
    /// Tilt frame rotation as Euler angles (x, y, z).
    pub tilt: Vec3,
    pub tilt_offset: Vec3,
    pub camera_local: Vec3,
}

impl CameraPose {
    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let root = Quat::from_rotation_y(self.yaw);
        let tilt = Quat::from_euler(EulerRot::YXZ, self.tilt.y, self.tilt.x, self.tilt.z);
        self.root + root * (self.tilt_offset + tilt * self.camera_local)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            root: Vec3::ZERO,
            yaw: PI,
            tilt: DEFAULT_TILT,
            tilt_offset: Vec3::ZERO,
            camera_local: CAMERA_LOCAL,
        }
    }
}

//=== CameraRig ===========================================================

#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    pose: CameraPose,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn yaw(&self) -> f32 {
        self.pose.yaw
    }

    /// Horizontal forward direction of the root frame.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.pose.yaw.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Horizontal right direction of the root frame.
    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.pose.yaw.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    //--- apply_triggers() -------------------------------------------------
    //
    // Camera volumes steer the rig while the body overlaps them:
    // corner      right → yaw π/2, left → yaw π
    // festival    forward → DOWN_TILT, back → DEFAULT_TILT
    // destination forward → DEFAULT_TILT, back → DOWN_TILT
    //
    pub fn apply_triggers(&mut self, report: &TriggerReport, input: &InputFrame) {
        if report.is_inside(TriggerKind::Corner) {
            let target = match input.horizontal_axis {
                1 => Some(FRAC_PI_2),
                -1 => Some(PI),
                _ => None,
            };
            if let Some(yaw) = target {
                self.pose.yaw += (yaw - self.pose.yaw) * CAMERA_LERP;
            }
        }

        if report.is_inside(TriggerKind::FestivalArea) {
            self.tilt_toward(input.vertical_axis, DOWN_TILT, DEFAULT_TILT);
        }
        if report.is_inside(TriggerKind::DestinationArea) {
            self.tilt_toward(input.vertical_axis, DEFAULT_TILT, DOWN_TILT);
        }
    }

    fn tilt_toward(&mut self, vertical_axis: i8, forward: Vec3, back: Vec3) {
        let target = match vertical_axis {
            1 => forward,
            -1 => back,
            _ => return,
        };
        self.pose.tilt = self.pose.tilt.lerp(target, CAMERA_LERP);
    }

    /// Eases the root toward a point above the player's feet.
    pub fn follow(&mut self, player_position: Vec3) {
        let target = player_position + Vec3::Y * ROOT_HEIGHT;
        self.pose.root = self.pose.root.lerp(target, CAMERA_LERP);
    }

    /// Fixed overview used once the destination is reached.
    pub fn set_win_pose(&mut self) {
        self.pose.tilt = WIN_TILT;
        self.pose.tilt_offset = WIN_TILT_OFFSET;
        self.pose.camera_local.y = WIN_CAMERA_HEIGHT;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(kind: TriggerKind) -> TriggerReport {
        TriggerReport {
            entered: Vec::new(),
            overlapping: vec![kind],
        }
    }

    fn input(h: i8, v: i8) -> InputFrame {
        InputFrame {
            horizontal_axis: h,
            vertical_axis: v,
            ..InputFrame::neutral()
        }
    }

    #[test]
    fn initial_rig_faces_down_negative_z() {
        let rig = CameraRig::new();
        assert!(rig.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(rig.right().abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(rig.pose().eye().z > 0.0, "Camera sits behind the root");
    }

    #[test]
    fn follow_converges_above_player() {
        let mut rig = CameraRig::new();
        let player = Vec3::new(3.0, 1.0, -4.0);

        rig.follow(player);
        assert!(rig.pose().root.abs_diff_eq(Vec3::new(1.2, 1.2, -1.6), 1e-5));

        for _ in 0..60 {
            rig.follow(player);
        }
        assert!(rig.pose().root.abs_diff_eq(Vec3::new(3.0, 3.0, -4.0), 1e-4));
    }

    #[test]
    fn corner_turns_yaw_only_while_steering() {
        let mut rig = CameraRig::new();

        rig.apply_triggers(&inside(TriggerKind::Corner), &input(0, 1));
        assert_eq!(rig.yaw(), PI);

        rig.apply_triggers(&inside(TriggerKind::Corner), &input(1, 0));
        assert!((rig.yaw() - (PI + (FRAC_PI_2 - PI) * 0.4)).abs() < 1e-6);

        rig.apply_triggers(&TriggerReport::default(), &input(1, 0));
        assert!((rig.yaw() - (PI + (FRAC_PI_2 - PI) * 0.4)).abs() < 1e-6);
    }

    #[test]
    fn festival_and_destination_tilts_are_inverse() {
        let mut rig = CameraRig::new();
        for _ in 0..40 {
            rig.apply_triggers(&inside(TriggerKind::FestivalArea), &input(0, 1));
        }
        assert!(rig.pose().tilt.abs_diff_eq(DOWN_TILT, 1e-5));

        for _ in 0..40 {
            rig.apply_triggers(&inside(TriggerKind::DestinationArea), &input(0, 1));
        }
        assert!(rig.pose().tilt.abs_diff_eq(DEFAULT_TILT, 1e-5));
    }

    #[test]
    fn win_pose_is_fixed() {
        let mut rig = CameraRig::new();
        rig.set_win_pose();

        assert_eq!(rig.pose().tilt, WIN_TILT);
        assert_eq!(rig.pose().tilt_offset, Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(rig.pose().camera_local.y, 17.0);
    }
}
