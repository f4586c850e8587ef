use crate::entity::Entity;
use crate::world::World;
use glam::{EulerRot, Quat, Vec3};
use wayfarer_common::CameraConfig;

/// Follow camera: a yaw/tilt rig whose anchor is smoothed toward the player.
///
/// The camera sits at a fixed offset in rig space and always looks at the
/// anchor, so moving the anchor translates the camera without turning it.
/// Smoothing is applied once per call, not scaled by frame time.
#[derive(Debug, Clone)]
pub struct CameraRig {
    tracked: Vec3,
    smoothing: f32,
    offset: Vec3,
    yaw: f32,
    tilt: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            tracked: Vec3::ZERO,
            smoothing: config.smoothing,
            offset: Vec3::from_array(config.offset),
            yaw: 0.0,
            tilt: 0.0,
        }
    }

    pub fn with_position(mut self, tracked: Vec3) -> Self {
        self.tracked = tracked;
        self
    }

    /// Blend the anchor toward `target` by the smoothing factor.
    pub fn update_camera(&mut self, target: Vec3) -> Vec3 {
        self.tracked = self.tracked.lerp(target, self.smoothing);
        tracing::trace!(tracked = %self.tracked, %target, "camera follow");
        self.tracked
    }

    /// Follow the world's player. Call after [`World::update`].
    pub fn follow(&mut self, world: &World) -> Vec3 {
        self.update_camera(world.player().position())
    }

    /// The smoothed anchor the camera orbits and looks at.
    pub fn tracked_position(&self) -> Vec3 {
        self.tracked
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Turn the rig around its anchor. Nothing in the per-tick loop calls
    /// this; it is the hook for the host engine's view controls (mouse
    /// drag, touch orbit). Tilt is clamped short of straight up or down.
    pub fn rotate(&mut self, yaw: f32, tilt: f32) {
        let limit = 89.0_f32.to_radians();
        self.yaw += yaw;
        self.tilt = (self.tilt + tilt).clamp(-limit, limit);
    }

    /// Rig rotation from yaw, then tilt.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.tilt, 0.0)
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        self.tracked + self.orientation() * self.offset
    }

    /// The point the camera looks at.
    pub fn target(&self) -> Vec3 {
        self.tracked
    }

    pub fn look_direction(&self) -> Vec3 {
        (self.target() - self.eye()).normalize_or_zero()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
