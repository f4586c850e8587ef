//! VR thumbstick locomotion.
//!
//! The left stick slides the XR camera across the floor relative to where it
//! faces. The right stick snap-turns it; a latch per right-hand controller
//! makes one physical flick fire exactly one turn.

use crate::action::Action;
use crate::events::{EventSource, Subscription};
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wayfarer_common::{ControllerConfig, Transform};

/// Component id of the standard thumbstick on an XR controller.
pub const THUMBSTICK: &str = "xr-standard-thumbstick";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    /// The runtime reported no hand for this controller.
    Unknown,
}

/// One axis sample from a controller component, each axis in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisEvent {
    pub controller: ControllerId,
    pub hand: Handedness,
    pub component: String,
    pub x: f32,
    pub y: f32,
}

impl AxisEvent {
    pub fn thumbstick(controller: ControllerId, hand: Handedness, x: f32, y: f32) -> Self {
        Self {
            controller,
            hand,
            component: THUMBSTICK.to_string(),
            x,
            y,
        }
    }
}

/// Snap-turn debounce latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapTurnLatch {
    /// Stick inside the threshold; the next deflection fires.
    #[default]
    Armed,
    /// A turn fired and the stick has not come back yet.
    Disarmed,
}

impl SnapTurnLatch {
    /// Feed one x sample. Returns the turn direction (+1 or -1) when a turn fires.
    pub fn sample(&mut self, x: f32, threshold: f32) -> Option<f32> {
        let deflection = x.abs();
        match self {
            Self::Armed if deflection > threshold => {
                *self = Self::Disarmed;
                Some(if x > 0.0 { 1.0 } else { -1.0 })
            }
            _ if deflection < threshold => {
                *self = Self::Armed;
                None
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed)
    }
}

/// Maps thumbstick samples to camera actions.
#[derive(Debug, Clone)]
pub struct ControllerLocomotion {
    config: ControllerConfig,
    latches: HashMap<ControllerId, SnapTurnLatch>,
}

impl ControllerLocomotion {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            latches: HashMap::new(),
        }
    }

    pub fn latch(&self, controller: ControllerId) -> SnapTurnLatch {
        self.latches.get(&controller).copied().unwrap_or_default()
    }

    /// Compute the action for one sample given the camera's current orientation.
    pub fn handle_axis(&mut self, event: &AxisEvent, camera_rotation: Quat) -> Action {
        if event.component != THUMBSTICK {
            return Action::Noop;
        }
        if !(event.x.is_finite() && event.y.is_finite()) {
            tracing::warn!(?event, "ignoring non-finite axis sample");
            return Action::Noop;
        }

        match event.hand {
            Handedness::Left => Action::Move(self.camera_relative_move(event, camera_rotation)),
            Handedness::Right => {
                let threshold = self.config.deflection_threshold;
                let latch = self.latches.entry(event.controller).or_default();
                match latch.sample(event.x, threshold) {
                    Some(sign) => {
                        let angle = sign * self.config.snap_angle;
                        tracing::debug!(controller = event.controller.0, angle, "snap turn");
                        Action::SnapTurn(angle)
                    }
                    None => Action::Noop,
                }
            }
            Handedness::Unknown => Action::Noop,
        }
    }

    /// Compute and immediately apply the action to the camera.
    pub fn apply_axis(&mut self, event: &AxisEvent, camera: &mut Transform) -> Action {
        let action = self.handle_axis(event, camera.rotation);
        action.apply(camera);
        action
    }

    /// Drive `camera` from every event on `axes` for as long as the returned
    /// subscription lives.
    pub fn bind(
        mut self,
        axes: &EventSource<AxisEvent>,
        camera: Rc<RefCell<Transform>>,
    ) -> Subscription {
        axes.subscribe(move |event| match camera.try_borrow_mut() {
            Ok(mut camera) => {
                self.apply_axis(event, &mut camera);
            }
            Err(_) => tracing::warn!(?event, "camera busy; axis sample not applied"),
        })
    }

    fn camera_relative_move(&self, event: &AxisEvent, camera_rotation: Quat) -> Vec3 {
        let speed = self.config.move_speed;
        let local = Vec3::new(event.x * speed, 0.0, -event.y * speed);
        let yaw = Transform {
            rotation: camera_rotation,
            ..Transform::default()
        }
        .yaw();
        let mut world = Quat::from_rotation_y(yaw) * local;
        world.y = 0.0;
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

    const RIGHT: ControllerId = ControllerId(2);

    fn right(x: f32) -> AxisEvent {
        AxisEvent::thumbstick(RIGHT, Handedness::Right, x, 0.0)
    }

    fn turns(loco: &mut ControllerLocomotion, samples: &[f32]) -> Vec<f32> {
        samples
            .iter()
            .filter_map(|x| match loco.handle_axis(&right(*x), Quat::IDENTITY) {
                Action::SnapTurn(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn held_deflection_fires_once() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let fired = turns(&mut loco, &[0.9; 50]);
        assert_eq!(fired, vec![FRAC_PI_8]);
        assert_eq!(loco.latch(RIGHT), SnapTurnLatch::Disarmed);
    }

    #[test]
    fn second_turn_needs_return_below_threshold() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let fired = turns(&mut loco, &[0.9, 0.85, 0.8, 0.9, 0.5, 0.95]);
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn exactly_threshold_neither_fires_nor_rearms() {
        let mut latch = SnapTurnLatch::Armed;
        assert_eq!(latch.sample(0.8, 0.8), None);
        assert!(latch.is_armed());

        latch = SnapTurnLatch::Disarmed;
        assert_eq!(latch.sample(-0.8, 0.8), None);
        assert!(!latch.is_armed());
    }

    #[test]
    fn negative_deflection_turns_the_other_way() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        assert_eq!(turns(&mut loco, &[-0.95]), vec![-FRAC_PI_8]);
    }

    #[test]
    fn latches_are_per_controller() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let other = ControllerId(9);
        loco.handle_axis(&right(0.9), Quat::IDENTITY);
        let action = loco.handle_axis(
            &AxisEvent::thumbstick(other, Handedness::Right, 0.9, 0.0),
            Quat::IDENTITY,
        );
        assert_eq!(action, Action::SnapTurn(FRAC_PI_8));
    }

    #[test]
    fn left_stick_moves_relative_to_camera_yaw() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let push = AxisEvent::thumbstick(ControllerId(1), Handedness::Left, 0.0, -1.0);

        let Action::Move(ahead) = loco.handle_axis(&push, Quat::IDENTITY) else {
            panic!("expected a move");
        };
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, 0.1), 1e-6));

        let turned = Quat::from_rotation_y(FRAC_PI_2);
        let Action::Move(sideways) = loco.handle_axis(&push, turned) else {
            panic!("expected a move");
        };
        assert!(sideways.abs_diff_eq(Vec3::new(0.1, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn left_stick_move_stays_on_the_floor() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let mut cam = Transform {
            rotation: Quat::from_euler(glam::EulerRot::YXZ, 0.3, -0.7, 0.0),
            ..Transform::default()
        };
        loco.apply_axis(
            &AxisEvent::thumbstick(ControllerId(1), Handedness::Left, 0.4, 0.6),
            &mut cam,
        );
        assert_eq!(cam.position.y, 0.0);
        assert!(cam.position.length() > 0.0);
    }

    #[test]
    fn other_components_and_unhanded_controllers_are_ignored() {
        let mut loco = ControllerLocomotion::new(ControllerConfig::default());
        let mut trigger = right(1.0);
        trigger.component = "xr-standard-trigger".into();
        assert_eq!(loco.handle_axis(&trigger, Quat::IDENTITY), Action::Noop);

        let unhanded = AxisEvent::thumbstick(ControllerId(3), Handedness::Unknown, 1.0, 1.0);
        assert_eq!(loco.handle_axis(&unhanded, Quat::IDENTITY), Action::Noop);
        assert!(loco.latch(RIGHT).is_armed());
    }

    #[test]
    fn bound_locomotion_drives_shared_camera() {
        let axes = EventSource::<AxisEvent>::new();
        let camera = Rc::new(RefCell::new(Transform::default()));
        let sub = ControllerLocomotion::new(ControllerConfig::default()).bind(&axes, camera.clone());

        axes.emit(&right(0.9));
        axes.emit(&right(0.9));
        assert!((camera.borrow().yaw() - FRAC_PI_8).abs() < 1e-5);

        drop(sub);
        axes.emit(&right(0.1));
        axes.emit(&right(0.9));
        assert!((camera.borrow().yaw() - FRAC_PI_8).abs() < 1e-5);
    }
}
