//! Scripted input for headless runs.
//!
//! `--key 0:down:w` presses W before tick 0; `--axis 12:left:0.0:-1.0`
//! pushes the left thumbstick forward before tick 12; `--prop 4:0:-2`
//! places an unnamed prop at (4, 0, -2).

use glam::Vec3;
use std::str::FromStr;
use wayfarer_input::{AxisEvent, ControllerId, Handedness, KeyEvent};

const LEFT_CONTROLLER: ControllerId = ControllerId(0);
const RIGHT_CONTROLLER: ControllerId = ControllerId(1);

#[derive(Debug, Clone, PartialEq)]
pub struct KeyScript {
    pub tick: u64,
    pub event: KeyEvent,
}

impl FromStr for KeyScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [tick, state, key] = parts.as_slice() else {
            return Err(format!("expected TICK:down|up:KEY, got {s:?}"));
        };
        let tick = parse_tick(tick)?;
        let event = match *state {
            "down" => KeyEvent::down(key),
            "up" => KeyEvent::up(key),
            other => return Err(format!("key state must be down or up, got {other:?}")),
        };
        Ok(Self { tick, event })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisScript {
    pub tick: u64,
    pub event: AxisEvent,
}

impl FromStr for AxisScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [tick, hand, x, y] = parts.as_slice() else {
            return Err(format!("expected TICK:left|right:X:Y, got {s:?}"));
        };
        let tick = parse_tick(tick)?;
        let (controller, hand) = match *hand {
            "left" => (LEFT_CONTROLLER, Handedness::Left),
            "right" => (RIGHT_CONTROLLER, Handedness::Right),
            other => return Err(format!("hand must be left or right, got {other:?}")),
        };
        let x = parse_axis(x)?;
        let y = parse_axis(y)?;
        Ok(Self {
            tick,
            event: AxisEvent::thumbstick(controller, hand, x, y),
        })
    }
}

/// Position of an extra prop, as X:Y:Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropScript {
    pub position: Vec3,
}

impl FromStr for PropScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(format!("expected X:Y:Z, got {s:?}"));
        };
        let coord = |c: &str| -> Result<f32, String> {
            let v: f32 = c.parse().map_err(|e| format!("bad coordinate {c:?}: {e}"))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("coordinate {c:?} is not finite"))
            }
        };
        Ok(Self {
            position: Vec3::new(coord(x)?, coord(y)?, coord(z)?),
        })
    }
}

fn parse_tick(s: &str) -> Result<u64, String> {
    s.parse().map_err(|e| format!("bad tick {s:?}: {e}"))
}

fn parse_axis(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("bad axis value {s:?}: {e}"))?;
    if (-1.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("axis value {v} is outside [-1, 1]"))
    }
}
