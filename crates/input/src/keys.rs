use glam::{IVec3, Vec3};

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A keyboard transition carrying a normalized (lowercase) key identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn down(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            state: KeyState::Pressed,
        }
    }

    pub fn up(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            state: KeyState::Released,
        }
    }

    /// Map a winit physical key transition. Keys that are not movement keys
    /// yield `None`.
    #[cfg(feature = "winit")]
    pub fn from_winit(
        key: winit::keyboard::PhysicalKey,
        state: winit::event::ElementState,
    ) -> Option<Self> {
        use winit::keyboard::{KeyCode, PhysicalKey};

        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let name = match code {
            KeyCode::KeyW => "w",
            KeyCode::KeyA => "a",
            KeyCode::KeyS => "s",
            KeyCode::KeyD => "d",
            _ => return None,
        };
        Some(match state {
            winit::event::ElementState::Pressed => Self::down(name),
            winit::event::ElementState::Released => Self::up(name),
        })
    }
}

/// The four movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Forward,
    Left,
    Back,
    Right,
}

impl LogicalKey {
    /// Map a key identifier (any case) to a movement key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(Self::Forward),
            "a" => Some(Self::Left),
            "s" => Some(Self::Back),
            "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Held-key direction accumulator.
///
/// Each axis holds -1, 0 or +1. Pressing a key overwrites its axis; releasing
/// a key zeroes its axis even if the opposite key is still held. The y axis
/// is always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveDirection(IVec3);

impl MoveDirection {
    pub const NONE: Self = Self(IVec3::ZERO);

    pub fn press(&mut self, key: LogicalKey) {
        match key {
            LogicalKey::Forward => self.0.z = 1,
            LogicalKey::Back => self.0.z = -1,
            LogicalKey::Left => self.0.x = -1,
            LogicalKey::Right => self.0.x = 1,
        }
    }

    pub fn release(&mut self, key: LogicalKey) {
        match key {
            LogicalKey::Forward | LogicalKey::Back => self.0.z = 0,
            LogicalKey::Left | LogicalKey::Right => self.0.x = 0,
        }
    }

    /// Apply a raw key event. Returns false when the key is not a movement key.
    pub fn apply(&mut self, event: &KeyEvent) -> bool {
        let Some(key) = LogicalKey::from_key(&event.key) else {
            return false;
        };
        match event.state {
            KeyState::Pressed => self.press(key),
            KeyState::Released => self.release(key),
        }
        true
    }

    pub fn axes(&self) -> IVec3 {
        self.0
    }

    /// Unnormalized direction; diagonals have length √2.
    pub fn as_vec3(&self) -> Vec3 {
        self.0.as_vec3()
    }
}
