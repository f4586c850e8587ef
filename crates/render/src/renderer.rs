use glam::Vec3;
use wayfarer_kernel::{CameraRig, World};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
}

impl RenderView {
    pub const DEFAULT_FOV: f32 = 1.1;

    pub fn from_rig(rig: &CameraRig) -> Self {
        Self {
            eye: rig.eye(),
            target: rig.target(),
            fov: Self::DEFAULT_FOV,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_rig(&CameraRig::default())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view, then produces output. It never
/// mutates the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &World, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the world, for the CLI and for tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== World (tick={}) ===\n", world.tick()));
        out.push_str(&format!("Entities: {}\n", world.entity_count()));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.2}\n",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov
        ));

        let dir = world.player().move_direction().axes();
        out.push_str(&format!("Input: x={} z={}\n", dir.x, dir.z));

        for entity in world.iter() {
            let p = entity.position();
            out.push_str(&format!("  [{}] pos=({:.2}, {:.2}, {:.2})\n", entity.id(), p.x, p.y, p.z));
        }
        out
    }
}
