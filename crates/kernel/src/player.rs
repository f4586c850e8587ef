use crate::clock::FrameTime;
use crate::entity::{Entity, EntityCore, EntityError};
use crate::render::{RenderBackend, SphereShape};
use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;
use wayfarer_common::{EntityId, PlayerConfig};
use wayfarer_input::{EventSource, KeyEvent, MoveDirection, Subscription};

/// The keyboard-driven player.
///
/// Key transitions land in a direction accumulator as soon as they are
/// emitted; `update` turns whatever is held at that moment into a
/// collision-aware move.
pub struct Player {
    core: EntityCore,
    direction: Rc<Cell<MoveDirection>>,
    _keyboard: Subscription,
}

impl Player {
    pub const ID: &'static str = "player";

    /// Diameter of the player body along each axis.
    pub const BODY: Vec3 = Vec3::new(1.0, 2.0, 1.0);

    pub fn new(
        config: &PlayerConfig,
        backend: &mut dyn RenderBackend,
        keyboard: &EventSource<KeyEvent>,
    ) -> Self {
        let mut core = EntityCore::new(
            EntityId::new(Self::ID),
            Vec3::ZERO,
            config.diameter,
            config.move_speed,
            backend,
        );
        let body = backend.create_sphere(core.id(), SphereShape::ellipsoid(Self::BODY));
        core.replace_handle(body);

        let direction = Rc::new(Cell::new(MoveDirection::NONE));
        let sink = Rc::clone(&direction);
        let subscription = keyboard.subscribe(move |event: &KeyEvent| apply_key(&sink, event));

        Self {
            core,
            direction,
            _keyboard: subscription,
        }
    }

    pub fn on_key_down(&self, key: &str) {
        apply_key(&self.direction, &KeyEvent::down(key));
    }

    pub fn on_key_up(&self, key: &str) {
        apply_key(&self.direction, &KeyEvent::up(key));
    }

    pub fn move_direction(&self) -> MoveDirection {
        self.direction.get()
    }
}

fn apply_key(direction: &Cell<MoveDirection>, event: &KeyEvent) {
    let mut held = direction.get();
    if held.apply(event) {
        direction.set(held);
    } else {
        tracing::trace!(key = %event.key, "ignored non-movement key");
    }
}

impl Entity for Player {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, frame: FrameTime) -> Result<(), EntityError> {
        self.core.sync_handle();

        let displacement =
            self.move_direction().as_vec3() * self.core.move_speed() * frame.seconds();
        if !displacement.is_finite() {
            return Err(EntityError::NonFiniteDisplacement {
                id: self.core.id().clone(),
                displacement,
            });
        }

        if displacement != Vec3::ZERO {
            let applied = self.core.handle_mut().move_with_collisions(displacement);
            tracing::trace!(requested = %displacement, %applied, "player moved");
        }
        self.core.sync_from_handle();
        Ok(())
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("core", &self.core)
            .field("direction", &self.direction.get())
            .finish_non_exhaustive()
    }
}
