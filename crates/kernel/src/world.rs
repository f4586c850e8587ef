use crate::clock::FrameTime;
use crate::entity::{Entity, EntityError};
use crate::player::Player;
use crate::render::RenderBackend;
use std::collections::HashSet;
use std::fmt;
use wayfarer_common::{ConfigError, EntityId, SceneConfig};
use wayfarer_input::{EventSource, KeyEvent};

/// Errors from world construction and membership changes.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("entity {0} is already in the world")]
    DuplicateId(EntityId),
    #[error("invalid scene config: {0}")]
    Config(#[from] ConfigError),
}

/// One of the three per-tick update phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Early,
    Update,
    Late,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Early => "early_update",
            Self::Update => "update",
            Self::Late => "late_update",
        })
    }
}

/// Outcome of running one phase over every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Entities whose phase hook was invoked.
    pub ran: usize,
    /// Of those, how many returned an error.
    pub failed: usize,
}

/// The ordered set of entities updated each tick.
///
/// The player is registered first at construction and can never be removed,
/// so it always leads the update order. Other entities follow in insertion
/// order; removal keeps the order of the rest.
pub struct World {
    player: Player,
    entities: Vec<Box<dyn Entity>>,
    ids: HashSet<EntityId>,
    tick: u64,
}

impl World {
    pub fn new(player: Player) -> Self {
        let mut ids = HashSet::new();
        ids.insert(player.id().clone());
        Self {
            player,
            entities: Vec::new(),
            ids,
            tick: 0,
        }
    }

    /// Validate `config` and build a world around a freshly created player.
    pub fn build(
        config: &SceneConfig,
        backend: &mut dyn RenderBackend,
        keyboard: &EventSource<KeyEvent>,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self::new(Player::new(&config.player, backend, keyboard)))
    }

    /// The player, always first in update order.
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Ticks completed through [`World::step`].
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities, the player included.
    pub fn entity_count(&self) -> usize {
        1 + self.entities.len()
    }

    /// Whether an entity with `id` is present, the player included.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    /// Append an entity to the end of the update order.
    pub fn add(&mut self, entity: Box<dyn Entity>) -> Result<(), WorldError> {
        let id = entity.id().clone();
        if !self.ids.insert(id.clone()) {
            return Err(WorldError::DuplicateId(id));
        }
        tracing::debug!(%id, "entity added");
        self.entities.push(entity);
        Ok(())
    }

    /// Remove the entity with `id`, keeping the order of the others.
    ///
    /// Returns `None` if no such entity exists. The player cannot be removed.
    pub fn remove(&mut self, id: &EntityId) -> Option<Box<dyn Entity>> {
        if id == self.player.id() {
            tracing::warn!(%id, "refusing to remove the player");
            return None;
        }
        let index = self.entities.iter().position(|e| e.id() == id)?;
        let entity = self.entities.remove(index);
        self.ids.remove(id);
        tracing::debug!(%id, "entity removed");
        Some(entity)
    }

    /// Look up an entity by id, the player included.
    pub fn get(&self, id: &EntityId) -> Option<&dyn Entity> {
        if id == self.player.id() {
            return Some(&self.player);
        }
        self.entities.iter().find(|e| e.id() == id).map(|e| &**e)
    }

    /// Entities in update order, starting with the player.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Entity + 'static)> {
        let player: &(dyn Entity + 'static) = &self.player;
        std::iter::once(player).chain(self.entities.iter().map(|e| &**e))
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.iter().map(|e| e.id())
    }

    /// Run `early_update` on every entity in order.
    pub fn early_update(&mut self, frame: FrameTime) -> PhaseReport {
        self.run_phase(Phase::Early, frame)
    }

    /// Run `update` on every entity in order.
    pub fn update(&mut self, frame: FrameTime) -> PhaseReport {
        self.run_phase(Phase::Update, frame)
    }

    /// Run `late_update` on every entity in order.
    pub fn late_update(&mut self, frame: FrameTime) -> PhaseReport {
        self.run_phase(Phase::Late, frame)
    }

    /// Run all three phases in order and advance the tick counter.
    pub fn step(&mut self, frame: FrameTime) -> [PhaseReport; 3] {
        let reports = [
            self.early_update(frame),
            self.update(frame),
            self.late_update(frame),
        ];
        self.tick += 1;
        reports
    }

    fn run_phase(&mut self, phase: Phase, frame: FrameTime) -> PhaseReport {
        let _span = tracing::info_span!("world_phase", %phase, tick = self.tick).entered();
        let mut report = PhaseReport {
            phase,
            ran: 0,
            failed: 0,
        };
        run_entity(&mut self.player, phase, frame, &mut report);
        for entity in &mut self.entities {
            run_entity(entity.as_mut(), phase, frame, &mut report);
        }
        report
    }
}

fn run_entity(entity: &mut dyn Entity, phase: Phase, frame: FrameTime, report: &mut PhaseReport) {
    let result: Result<(), EntityError> = match phase {
        Phase::Early => entity.early_update(frame),
        Phase::Update => entity.update(frame),
        Phase::Late => entity.late_update(frame),
    };
    report.ran += 1;
    if let Err(error) = result {
        report.failed += 1;
        tracing::error!(id = %entity.id(), %phase, %error, "entity update failed");
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("entities", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityCore, Prop};
    use crate::scene::StaticScene;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(Phase, String)>>>;

    /// Records every phase call; optionally fails its update.
    struct Recorder {
        core: EntityCore,
        log: CallLog,
        fail_update: bool,
    }

    impl Recorder {
        fn boxed(name: &str, scene: &mut StaticScene, log: &CallLog) -> Box<dyn Entity> {
            Box::new(Self {
                core: EntityCore::new(name.into(), Vec3::ZERO, 1.0, 1.0, scene),
                log: log.clone(),
                fail_update: false,
            })
        }

        fn record(&self, phase: Phase) {
            self.log
                .borrow_mut()
                .push((phase, self.core.id().to_string()));
        }
    }

    impl Entity for Recorder {
        fn core(&self) -> &EntityCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.core
        }

        fn early_update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
            self.record(Phase::Early);
            Ok(())
        }

        fn update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
            self.record(Phase::Update);
            if self.fail_update {
                return Err(EntityError::Failed {
                    id: self.core.id().clone(),
                    reason: "boom".into(),
                });
            }
            self.core.sync_handle();
            Ok(())
        }

        fn late_update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
            self.record(Phase::Late);
            Ok(())
        }
    }

    fn world(scene: &mut StaticScene, keyboard: &EventSource<KeyEvent>) -> World {
        World::build(&SceneConfig::default(), scene, keyboard).unwrap()
    }

    fn names(world: &World) -> Vec<String> {
        world.ids().map(|id| id.to_string()).collect()
    }

    #[test]
    fn world_starts_with_the_player() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let w = world(&mut scene, &keyboard);
        assert_eq!(w.entity_count(), 1);
        assert_eq!(w.tick(), 0);
        assert!(w.contains(&EntityId::new(Player::ID)));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut config = SceneConfig::default();
        config.camera.smoothing = -1.0;
        let result = World::build(&config, &mut scene, &keyboard);
        assert!(matches!(result, Err(WorldError::Config(_))));
        assert_eq!(keyboard.subscriber_count(), 0);
    }

    #[test]
    fn update_runs_every_entity_once_in_insertion_order() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let log = CallLog::default();
        let mut w = world(&mut scene, &keyboard);
        for name in ["a", "b", "c"] {
            w.add(Recorder::boxed(name, &mut scene, &log)).unwrap();
        }

        let report = w.update(FrameTime::from_millis(16));
        assert_eq!(report.ran, 4);
        assert_eq!(report.failed, 0);
        let order: Vec<String> = log.borrow().iter().map(|(_, n)| n.clone()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(names(&w), vec!["player", "a", "b", "c"]);
    }

    #[test]
    fn phases_complete_for_all_entities_before_the_next() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let log = CallLog::default();
        let mut w = world(&mut scene, &keyboard);
        w.add(Recorder::boxed("a", &mut scene, &log)).unwrap();
        w.add(Recorder::boxed("b", &mut scene, &log)).unwrap();

        w.step(FrameTime::from_millis(16));
        let phases: Vec<Phase> = log.borrow().iter().map(|(p, _)| *p).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Early,
                Phase::Early,
                Phase::Update,
                Phase::Update,
                Phase::Late,
                Phase::Late
            ]
        );
        assert_eq!(w.tick(), 1);
    }

    #[test]
    fn failing_entity_does_not_stop_the_rest() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let log = CallLog::default();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Recorder {
            core: EntityCore::new("bad".into(), Vec3::ZERO, 1.0, 1.0, &mut scene),
            log: log.clone(),
            fail_update: true,
        }))
        .unwrap();
        w.add(Recorder::boxed("good", &mut scene, &log)).unwrap();

        let report = w.update(FrameTime::from_millis(16));
        assert_eq!(report.ran, 3);
        assert_eq!(report.failed, 1);
        assert!(log.borrow().iter().any(|(_, n)| n == "good"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Prop::new("rock".into(), Vec3::ZERO, &mut scene)))
            .unwrap();
        let dup = w.add(Box::new(Prop::new("rock".into(), Vec3::ONE, &mut scene)));
        assert!(matches!(dup, Err(WorldError::DuplicateId(_))));

        let clash = w.add(Box::new(Prop::new(Player::ID.into(), Vec3::ONE, &mut scene)));
        assert!(clash.is_err());
        assert_eq!(w.entity_count(), 2);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        for name in ["a", "b", "c", "d"] {
            w.add(Box::new(Prop::new(name.into(), Vec3::ZERO, &mut scene)))
                .unwrap();
        }

        let removed = w.remove(&"b".into()).unwrap();
        assert_eq!(removed.id().as_str(), "b");
        assert_eq!(names(&w), vec!["player", "a", "c", "d"]);
        assert!(!w.contains(&"b".into()));
    }

    #[test]
    fn removing_a_non_member_is_a_no_op() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Prop::new("a".into(), Vec3::ZERO, &mut scene)))
            .unwrap();
        w.add(Box::new(Prop::new("b".into(), Vec3::ZERO, &mut scene)))
            .unwrap();

        assert!(w.remove(&"ghost".into()).is_none());
        assert_eq!(names(&w), vec!["player", "a", "b"]);
    }

    #[test]
    fn player_cannot_be_removed() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        assert!(w.remove(&Player::ID.into()).is_none());
        assert_eq!(w.entity_count(), 1);
    }

    #[test]
    fn removed_entity_can_be_added_again_at_the_end() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Prop::new("a".into(), Vec3::ZERO, &mut scene)))
            .unwrap();
        w.add(Box::new(Prop::new("b".into(), Vec3::ZERO, &mut scene)))
            .unwrap();

        let a = w.remove(&"a".into()).unwrap();
        w.add(a).unwrap();
        assert_eq!(names(&w), vec!["player", "b", "a"]);
    }

    #[test]
    fn get_finds_player_and_props() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Prop::new("rock".into(), Vec3::new(1.0, 0.0, 0.0), &mut scene)))
            .unwrap();

        assert_eq!(w.get(&"rock".into()).unwrap().position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(w.get(&Player::ID.into()).unwrap().position(), Vec3::ZERO);
        assert!(w.get(&"none".into()).is_none());
    }

    #[test]
    fn dropping_world_releases_keyboard_and_handles() {
        let mut scene = StaticScene::new();
        let keyboard = EventSource::new();
        let mut w = world(&mut scene, &keyboard);
        w.add(Box::new(Prop::new("rock".into(), Vec3::ZERO, &mut scene)))
            .unwrap();
        assert_eq!(scene.live_handles(), 2);

        drop(w);
        assert_eq!(keyboard.subscriber_count(), 0);
        assert_eq!(scene.live_handles(), 0);
    }
}
