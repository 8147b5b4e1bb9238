//! Shared-world entity registry and proximity-query layer.
//!
//! An id-keyed arena with ascending-id iteration order. The order is part of
//! the contract: proximity queries return the first match in id order, and
//! the per-tick pass processes lower ids first, which is what decides who
//! wins a contested resource.

use crate::model::config::SimConfig;
use crate::model::entity::{Entity, EntityId, EntityKind, SpriteId};
use crate::model::vec2::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

pub struct World {
    entities: BTreeMap<EntityId, Entity>,
    next_id: EntityId,
    pub tick: u64,
    pub config: SimConfig,
    /// Sprite stamped on crumbs spawned from within behavior states.
    crumb_sprite: SpriteId,
    pub rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: SimConfig, crumb_sprite: SpriteId) -> Self {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            entities: BTreeMap::new(),
            next_id: 0,
            tick: 0,
            config,
            crumb_sprite,
            rng,
        }
    }

    /// Stores the entity under the next sequential id and returns it.
    /// Ids start at 0 and are never reused within a run.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Deletes the entity; silently a no-op when the id is already gone,
    /// since two agents may try to consume the same target in one tick.
    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.remove(&id);
    }

    /// Absent-safe lookup. Behavior states routinely hold stale ids, so a
    /// removed id must report not-found rather than fail.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// All entities in ascending id order, for the rendering shell.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// First entity of `kind` strictly within `radius`, in ascending id
    /// order. First-found rather than nearest: a deliberate cheap heuristic,
    /// kept stable for reproducibility.
    pub fn get_close_entity(&self, kind: EntityKind, location: Vec2, radius: f64) -> Option<&Entity> {
        self.entities
            .values()
            .find(|e| e.kind == kind && location.distance_to(e.location) < radius)
    }

    pub fn in_obstacle(&self, point: Vec2, radius: f64) -> bool {
        self.entities
            .values()
            .any(|e| e.kind == EntityKind::Rock && point.distance_to(e.location) < radius)
    }

    pub fn is_inside_nest(&self, point: Vec2) -> bool {
        self.nest_position().distance_to(point) < self.config.world.nest_radius
    }

    pub fn nest_position(&self) -> Vec2 {
        self.config.nest_position()
    }

    pub fn bounds(&self) -> Vec2 {
        self.config.bounds()
    }

    pub fn spawn_crumb(&mut self, location: Vec2) -> EntityId {
        self.add_entity(Entity::new(EntityKind::Crumb, self.crumb_sprite, location))
    }

    /// Temporarily lifts an entity out of the arena and runs `f` with
    /// mutable access to both the entity and the rest of the world. This is
    /// how behavior hooks get to query and mutate the world without aliasing
    /// their own entity. Returns `None` when the id is absent.
    pub fn with_entity<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Entity, &mut World) -> R,
    ) -> Option<R> {
        let mut entity = self.entities.remove(&id)?;
        let out = f(&mut entity, self);
        self.entities.insert(entity.id, entity);
        Some(out)
    }

    /// Advances the whole world by `dt_millis` of elapsed time.
    ///
    /// One strict sequential pass over a snapshot of the ids present at the
    /// start of the tick: ids removed earlier in the pass are skipped, and
    /// entities spawned during the pass (crumbs) wait for the next tick.
    /// Never fails; individual agent anomalies are absorbed into state
    /// transitions.
    pub fn process(&mut self, dt_millis: f64) {
        let dt = dt_millis / 1000.0;
        self.tick += 1;

        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.with_entity(id, |entity, world| {
                let mut brain = std::mem::take(&mut entity.brain);
                brain.think(entity, world);
                entity.brain = brain;
                entity.advance(dt);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(SimConfig::default(), SpriteId(3))
    }

    fn leaf_at(x: f64, y: f64) -> Entity {
        let mut leaf = Entity::new(EntityKind::Leaf, SpriteId(2), Vec2::new(x, y));
        leaf.stock = 20;
        leaf
    }

    #[test]
    fn test_add_entity_assigns_sequential_ids() {
        let mut world = world();
        let a = world.add_entity(leaf_at(0.0, 0.0));
        let b = world.add_entity(leaf_at(1.0, 0.0));
        assert_eq!((a, b), (0, 1));
        assert_eq!(world.get(a).map(|e| e.id), Some(0));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut world = world();
        let a = world.add_entity(leaf_at(0.0, 0.0));
        world.remove_entity(a);
        let b = world.add_entity(leaf_at(1.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_after_removal_is_not_found() {
        let mut world = world();
        let id = world.add_entity(leaf_at(0.0, 0.0));
        world.remove_entity(id);
        assert!(world.get(id).is_none());
        // Double removal must not panic.
        world.remove_entity(id);
    }

    #[test]
    fn test_get_close_entity_returns_first_in_id_order() {
        let mut world = world();
        let near = world.add_entity(leaf_at(5.0, 0.0));
        let nearer = world.add_entity(leaf_at(1.0, 0.0));

        // Not nearest-neighbor: the lower id wins even though the other
        // leaf is closer.
        let found = world
            .get_close_entity(EntityKind::Leaf, Vec2::ZERO, 10.0)
            .map(|e| e.id);
        assert_eq!(found, Some(near));
        assert_ne!(found, Some(nearer));
    }

    #[test]
    fn test_get_close_entity_radius_is_strict() {
        let mut world = world();
        world.add_entity(leaf_at(16.0, 0.0));
        assert!(world
            .get_close_entity(EntityKind::Leaf, Vec2::ZERO, 16.0)
            .is_none());
        assert!(world
            .get_close_entity(EntityKind::Leaf, Vec2::new(16.0, 0.0), 16.0)
            .is_some());
    }

    #[test]
    fn test_get_close_entity_filters_by_kind() {
        let mut world = world();
        world.add_entity(Entity::new(EntityKind::Rock, SpriteId(1), Vec2::ZERO));
        assert!(world
            .get_close_entity(EntityKind::Leaf, Vec2::ZERO, 100.0)
            .is_none());
        assert!(world.in_obstacle(Vec2::ZERO, 16.0));
        assert!(!world.in_obstacle(Vec2::new(100.0, 0.0), 16.0));
    }

    #[test]
    fn test_is_inside_nest() {
        let world = world();
        assert!(world.is_inside_nest(Vec2::new(300.0, 300.0)));
        assert!(world.is_inside_nest(Vec2::new(330.0, 300.0)));
        assert!(!world.is_inside_nest(Vec2::new(340.0, 300.0)));
    }

    #[test]
    fn test_process_moves_brainless_entities() {
        let mut world = world();
        let mut runner = Entity::new(EntityKind::Ant, SpriteId(0), Vec2::ZERO);
        runner.destination = Vec2::new(100.0, 0.0);
        runner.speed = 10.0;
        let id = world.add_entity(runner);

        world.process(1000.0);
        assert_eq!(world.tick, 1);
        assert_eq!(world.get(id).map(|e| e.location), Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_with_entity_reinserts_under_same_id() {
        let mut world = world();
        let id = world.add_entity(leaf_at(0.0, 0.0));
        let seen = world.with_entity(id, |entity, world| {
            // The entity is lifted out while the closure runs.
            assert!(world.get(id).is_none());
            entity.stock -= 5;
            entity.stock
        });
        assert_eq!(seen, Some(15));
        assert_eq!(world.get(id).map(|e| e.stock), Some(15));
        assert!(world.with_entity(9999, |_, _| ()).is_none());
    }
}
