use crate::model::brain::StateMachine;
use crate::model::vec2::Vec2;

/// Entity identifier: sequential, unique, never reused within a run.
pub type EntityId = u64;

/// Opaque handle to a sprite owned by the rendering shell.
/// The core stores and returns these but never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ant,
    Rock,
    Leaf,
    Crumb,
}

/// A movable object in the world.
///
/// Only ants carry behavior: their `brain` has registered states and an
/// active one. Rocks, leaves and crumbs keep the default empty machine,
/// whose `think` is a no-op. The `leaf_id`/`crumb_id` targets are lookup
/// relations, not ownership; the referenced entity may be removed by
/// another agent at any tick.
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub sprite: SpriteId,
    pub location: Vec2,
    pub destination: Vec2,
    pub speed: f64,
    /// Resource remaining; meaningful for leaves only.
    pub stock: i32,
    /// Sprite of the carried resource, if any.
    pub carrying: Option<SpriteId>,
    pub leaf_id: Option<EntityId>,
    pub crumb_id: Option<EntityId>,
    /// Position within the crumb-emission cycle while hauling a trail.
    pub crumb_delay: u8,
    pub brain: StateMachine,
}

impl Entity {
    pub fn new(kind: EntityKind, sprite: SpriteId, location: Vec2) -> Self {
        Self {
            id: 0,
            kind,
            sprite,
            location,
            destination: location,
            speed: 0.0,
            stock: 0,
            carrying: None,
            leaf_id: None,
            crumb_id: None,
            crumb_delay: 0,
            brain: StateMachine::default(),
        }
    }

    pub fn carry(&mut self, sprite: SpriteId) {
        self.carrying = Some(sprite);
    }

    pub fn drop_cargo(&mut self) -> Option<SpriteId> {
        self.carrying.take()
    }

    pub fn is_carrying(&self) -> bool {
        self.carrying.is_some()
    }

    /// Capped linear movement: travel `min(remaining, speed * dt)` toward the
    /// destination, snapping exactly onto it on arrival. The exact equality
    /// check is sound because destinations are only ever reached through the
    /// snap below.
    pub fn advance(&mut self, dt: f64) {
        if self.speed <= 0.0 || self.location == self.destination {
            return;
        }

        let to_destination = self.destination - self.location;
        let distance = to_destination.length();
        let travel = distance.min(self.speed * dt);

        if travel >= distance {
            self.location = self.destination;
        } else {
            self.location += to_destination.normalized() * travel;
        }
    }
}
