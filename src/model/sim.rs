//! Simulation driver: construction of the initial colony and the per-tick
//! entry point for the external loop/rendering shell.

use crate::model::behavior;
use crate::model::brain::StateName;
use crate::model::config::SimConfig;
use crate::model::entity::{Entity, EntityId, EntityKind, SpriteId};
use crate::model::error::Result;
use crate::model::vec2::Vec2;
use crate::model::world::World;
use rand::Rng;
use tracing::info;

/// Visual handles supplied by the shell for each spawned kind.
/// Opaque to the core; the defaults only matter for headless runs.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSet {
    pub ant: SpriteId,
    pub rock: SpriteId,
    pub leaf: SpriteId,
    pub crumb: SpriteId,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self {
            ant: SpriteId(0),
            rock: SpriteId(1),
            leaf: SpriteId(2),
            crumb: SpriteId(3),
        }
    }
}

pub struct Simulation {
    world: World,
    sprites: SpriteSet,
}

impl Simulation {
    /// Builds the world and the initial population: ants at the nest in
    /// Exploring, rocks and leaves scattered outside the nest.
    pub fn new(config: SimConfig, sprites: SpriteSet) -> Result<Self> {
        let mut sim = Self {
            world: World::new(config, sprites.crumb),
            sprites,
        };
        sim.populate()?;
        Ok(sim)
    }

    fn populate(&mut self) -> Result<()> {
        let population = self.world.config.population.clone();
        let stock = self.world.config.forage.leaf_stock;

        for _ in 0..population.ants {
            self.spawn_ant(self.sprites.ant)?;
        }
        for _ in 0..population.rocks {
            let location = self.random_location_outside_nest();
            self.spawn_rock(self.sprites.rock, location);
        }
        for _ in 0..population.leaves {
            let location = self.random_location_outside_nest();
            self.spawn_leaf(self.sprites.leaf, location, stock);
        }

        info!(
            ants = population.ants,
            rocks = population.rocks,
            leaves = population.leaves,
            mode = ?self.world.config.forage.mode,
            "colony populated"
        );
        Ok(())
    }

    /// Rejection-samples a point in bounds until it falls outside the nest.
    fn random_location_outside_nest(&mut self) -> Vec2 {
        let bounds = self.world.bounds();
        loop {
            let point = Vec2::new(
                self.world.rng.gen_range(0.0..=bounds.x),
                self.world.rng.gen_range(0.0..=bounds.y),
            );
            if !self.world.is_inside_nest(point) {
                return point;
            }
        }
    }

    /// Spawns an ant at the nest with the mode's state machine, starting in
    /// Exploring. A machine missing the Exploring state is a setup error and
    /// fails fast here.
    pub fn spawn_ant(&mut self, sprite: SpriteId) -> Result<EntityId> {
        let nest = self.world.nest_position();
        let mut ant = Entity::new(EntityKind::Ant, sprite, nest);
        ant.brain = behavior::machine_for(self.world.config.forage.mode);
        let id = self.world.add_entity(ant);

        if let Some(wired) = self.world.with_entity(id, |ant, world| {
            let mut brain = std::mem::take(&mut ant.brain);
            let wired = brain.set_state(StateName::Exploring, ant, world);
            ant.brain = brain;
            wired
        }) {
            wired?;
        }
        Ok(id)
    }

    pub fn spawn_rock(&mut self, sprite: SpriteId, location: Vec2) -> EntityId {
        self.world
            .add_entity(Entity::new(EntityKind::Rock, sprite, location))
    }

    pub fn spawn_leaf(&mut self, sprite: SpriteId, location: Vec2, stock: i32) -> EntityId {
        let mut leaf = Entity::new(EntityKind::Leaf, sprite, location);
        leaf.stock = stock;
        self.world.add_entity(leaf)
    }

    pub fn spawn_crumb(&mut self, location: Vec2) -> EntityId {
        self.world.spawn_crumb(location)
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        self.world.remove_entity(id);
    }

    /// One tick: advances every entity by `dt_millis` of elapsed time.
    pub fn advance(&mut self, dt_millis: f64) {
        self.world.process(dt_millis);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Entity enumeration for the drawing shell.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.world.entities()
    }
}
