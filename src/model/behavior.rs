//! The foraging protocol: concrete behavior states for ants.
//!
//! A closed sum type with four optional hooks (default no-op), matching the
//! state machine's registration-by-name contract. Basic colonies run
//! {Exploring, Seeking, Delivering}; cooperative colonies add
//! {SeekingAndPicking, DroppingAndDelivering}, which lay and follow crumb
//! trails. There is no direct ant-to-ant channel; coordination happens
//! entirely through crumb entities in the world.

use crate::model::brain::{StateMachine, StateName};
use crate::model::config::ColonyMode;
use crate::model::entity::{Entity, EntityId, EntityKind};
use crate::model::vec2::Vec2;
use crate::model::world::World;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Exploring,
    Seeking,
    Delivering,
    SeekingAndPicking,
    DroppingAndDelivering,
}

/// Builds the state machine for an ant of the given colony mode.
/// The machine starts without an active state; the spawner sets Exploring.
pub fn machine_for(mode: ColonyMode) -> StateMachine {
    let mut brain = StateMachine::new();
    brain.add_state(State::Exploring);
    brain.add_state(State::Seeking);
    brain.add_state(State::Delivering);
    if mode == ColonyMode::Cooperative {
        brain.add_state(State::SeekingAndPicking);
        brain.add_state(State::DroppingAndDelivering);
    }
    brain
}

impl State {
    pub fn name(self) -> StateName {
        match self {
            State::Exploring => StateName::Exploring,
            State::Seeking => StateName::Seeking,
            State::Delivering => StateName::Delivering,
            State::SeekingAndPicking => StateName::SeekingAndPicking,
            State::DroppingAndDelivering => StateName::DroppingAndDelivering,
        }
    }

    pub fn do_actions(self, ant: &mut Entity, world: &mut World) {
        match self {
            State::Exploring => {
                let chance = world.config.forage.retarget_chance;
                if world.rng.gen_bool(chance) {
                    random_destination(ant, world);
                }
            }
            // Wandering with a fresh destination every tick biases the walk
            // toward the center of the bounds, which is what brings a
            // delivering ant home without a beeline.
            State::Delivering => random_destination(ant, world),
            State::DroppingAndDelivering => drop_crumbs(ant, world),
            _ => {}
        }
    }

    pub fn check_conditions(self, ant: &mut Entity, world: &mut World) -> Option<StateName> {
        match self {
            State::Exploring => check_exploring(ant, world),
            State::Seeking => check_seeking(ant, world),
            State::SeekingAndPicking => check_seeking_and_picking(ant, world),
            State::Delivering | State::DroppingAndDelivering => check_delivering(ant, world),
        }
    }

    pub fn entry_actions(self, ant: &mut Entity, world: &mut World) {
        let forage = world.config.forage;
        match self {
            State::Exploring => {
                ant.speed = forage.explore_speed;
                random_destination(ant, world);
            }
            State::Seeking => {
                let target = ant.leaf_id;
                head_for_target(ant, world, target);
            }
            State::SeekingAndPicking => {
                let target = ant.crumb_id;
                head_for_target(ant, world, target);
            }
            State::Delivering => {
                ant.speed = forage.deliver_speed;
                random_destination(ant, world);
            }
            State::DroppingAndDelivering => {
                // Beeline home so the crumb trail points toward the nest.
                ant.speed = forage.deliver_speed;
                let scatter = forage.nest_scatter;
                let offset = Vec2::new(
                    world.rng.gen_range(-scatter..=scatter),
                    world.rng.gen_range(-scatter..=scatter),
                );
                ant.destination = world.nest_position() + offset;
            }
        }
    }

    pub fn exit_actions(self, ant: &mut Entity, _world: &mut World) {
        match self {
            State::Seeking => ant.leaf_id = None,
            State::SeekingAndPicking => ant.crumb_id = None,
            _ => {}
        }
    }
}

fn random_destination(ant: &mut Entity, world: &mut World) {
    let bounds = world.bounds();
    ant.destination = Vec2::new(
        world.rng.gen_range(0.0..=bounds.x),
        world.rng.gen_range(0.0..=bounds.y),
    );
}

/// Points the ant at its recorded target and jitters the seek speed.
/// A target that already vanished leaves destination and speed untouched;
/// the next `check_conditions` routes back to exploring.
fn head_for_target(ant: &mut Entity, world: &mut World, target: Option<EntityId>) {
    let forage = world.config.forage;
    let location = target.and_then(|id| world.get(id)).map(|e| e.location);
    if let Some(location) = location {
        ant.destination = location;
        ant.speed = forage.seek_speed + world.rng.gen_range(-forage.seek_jitter..=forage.seek_jitter);
    }
}

fn check_exploring(ant: &mut Entity, world: &mut World) -> Option<StateName> {
    let forage = world.config.forage;

    // Inside an obstacle radius the ant neither retargets nor scans for
    // resources; the per-tick destination reroll walks it back out.
    if world.in_obstacle(ant.location, forage.obstacle_radius) {
        return None;
    }

    if forage.mode == ColonyMode::Cooperative {
        if let Some(crumb) = world.get_close_entity(EntityKind::Crumb, ant.location, forage.crumb_radius) {
            ant.crumb_id = Some(crumb.id);
            return Some(StateName::SeekingAndPicking);
        }
    }

    if let Some(leaf) = world.get_close_entity(EntityKind::Leaf, ant.location, forage.leaf_radius) {
        ant.leaf_id = Some(leaf.id);
        return Some(StateName::Seeking);
    }

    None
}

fn check_seeking(ant: &mut Entity, world: &mut World) -> Option<StateName> {
    let forage = world.config.forage;

    // Lost target (taken or depleted by another ant) is the normal
    // recovery path, never an error.
    let Some(leaf_id) = ant.leaf_id else {
        return Some(StateName::Exploring);
    };
    let (leaf_location, leaf_sprite) = match world.get(leaf_id) {
        Some(leaf) => (leaf.location, leaf.sprite),
        None => return Some(StateName::Exploring),
    };

    if ant.location.distance_to(leaf_location) >= forage.pickup_radius {
        return None;
    }

    ant.carry(leaf_sprite);
    let mut depleted = true;
    if let Some(leaf) = world.get_mut(leaf_id) {
        leaf.stock -= forage.bite;
        depleted = leaf.stock <= 0;
    }
    if depleted {
        world.remove_entity(leaf_id);
        return Some(StateName::Delivering);
    }

    match forage.mode {
        ColonyMode::Cooperative => Some(StateName::DroppingAndDelivering),
        ColonyMode::Basic => Some(StateName::Delivering),
    }
}

fn check_seeking_and_picking(ant: &mut Entity, world: &mut World) -> Option<StateName> {
    let forage = world.config.forage;

    let Some(crumb_id) = ant.crumb_id else {
        return Some(StateName::Exploring);
    };
    let Some(crumb_location) = world.get(crumb_id).map(|c| c.location) else {
        return Some(StateName::Exploring);
    };

    if ant.location.distance_to(crumb_location) < forage.pickup_radius {
        // Crumbs are single-use breadcrumbs, not resources.
        world.remove_entity(crumb_id);
        return Some(StateName::Exploring);
    }
    None
}

fn check_delivering(ant: &mut Entity, world: &mut World) -> Option<StateName> {
    let forage = world.config.forage;
    if world.is_inside_nest(ant.location) && world.rng.gen_bool(forage.drop_chance) {
        ant.drop_cargo();
        return Some(StateName::Exploring);
    }
    None
}

/// Crumb cadence while hauling: emit one crumb on the first tick of each
/// cycle, at the ant's current location. Pauses while not carrying.
fn drop_crumbs(ant: &mut Entity, world: &mut World) {
    if !ant.is_carrying() {
        return;
    }
    ant.crumb_delay += 1;
    if ant.crumb_delay == 1 {
        world.spawn_crumb(ant.location);
    } else if ant.crumb_delay >= world.config.forage.crumb_cycle {
        ant.crumb_delay = 0;
    }
}
