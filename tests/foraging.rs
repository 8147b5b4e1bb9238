//! Scenario tests for the basic foraging protocol.

use formicary_lib::model::brain::StateName;
use formicary_lib::model::config::SimConfig;
use formicary_lib::model::entity::{EntityId, EntityKind, SpriteId};
use formicary_lib::model::sim::{Simulation, SpriteSet};
use formicary_lib::model::vec2::Vec2;
use std::collections::HashMap;

fn empty_config(seed: u64) -> SimConfig {
    let mut config = SimConfig::default();
    config.world.seed = Some(seed);
    config.population.ants = 0;
    config.population.rocks = 0;
    config.population.leaves = 0;
    config
}

fn force_state(sim: &mut Simulation, id: EntityId, name: StateName) {
    sim.world_mut()
        .with_entity(id, |ant, world| {
            let mut brain = std::mem::take(&mut ant.brain);
            brain.set_state(name, ant, world).unwrap();
            ant.brain = brain;
        })
        .unwrap();
}

#[test]
fn test_single_ant_depletes_leaf_in_two_pickups() {
    let mut config = empty_config(42);
    config.population.ants = 1;
    config.forage.pickup_radius = 4.0;

    let mut sim = Simulation::new(config, SpriteSet::default()).unwrap();
    let nest = sim.world().nest_position();
    let leaf = sim.spawn_leaf(SpriteId(2), nest + Vec2::new(50.0, 0.0), 20);
    let ant = sim
        .entities()
        .find(|e| e.kind == EntityKind::Ant)
        .map(|e| e.id)
        .unwrap();

    let mut last_stock = 20;
    let mut removed_at = None;
    for tick in 1..=100_000u64 {
        sim.advance(33.0);

        match sim.world().get(leaf) {
            Some(entity) => {
                // Stock only ever decreases, in whole bites.
                assert!(entity.stock <= last_stock, "stock must be monotonic");
                assert!(entity.stock > 0, "a depleted leaf must not linger");
                last_stock = entity.stock;
            }
            None => {
                removed_at = Some(tick);
                break;
            }
        }

        // Carrying is cleared before the ant ever seeks again.
        let ant = sim.world().get(ant).unwrap();
        if ant.brain.active_state() == Some(StateName::Seeking) {
            assert!(!ant.is_carrying());
        }
    }

    assert!(removed_at.is_some(), "leaf should be depleted eventually");
    assert_eq!(last_stock, 10, "two bites of 10 drain a stock of 20");

    // The depleting pickup sends the ant off to deliver its cargo.
    let ant = sim.world().get(ant).unwrap();
    assert_eq!(ant.brain.active_state(), Some(StateName::Delivering));
    assert!(ant.is_carrying());
    assert!(sim.world().get(leaf).is_none());
}

#[test]
fn test_rock_proximity_query() {
    let mut sim = Simulation::new(empty_config(5), SpriteSet::default()).unwrap();
    let probe = Vec2::new(100.0, 100.0);
    sim.spawn_rock(SpriteId(1), probe); // distance 0
    sim.spawn_rock(SpriteId(1), probe + Vec2::new(17.0, 0.0));

    let world = sim.world();
    assert!(world
        .get_close_entity(EntityKind::Rock, probe, 16.0)
        .is_some());
    assert!(world
        .get_close_entity(EntityKind::Rock, probe + Vec2::new(0.0, 40.0), 16.0)
        .is_none());
    assert!(world.in_obstacle(probe, 16.0));
}

#[test]
fn test_stale_target_routes_to_exploring() {
    let mut config = empty_config(9);
    config.population.ants = 1;
    let mut sim = Simulation::new(config, SpriteSet::default()).unwrap();
    let ant = sim.entities().next().map(|e| e.id).unwrap();

    // Target an id that no longer resolves.
    sim.world_mut().get_mut(ant).unwrap().leaf_id = Some(777);
    force_state(&mut sim, ant, StateName::Seeking);

    sim.advance(33.0);

    let ant = sim.world().get(ant).unwrap();
    assert_eq!(ant.brain.active_state(), Some(StateName::Exploring));
    assert_eq!(ant.leaf_id, None, "stale target is dropped on exit");
}

#[test]
fn test_contested_leaf_goes_to_lower_id() {
    let mut config = empty_config(13);
    config.forage.pickup_radius = 4.0;
    let mut sim = Simulation::new(config, SpriteSet::default()).unwrap();

    let nest = sim.world().nest_position();
    let first = sim.spawn_ant(SpriteId(0)).unwrap();
    let second = sim.spawn_ant(SpriteId(0)).unwrap();
    let leaf = sim.spawn_leaf(SpriteId(2), nest, 10); // one bite left

    for ant in [first, second] {
        sim.world_mut().get_mut(ant).unwrap().leaf_id = Some(leaf);
        force_state(&mut sim, ant, StateName::Seeking);
    }

    sim.advance(33.0);

    // Processing order is ascending id: the first ant takes the last bite
    // and the second recovers by exploring, without error.
    let winner = sim.world().get(first).unwrap();
    let loser = sim.world().get(second).unwrap();
    assert!(sim.world().get(leaf).is_none());
    assert_eq!(winner.brain.active_state(), Some(StateName::Delivering));
    assert!(winner.is_carrying());
    assert_eq!(loser.brain.active_state(), Some(StateName::Exploring));
    assert!(!loser.is_carrying());
}

#[test]
fn test_colony_run_preserves_world_invariants() {
    let mut config = SimConfig::default();
    config.world.seed = Some(2024);
    let mut sim = Simulation::new(config, SpriteSet::default()).unwrap();

    let mut stocks: HashMap<EntityId, i32> = HashMap::new();
    for _ in 0..2000 {
        sim.advance(33.0);

        let world = sim.world();
        let mut previous_id = None;
        for entity in world.entities() {
            // Ascending id enumeration, ids consistent with keys.
            if let Some(prev) = previous_id {
                assert!(entity.id > prev);
            }
            previous_id = Some(entity.id);

            if entity.kind == EntityKind::Leaf {
                assert!(entity.stock > 0, "leaves are removed exactly at depletion");
                if let Some(&seen) = stocks.get(&entity.id) {
                    assert!(entity.stock <= seen, "leaf stock must be monotonic");
                }
                stocks.insert(entity.id, entity.stock);
            }
        }
        assert_eq!(world.count(EntityKind::Rock), 20, "rocks are permanent");
    }
    assert_eq!(sim.world().tick, 2000);
}
