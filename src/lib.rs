pub mod model;

pub use model::config::{ColonyMode, SimConfig};
pub use model::entity::{Entity, EntityId, EntityKind, SpriteId};
pub use model::error::{Result, SimError};
pub use model::sim::{Simulation, SpriteSet};
pub use model::world::World;
