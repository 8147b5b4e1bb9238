use crate::model::error::Result;
use crate::model::vec2::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which foraging protocol the colony runs.
///
/// `Basic` ants shuttle between leaves and the nest on their own.
/// `Cooperative` ants additionally lay crumb trails on the way home and
/// follow trails laid by others; coordination is entirely world-mediated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColonyMode {
    Basic,
    Cooperative,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorldSettings {
    pub width: f64,
    pub height: f64,
    pub nest_x: f64,
    pub nest_y: f64,
    pub nest_radius: f64,
    /// RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PopulationSettings {
    pub ants: usize,
    pub rocks: usize,
    pub leaves: usize,
}

/// Per-species speeds, detection radii, and protocol probabilities.
///
/// The two source variants of this protocol disagree on detection and pickup
/// thresholds, so none of these are hardcoded; `SimConfig::default` and
/// `SimConfig::cooperative` carry the canonical values of each variant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ForageSettings {
    pub mode: ColonyMode,
    /// Leaf detection radius while exploring.
    pub leaf_radius: f64,
    /// Crumb detection radius while exploring (cooperative only).
    pub crumb_radius: f64,
    /// An ant this close to a rock is considered inside the obstacle.
    pub obstacle_radius: f64,
    /// Distance at which a targeted leaf or crumb counts as reached.
    pub pickup_radius: f64,
    /// Initial stock of a spawned leaf.
    pub leaf_stock: i32,
    /// Stock removed per pickup.
    pub bite: i32,
    pub explore_speed: f64,
    pub seek_speed: f64,
    /// Uniform jitter applied to the seek speed on state entry.
    pub seek_jitter: f64,
    pub deliver_speed: f64,
    /// Half-width of the random offset around the nest used as the
    /// homeward destination when laying a trail.
    pub nest_scatter: f64,
    /// Per-tick probability of rerolling the wander destination.
    pub retarget_chance: f64,
    /// Per-tick probability of dropping the cargo once inside the nest.
    pub drop_chance: f64,
    /// Crumb cadence: one crumb on the first tick of each cycle.
    pub crumb_cycle: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    pub world: WorldSettings,
    pub population: PopulationSettings,
    pub forage: ForageSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldSettings {
                width: 600.0,
                height: 600.0,
                nest_x: 300.0,
                nest_y: 300.0,
                nest_radius: 40.0,
                seed: None,
            },
            population: PopulationSettings {
                ants: 10,
                rocks: 20,
                leaves: 20,
            },
            forage: ForageSettings {
                mode: ColonyMode::Basic,
                leaf_radius: 60.0,
                crumb_radius: 50.0,
                obstacle_radius: 16.0,
                pickup_radius: 1.0,
                leaf_stock: 20,
                bite: 10,
                explore_speed: 120.0,
                seek_speed: 160.0,
                seek_jitter: 20.0,
                deliver_speed: 60.0,
                nest_scatter: 20.0,
                retarget_chance: 0.25,
                drop_chance: 0.1,
                crumb_cycle: 5,
            },
        }
    }
}

impl SimConfig {
    /// Cooperative preset: tighter leaf detection, wider crumb detection,
    /// and a forgiving pickup threshold.
    pub fn cooperative() -> Self {
        let mut config = Self::default();
        config.forage.mode = ColonyMode::Cooperative;
        config.forage.leaf_radius = 30.0;
        config.forage.crumb_radius = 50.0;
        config.forage.pickup_radius = 4.0;
        config
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn nest_position(&self) -> Vec2 {
        Vec2::new(self.world.nest_x, self.world.nest_y)
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.world.width, self.world.height)
    }
}
