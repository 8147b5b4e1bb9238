//! Generic named-state machine driving agent behavior.
//!
//! One `think` per tick: run the active state's actions, evaluate its
//! transition predicate, and switch states at most once. Exit hooks run to
//! completion before entry hooks on every transition.

use crate::model::behavior::State;
use crate::model::entity::Entity;
use crate::model::error::{Result, SimError};
use crate::model::world::World;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateName {
    Exploring,
    Seeking,
    Delivering,
    SeekingAndPicking,
    DroppingAndDelivering,
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateName::Exploring => "exploring",
            StateName::Seeking => "seeking",
            StateName::Delivering => "delivering",
            StateName::SeekingAndPicking => "seeking_picking",
            StateName::DroppingAndDelivering => "dropping_delivering",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct StateMachine {
    states: HashMap<StateName, State>,
    active: Option<StateName>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state under its name. Last write wins on a reused name.
    pub fn add_state(&mut self, state: State) {
        self.states.insert(state.name(), state);
    }

    pub fn active_state(&self) -> Option<StateName> {
        self.active
    }

    pub fn is_registered(&self, name: StateName) -> bool {
        self.states.contains_key(&name)
    }

    /// Switches the active state: exit hooks of the outgoing state run to
    /// completion before entry hooks of the incoming one. Fails when `name`
    /// was never registered; callers wiring up an agent should surface that
    /// error instead of ignoring it.
    pub fn set_state(&mut self, name: StateName, agent: &mut Entity, world: &mut World) -> Result<()> {
        let next = *self
            .states
            .get(&name)
            .ok_or(SimError::UnknownState(name))?;

        if let Some(current) = self.active.and_then(|n| self.states.get(&n)).copied() {
            current.exit_actions(agent, world);
        }

        tracing::debug!(entity = agent.id, state = %name, "state transition");
        self.active = Some(name);
        next.entry_actions(agent, world);
        Ok(())
    }

    /// One decision step. No-op without an active state. A transition to an
    /// unregistered name is absorbed here (logged, machine unchanged) so a
    /// behavior bug never propagates across the tick boundary.
    pub fn think(&mut self, agent: &mut Entity, world: &mut World) {
        let Some(state) = self.active.and_then(|n| self.states.get(&n)).copied() else {
            return;
        };

        state.do_actions(agent, world);
        if let Some(next) = state.check_conditions(agent, world) {
            if let Err(err) = self.set_state(next, agent, world) {
                tracing::warn!(entity = agent.id, %err, "transition absorbed");
            }
        }
    }
}
