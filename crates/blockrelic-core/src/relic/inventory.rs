//! Owned relics, in the order the player arranged them.

use crate::relic::copy::sync_copy_target;
use crate::relic::{RelicRegistry, RelicState, RelicStates, RelicType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InventoryError {
    #[error("Relic {0:?} is already owned")]
    AlreadyOwned(RelicType),
    #[error("Relic {0:?} is not owned")]
    NotOwned(RelicType),
    #[error("Relic {0:?} is not registered")]
    Unregistered(RelicType),
    #[error("New order must be a permutation of the owned relics")]
    InvalidOrder,
}

/// Owned relics in display order, plus their states.
///
/// Display order decides both evaluation order and what Copy mirrors.
/// Every mutation returns a new inventory and re-syncs Copy's target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelicInventory {
    display_order: Vec<RelicType>,
    states: RelicStates,
}

impl RelicInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire `relics` in order
    pub fn from_relics(
        registry: &RelicRegistry,
        relics: &[RelicType],
    ) -> Result<Self, InventoryError> {
        relics
            .iter()
            .try_fold(Self::new(), |inventory, &relic| inventory.acquire(registry, relic))
    }

    pub fn display_order(&self) -> &[RelicType] {
        &self.display_order
    }

    pub fn states(&self) -> &RelicStates {
        &self.states
    }

    pub fn state(&self, relic: RelicType) -> &RelicState {
        self.states.get(relic)
    }

    pub fn owns(&self, relic: RelicType) -> bool {
        self.display_order.contains(&relic)
    }

    pub fn position(&self, relic: RelicType) -> Option<usize> {
        self.display_order.iter().position(|&r| r == relic)
    }

    pub fn len(&self) -> usize {
        self.display_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_order.is_empty()
    }

    /// Overwrite one relic's state. The lifecycle dispatcher is the only
    /// caller outside tests.
    pub fn set_state(&mut self, relic: RelicType, state: RelicState) {
        self.states.insert(relic, state);
    }

    /// Append `relic` with its initial state
    pub fn acquire(&self, registry: &RelicRegistry, relic: RelicType) -> Result<Self, InventoryError> {
        let module = registry
            .get(relic)
            .ok_or(InventoryError::Unregistered(relic))?;
        if self.owns(relic) {
            return Err(InventoryError::AlreadyOwned(relic));
        }

        let mut next = self.clone();
        next.display_order.push(relic);
        next.states.insert(relic, module.initial_state());
        tracing::debug!(?relic, slot = next.display_order.len() - 1, "relic acquired");
        Ok(sync_copy_target(registry, next))
    }

    /// Drop `relic` and its state
    pub fn remove(&self, registry: &RelicRegistry, relic: RelicType) -> Result<Self, InventoryError> {
        let index = self.position(relic).ok_or(InventoryError::NotOwned(relic))?;

        let mut next = self.clone();
        next.display_order.remove(index);
        next.states.remove(relic);
        tracing::debug!(?relic, "relic removed");
        Ok(sync_copy_target(registry, next))
    }

    /// Replace the display order with a permutation of the owned relics
    pub fn reorder(
        &self,
        registry: &RelicRegistry,
        order: Vec<RelicType>,
    ) -> Result<Self, InventoryError> {
        let owned: BTreeSet<RelicType> = self.display_order.iter().copied().collect();
        let requested: BTreeSet<RelicType> = order.iter().copied().collect();
        if order.len() != self.display_order.len() || owned != requested {
            return Err(InventoryError::InvalidOrder);
        }

        let mut next = self.clone();
        next.display_order = order;
        Ok(sync_copy_target(registry, next))
    }
}
