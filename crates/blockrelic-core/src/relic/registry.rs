//! Lookup table from relic type to module.
//!
//! The registry is built once at startup and passed by reference into every
//! engine entry point. Tests build reduced registries with [`RelicRegistry::with`].

use crate::relic::catalog;
use crate::relic::{RelicModule, RelicType};
use std::collections::BTreeMap;
use std::fmt;

pub struct RelicRegistry {
    modules: BTreeMap<RelicType, Box<dyn RelicModule>>,
}

impl RelicRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Every relic in the catalog
    pub fn standard() -> Self {
        catalog::standard_modules()
            .into_iter()
            .fold(Self::new(), Self::with)
    }

    /// Registry containing only the given relics from the standard catalog
    pub fn only(relics: &[RelicType]) -> Self {
        catalog::standard_modules()
            .into_iter()
            .filter(|m| relics.contains(&m.relic_type()))
            .fold(Self::new(), Self::with)
    }

    /// Add (or replace) a module
    pub fn register(&mut self, module: Box<dyn RelicModule>) {
        self.modules.insert(module.relic_type(), module);
    }

    pub fn with(mut self, module: Box<dyn RelicModule>) -> Self {
        self.register(module);
        self
    }

    pub fn get(&self, relic: RelicType) -> Option<&dyn RelicModule> {
        self.modules.get(&relic).map(|m| m.as_ref())
    }

    pub fn contains(&self, relic: RelicType) -> bool {
        self.modules.contains_key(&relic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RelicModule> {
        self.modules.values().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for RelicRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for RelicRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.modules.keys()).finish()
    }
}
