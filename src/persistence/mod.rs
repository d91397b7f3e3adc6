//! # Persistence Units
//!
//! The registry of entities a DAO may touch.
//!
//! A [`PersistenceUnit`] names a set of entity types; a [`PersistenceCatalog`]
//! maps unit names to units and is what a DAO resolves its configured unit
//! against at `init`. Table names used in queries come exclusively from
//! [`EntityName`] values handed out by a unit, which is how query templating
//! stays restricted to trusted identifiers.

pub mod schema;

pub use schema::{generate_schema, SchemaGeneration};

use crate::concept::PfConcept;
use crate::error::{PfModelError, PfModelResult};
use crate::keys::KeyShape;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Registered name and key shape of one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityDescriptor {
    name: &'static str,
    shape: KeyShape,
}

impl EntityDescriptor {
    pub const fn new(name: &'static str, shape: KeyShape) -> Self {
        Self { name, shape }
    }

    pub fn of<T: PfConcept>() -> Self {
        Self::new(T::ENTITY_NAME, T::KEY_SHAPE)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> KeyShape {
        self.shape
    }

    /// The validated table identifier for this entity
    pub fn entity_name(&self) -> PfModelResult<EntityName> {
        let mut chars = self.name.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(PfModelError::InvalidArgument(format!(
                "entity name \"{}\" is not a valid table identifier",
                self.name
            )));
        }
        Ok(EntityName(self.name))
    }
}

/// Table identifier of a registered entity. Only obtainable through
/// [`EntityDescriptor::entity_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityName(&'static str);

impl EntityName {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A named set of entity types managed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceUnit {
    name: String,
    entities: Vec<EntityDescriptor>,
}

impl PersistenceUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
        }
    }

    pub fn with_entity<T: PfConcept>(self) -> Self {
        self.with_descriptor(EntityDescriptor::of::<T>())
    }

    pub fn with_descriptor(mut self, descriptor: EntityDescriptor) -> Self {
        if !self.entities.contains(&descriptor) {
            self.entities.push(descriptor);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Resolve the table name of `T`, failing if this unit does not manage it
    pub fn entity_name<T: PfConcept>(&self) -> PfModelResult<EntityName> {
        self.entities
            .iter()
            .find(|descriptor| **descriptor == EntityDescriptor::of::<T>())
            .ok_or_else(|| {
                PfModelError::InvalidArgument(format!(
                    "entity \"{}\" is not managed by persistence unit \"{}\"",
                    T::ENTITY_NAME,
                    self.name
                ))
            })?
            .entity_name()
    }
}

/// Thread-safe registry of persistence units, keyed by unit name
#[derive(Debug, Default)]
pub struct PersistenceCatalog {
    units: RwLock<HashMap<String, PersistenceUnit>>,
}

impl PersistenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(self, unit: PersistenceUnit) -> Self {
        self.register(unit);
        self
    }

    /// Register a unit, replacing any unit of the same name
    pub fn register(&self, unit: PersistenceUnit) {
        self.units.write().insert(unit.name().to_string(), unit);
    }

    pub fn unit(&self, name: &str) -> Option<PersistenceUnit> {
        self.units.read().get(name).cloned()
    }

    pub fn unit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.units.read().keys().cloned().collect();
        names.sort();
        names
    }
}
