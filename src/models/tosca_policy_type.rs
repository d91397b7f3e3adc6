use crate::concept::PfConcept;
use crate::keys::{KeyShape, PfConceptKey, PfKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A TOSCA policy type, identified by name and version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToscaPolicyType {
    pub key: PfConceptKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<PfConceptKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ToscaPolicyType {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            key: PfConceptKey::new(name, version),
            derived_from: None,
            description: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_derived_from(mut self, parent: PfConceptKey) -> Self {
        self.derived_from = Some(parent);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl PfConcept for ToscaPolicyType {
    const ENTITY_NAME: &'static str = "ToscaPolicyType";
    const KEY_SHAPE: KeyShape = KeyShape::Concept;

    fn key(&self) -> PfKey {
        self.key.clone().into()
    }
}
