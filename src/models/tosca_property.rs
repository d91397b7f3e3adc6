use crate::concept::PfConcept;
use crate::keys::{KeyShape, PfConceptKey, PfKey, PfReferenceKey};
use serde::{Deserialize, Serialize};

/// A property declared by a policy type; its key's parent is the policy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToscaProperty {
    pub key: PfReferenceKey,
    #[serde(rename = "type")]
    pub type_key: PfConceptKey,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToscaProperty {
    pub fn new(parent: &PfConceptKey, name: impl Into<String>, type_key: PfConceptKey) -> Self {
        Self {
            key: PfReferenceKey::new(parent, name),
            type_key,
            required: false,
            default_value: None,
            description: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

impl PfConcept for ToscaProperty {
    const ENTITY_NAME: &'static str = "ToscaProperty";
    const KEY_SHAPE: KeyShape = KeyShape::Reference;

    fn key(&self) -> PfKey {
        self.key.clone().into()
    }
}
