use super::{validate_name, validate_version, PfConceptKey};
use crate::constants::keys::{NULL_KEY_NAME, NULL_KEY_VERSION};
use crate::error::PfModelResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a child concept: its parent's concept key, an optional parent
/// local name and its own local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PfReferenceKey {
    parent_key_name: String,
    parent_key_version: String,
    parent_local_name: String,
    local_name: String,
}

impl PfReferenceKey {
    pub fn new(parent: &PfConceptKey, local_name: impl Into<String>) -> Self {
        Self::with_parent_local_name(parent, NULL_KEY_NAME, local_name)
    }

    pub fn with_parent_local_name(
        parent: &PfConceptKey,
        parent_local_name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            parent_key_name: parent.name().to_string(),
            parent_key_version: parent.version().to_string(),
            parent_local_name: parent_local_name.into(),
            local_name: local_name.into(),
        }
    }

    pub fn null_key() -> Self {
        Self::new(&PfConceptKey::null_key(), NULL_KEY_NAME)
    }

    pub fn parent_key_name(&self) -> &str {
        &self.parent_key_name
    }

    pub fn parent_key_version(&self) -> &str {
        &self.parent_key_version
    }

    pub fn parent_local_name(&self) -> &str {
        &self.parent_local_name
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn parent_concept_key(&self) -> PfConceptKey {
        PfConceptKey::new(&self.parent_key_name, &self.parent_key_version)
    }

    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.parent_key_name, self.parent_key_version, self.parent_local_name, self.local_name
        )
    }

    pub fn is_null(&self) -> bool {
        self.parent_key_name == NULL_KEY_NAME
            && self.parent_key_version == NULL_KEY_VERSION
            && self.parent_local_name == NULL_KEY_NAME
            && self.local_name == NULL_KEY_NAME
    }

    pub fn validate(&self) -> PfModelResult<()> {
        validate_name("parentKeyName", &self.parent_key_name)?;
        validate_version("parentKeyVersion", &self.parent_key_version)?;
        validate_name("parentLocalName", &self.parent_local_name)?;
        validate_name("localName", &self.local_name)
    }
}

impl Default for PfReferenceKey {
    fn default() -> Self {
        Self::null_key()
    }
}

impl fmt::Display for PfReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_key_from_parent() {
        let parent = PfConceptKey::new("onap.policies.Monitoring", "1.0.0");
        let key = PfReferenceKey::new(&parent, "threshold");

        assert_eq!(key.parent_concept_key(), parent);
        assert_eq!(key.parent_local_name(), "NULL");
        assert_eq!(key.id(), "onap.policies.Monitoring:1.0.0:NULL:threshold");
        assert!(key.validate().is_ok());
        assert!(!key.is_null());
        assert!(PfReferenceKey::null_key().is_null());
    }

    #[test]
    fn test_reference_key_ordering_is_by_parent_first() {
        let a = PfReferenceKey::new(&PfConceptKey::new("a", "1.0.0"), "z");
        let b = PfReferenceKey::new(&PfConceptKey::new("b", "1.0.0"), "a");
        assert!(a < b);
    }

    #[test]
    fn test_reference_key_validation() {
        let key = PfReferenceKey::new(&PfConceptKey::new("parent", "1.0"), "child");
        assert!(key.validate().is_err());
        let key = PfReferenceKey::new(&PfConceptKey::new("parent", "1.0.0"), "child name");
        assert!(key.validate().is_err());
    }
}
