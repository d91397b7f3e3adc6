use super::{validate_name, validate_version, version_segments};
use crate::constants::keys::{NULL_KEY_NAME, NULL_KEY_VERSION};
use crate::error::{PfModelError, PfModelResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Name and version identity of a top-level concept
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PfConceptKey {
    name: String,
    version: String,
}

impl PfConceptKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `NULL:0.0.0` key
    pub fn null_key() -> Self {
        Self::new(NULL_KEY_NAME, NULL_KEY_VERSION)
    }

    /// Parse an id of the form `name:version`
    pub fn from_id(id: &str) -> PfModelResult<Self> {
        match id.split_once(':') {
            Some((name, version)) if !name.is_empty() && !version.contains(':') => {
                let key = Self::new(name, version);
                key.validate()?;
                Ok(key)
            }
            _ => Err(PfModelError::InvalidArgument(format!(
                "id \"{id}\" is not of the form name:version"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn id(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }

    pub fn is_null(&self) -> bool {
        self.name == NULL_KEY_NAME && self.version == NULL_KEY_VERSION
    }

    pub fn validate(&self) -> PfModelResult<()> {
        validate_name("name", &self.name)?;
        validate_version("version", &self.version)
    }

    /// True if this key sorts after `other`: by name first, then numerically by version
    pub fn is_newer_than(&self, other: &PfConceptKey) -> bool {
        if self.name != other.name {
            return self.name > other.name;
        }
        match (version_segments(&self.version), version_segments(&other.version)) {
            (Some(this), Some(that)) => this.cmp(&that) == Ordering::Greater,
            _ => self.version > other.version,
        }
    }

    /// Same name and same major version
    pub fn is_compatible(&self, other: &PfConceptKey) -> bool {
        if self.name != other.name {
            return false;
        }
        match (version_segments(&self.version), version_segments(&other.version)) {
            (Some(this), Some(that)) => this[0] == that[0],
            _ => false,
        }
    }
}

impl Default for PfConceptKey {
    fn default() -> Self {
        Self::null_key()
    }
}

impl fmt::Display for PfConceptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}
