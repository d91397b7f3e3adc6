use super::timestamp_key::truncate_to_millis;
use super::{PfConceptKey, PfReferenceKey};
use crate::error::PfModelResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference key stamped with a point in time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PfReferenceTimestampKey {
    reference_key: PfReferenceKey,
    time_stamp: DateTime<Utc>,
}

impl PfReferenceTimestampKey {
    pub fn new(reference_key: PfReferenceKey, time_stamp: DateTime<Utc>) -> Self {
        Self {
            reference_key,
            time_stamp: truncate_to_millis(time_stamp),
        }
    }

    pub fn from_parent(parent: &PfConceptKey, local_name: impl Into<String>, time_stamp: DateTime<Utc>) -> Self {
        Self::new(PfReferenceKey::new(parent, local_name), time_stamp)
    }

    pub fn reference_key(&self) -> &PfReferenceKey {
        &self.reference_key
    }

    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }

    pub fn id(&self) -> String {
        format!(
            "{}:{}",
            self.reference_key.id(),
            self.time_stamp.timestamp_millis()
        )
    }

    pub fn is_null(&self) -> bool {
        self.reference_key.is_null() && self.time_stamp.timestamp_millis() == 0
    }

    pub fn validate(&self) -> PfModelResult<()> {
        self.reference_key.validate()
    }
}

impl fmt::Display for PfReferenceTimestampKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reference_timestamp_key_id() {
        let time = Utc.timestamp_millis_opt(42).unwrap();
        let key = PfReferenceTimestampKey::from_parent(&PfConceptKey::new("policy", "1.0.0"), "pdpGroup", time);
        assert_eq!(key.id(), "policy:1.0.0:NULL:pdpGroup:42");
        assert_eq!(key.reference_key().local_name(), "pdpGroup");
        assert!(key.validate().is_ok());
        assert!(!key.is_null());
    }
}
