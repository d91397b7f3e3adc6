use super::PfConceptKey;
use crate::error::PfModelResult;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name, version and point in time. Timestamps are held at millisecond
/// precision, matching what the store keeps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PfTimestampKey {
    name: String,
    version: String,
    time_stamp: DateTime<Utc>,
}

impl PfTimestampKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>, time_stamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            time_stamp: truncate_to_millis(time_stamp),
        }
    }

    pub fn from_concept_key(key: &PfConceptKey, time_stamp: DateTime<Utc>) -> Self {
        Self::new(key.name(), key.version(), time_stamp)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }

    pub fn concept_key(&self) -> PfConceptKey {
        PfConceptKey::new(&self.name, &self.version)
    }

    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.name,
            self.version,
            self.time_stamp.timestamp_millis()
        )
    }

    pub fn is_null(&self) -> bool {
        self.concept_key().is_null() && self.time_stamp.timestamp_millis() == 0
    }

    pub fn validate(&self) -> PfModelResult<()> {
        self.concept_key().validate()
    }
}

impl fmt::Display for PfTimestampKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

pub(crate) fn truncate_to_millis(time_stamp: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(time_stamp.timestamp_millis())
        .single()
        .unwrap_or(time_stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamp_is_truncated_to_millis() {
        let base = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let precise = base + Duration::microseconds(1_500);
        let key = PfTimestampKey::new("pdp-1", "1.0.0", precise);

        assert_eq!(key.time_stamp().timestamp_millis(), 1_700_000_000_001);
        assert_eq!(key.time_stamp().timestamp_subsec_micros() % 1000, 0);
        assert_eq!(key.id(), "pdp-1:1.0.0:1700000000001");
    }

    #[test]
    fn test_concept_key_projection() {
        let concept = PfConceptKey::new("pdp-1", "1.0.0");
        let key = PfTimestampKey::from_concept_key(&concept, Utc::now());
        assert_eq!(key.concept_key(), concept);
        assert!(key.validate().is_ok());
    }

    #[test]
    fn test_null_timestamp_key() {
        let epoch = Utc.timestamp_millis_opt(0).unwrap();
        assert!(PfTimestampKey::new("NULL", "0.0.0", epoch).is_null());
        assert!(!PfTimestampKey::new("NULL", "0.0.0", Utc::now()).is_null());
    }
}
