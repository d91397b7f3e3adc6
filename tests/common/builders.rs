//! Test entities and fixed instants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use policy_models::error::CopyError;
use policy_models::keys::{KeyShape, PfConceptKey, PfKey};
use policy_models::models::{AuditAction, PdpStatistics, PolicyAudit, ToscaPolicyType, ToscaProperty};
use policy_models::PfConcept;
use serde::{Deserialize, Serialize};

/// Concept whose defensive copy fails when `fragile` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragileConcept {
    pub key: PfConceptKey,
    pub fragile: bool,
}

impl PfConcept for FragileConcept {
    const ENTITY_NAME: &'static str = "FragileConcept";
    const KEY_SHAPE: KeyShape = KeyShape::Concept;

    fn key(&self) -> PfKey {
        self.key.clone().into()
    }

    fn copy_concept(&self) -> Result<Self, CopyError> {
        if self.fragile {
            Err(CopyError::new(Self::ENTITY_NAME, "fragile instance"))
        } else {
            Ok(self.clone())
        }
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

pub fn at_minute(minute: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minute)
}

pub fn policy_type(name: &str, version: &str) -> ToscaPolicyType {
    ToscaPolicyType::new(name, version).with_description(format!("{name} at {version}"))
}

pub fn property(parent: &ToscaPolicyType, name: &str) -> ToscaProperty {
    ToscaProperty::new(&parent.key, name, PfConceptKey::new("string", "1.0.0"))
}

pub fn statistics(pdp: &str, minute: i64) -> PdpStatistics {
    PdpStatistics::new(pdp, "1.0.0", at_minute(minute), "defaultGroup", "apex")
}

pub fn audit(policy: &PfConceptKey, group: &str, minute: i64) -> PolicyAudit {
    PolicyAudit::new(policy, group, at_minute(minute), "apex", AuditAction::Deployment, "operator")
}
