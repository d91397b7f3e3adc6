use crate::concept::PfConcept;
use crate::keys::{KeyShape, PfConceptKey, PfKey, PfReferenceTimestampKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Deployment,
    Undeployment,
}

/// One deployment action on a policy. The key's parent is the policy, its
/// local name the PDP group acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAudit {
    pub key: PfReferenceTimestampKey,
    pub pdp_type: String,
    pub action: AuditAction,
    pub user: String,
}

impl PolicyAudit {
    pub fn new(
        policy: &PfConceptKey,
        pdp_group: impl Into<String>,
        time_stamp: DateTime<Utc>,
        pdp_type: impl Into<String>,
        action: AuditAction,
        user: impl Into<String>,
    ) -> Self {
        Self {
            key: PfReferenceTimestampKey::from_parent(policy, pdp_group, time_stamp),
            pdp_type: pdp_type.into(),
            action,
            user: user.into(),
        }
    }

    pub fn pdp_group(&self) -> &str {
        self.key.reference_key().local_name()
    }
}

impl PfConcept for PolicyAudit {
    const ENTITY_NAME: &'static str = "PolicyAudit";
    const KEY_SHAPE: KeyShape = KeyShape::ReferenceTimestamp;

    fn key(&self) -> PfKey {
        self.key.clone().into()
    }
}
