use crate::concept::PfConcept;
use crate::keys::{KeyShape, PfKey, PfTimestampKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deployment and execution counters reported by one PDP at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpStatistics {
    pub key: PfTimestampKey,
    pub pdp_group_name: String,
    pub pdp_sub_group_name: String,
    #[serde(default)]
    pub policy_deploy_count: i64,
    #[serde(default)]
    pub policy_deploy_success_count: i64,
    #[serde(default)]
    pub policy_deploy_fail_count: i64,
    #[serde(default)]
    pub policy_executed_count: i64,
    #[serde(default)]
    pub policy_executed_success_count: i64,
    #[serde(default)]
    pub policy_executed_fail_count: i64,
}

impl PdpStatistics {
    pub fn new(
        pdp_instance_id: impl Into<String>,
        version: impl Into<String>,
        time_stamp: DateTime<Utc>,
        pdp_group_name: impl Into<String>,
        pdp_sub_group_name: impl Into<String>,
    ) -> Self {
        Self {
            key: PfTimestampKey::new(pdp_instance_id, version, time_stamp),
            pdp_group_name: pdp_group_name.into(),
            pdp_sub_group_name: pdp_sub_group_name.into(),
            policy_deploy_count: 0,
            policy_deploy_success_count: 0,
            policy_deploy_fail_count: 0,
            policy_executed_count: 0,
            policy_executed_success_count: 0,
            policy_executed_fail_count: 0,
        }
    }

    /// Record one deployment outcome
    pub fn record_deployment(&mut self, success: bool) {
        self.policy_deploy_count += 1;
        if success {
            self.policy_deploy_success_count += 1;
        } else {
            self.policy_deploy_fail_count += 1;
        }
    }

    /// Record one execution outcome
    pub fn record_execution(&mut self, success: bool) {
        self.policy_executed_count += 1;
        if success {
            self.policy_executed_success_count += 1;
        } else {
            self.policy_executed_fail_count += 1;
        }
    }
}

impl PfConcept for PdpStatistics {
    const ENTITY_NAME: &'static str = "PdpStatistics";
    const KEY_SHAPE: KeyShape = KeyShape::Timestamp;

    fn key(&self) -> PfKey {
        self.key.clone().into()
    }
}
