//! Policy Framework entities persisted through the generic DAO.
//!
//! One entity per key shape:
//!
//! | entity | key |
//! |---|---|
//! | [`ToscaPolicyType`] | concept key |
//! | [`ToscaProperty`] | reference key, parent is the owning policy type |
//! | [`PdpStatistics`] | timestamp key |
//! | [`PolicyAudit`] | reference-timestamp key, parent is the audited policy |

pub mod pdp_statistics;
pub mod policy_audit;
pub mod tosca_policy_type;
pub mod tosca_property;

// Re-export core models for easy access
pub use pdp_statistics::PdpStatistics;
pub use policy_audit::{AuditAction, PolicyAudit};
pub use tosca_policy_type::ToscaPolicyType;
pub use tosca_property::ToscaProperty;

use crate::persistence::PersistenceUnit;

/// A persistence unit managing every entity in this module
pub fn policy_persistence_unit(name: impl Into<String>) -> PersistenceUnit {
    PersistenceUnit::new(name)
        .with_entity::<ToscaPolicyType>()
        .with_entity::<ToscaProperty>()
        .with_entity::<PdpStatistics>()
        .with_entity::<PolicyAudit>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyShape;

    #[test]
    fn test_unit_covers_every_key_shape() {
        let unit = policy_persistence_unit("PolicyModels");
        let shapes: Vec<KeyShape> = unit.entities().iter().map(|e| e.shape()).collect();
        assert_eq!(
            shapes,
            vec![
                KeyShape::Concept,
                KeyShape::Reference,
                KeyShape::Timestamp,
                KeyShape::ReferenceTimestamp
            ]
        );
        assert_eq!(unit.entity_name::<PdpStatistics>().unwrap().as_str(), "PdpStatistics");
    }
}
