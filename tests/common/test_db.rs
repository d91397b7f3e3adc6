//! Shared in-memory SQLite databases for DAO integration tests.
//!
//! Each call to [`test_parameters`] names a fresh database; one pooled
//! connection is kept open so the database outlives individual operations,
//! and the pool is capped at that one connection so statements never contend
//! for shared-cache table locks.

use policy_models::config::{DaoParameters, PoolConfig};
use policy_models::dao::{DefaultPfDao, PfDao};
use policy_models::models::policy_persistence_unit;
use policy_models::persistence::{PersistenceCatalog, SchemaGeneration};
use std::sync::Arc;
use uuid::Uuid;

use super::builders::FragileConcept;

pub const TEST_UNIT: &str = "PolicyModelsTest";

pub fn test_catalog() -> Arc<PersistenceCatalog> {
    Arc::new(
        PersistenceCatalog::new()
            .with_unit(policy_persistence_unit(TEST_UNIT).with_entity::<FragileConcept>()),
    )
}

pub fn test_parameters() -> DaoParameters {
    let url = format!(
        "sqlite:dao_test_{}?mode=memory&cache=shared",
        Uuid::new_v4().simple()
    );
    DaoParameters::new(TEST_UNIT, url)
        .with_driver("sqlite")
        .with_schema_generation(SchemaGeneration::Create)
        .with_pool(PoolConfig {
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_seconds: 5,
        })
}

/// An initialised DAO over a fresh database
pub async fn setup_dao() -> DefaultPfDao {
    let mut dao = DefaultPfDao::new(test_catalog());
    dao.init(&test_parameters())
        .await
        .expect("DAO should initialise against in-memory SQLite");
    dao
}
