//! # Generic DAO
//!
//! Key-typed CRUD and filtered queries over any [`PfConcept`] registered in a
//! persistence unit.
//!
//! Two implementations share the [`PfDao`] contract:
//!
//! - [`DefaultPfDao`] owns a connection pool. Every call acquires its own
//!   connection and every write runs in its own transaction, so one instance
//!   can be shared freely between tasks.
//! - [`ProxyDao`] borrows a connection the caller already holds, typically an
//!   open transaction spanning several DAO calls. It never begins, commits or
//!   rolls back; the caller owns the transaction boundary.
//!
//! Both delegate the actual statements to one internal session type, so their
//! behaviour is identical apart from connection handling.
//!
//! Keys select rows by shape: a [`PfKey`] must have the shape the entity
//! declares in [`PfConcept::KEY_SHAPE`], otherwise the call fails with
//! [`PfModelError::InvalidArgument`](crate::error::PfModelError::InvalidArgument).
//!
//! ```rust,no_run
//! use policy_models::dao::{PfDao, PfDaoFactory};
//! use policy_models::models::{policy_persistence_unit, ToscaPolicyType};
//! use policy_models::persistence::{PersistenceCatalog, SchemaGeneration};
//! use policy_models::config::DaoParameters;
//! use std::sync::Arc;
//!
//! # async fn example() -> policy_models::error::PfModelResult<()> {
//! let catalog = Arc::new(PersistenceCatalog::new().with_unit(policy_persistence_unit("PolicyModels")));
//! let params = DaoParameters::new("PolicyModels", "sqlite:policy?mode=memory&cache=shared")
//!     .with_schema_generation(SchemaGeneration::Create);
//!
//! let dao = PfDaoFactory::create_pf_dao(&params, catalog).await?;
//! let policy_type = ToscaPolicyType::new("onap.policies.Monitoring", "1.0.0");
//! dao.create(&policy_type).await?;
//! assert_eq!(dao.size::<ToscaPolicyType>().await?, 1);
//! # Ok(())
//! # }
//! ```

pub mod default_dao;
pub mod factory;
pub mod proxy_dao;
mod queries;
mod session;

pub use default_dao::DefaultPfDao;
pub use factory::PfDaoFactory;
pub use proxy_dao::ProxyDao;

use crate::concept::PfConcept;
use crate::config::DaoParameters;
use crate::error::PfModelResult;
use crate::filter::PfFilterParameters;
use crate::keys::{PfConceptKey, PfKey, PfReferenceKey};
use async_trait::async_trait;

#[async_trait]
pub trait PfDao: Send + Sync {
    /// Prepare the DAO for use with the given parameters
    async fn init(&mut self, params: &DaoParameters) -> PfModelResult<()>;

    /// Release held resources; calling it again is harmless
    async fn close(&mut self);

    /// Insert `obj`, or replace the stored instance with the same key
    async fn create<T: PfConcept>(&self, obj: &T) -> PfModelResult<()>;

    /// Upsert every object in one transaction
    async fn create_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()>;

    async fn delete<T: PfConcept>(&self, obj: &T) -> PfModelResult<()>;

    async fn delete_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()>;

    /// Delete the row addressed by `key`
    async fn delete_by_key<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<()>;

    /// Delete by each key in one transaction, returning the total rows deleted.
    /// Either every delete applies or none does.
    async fn delete_by_concept_key<T: PfConcept>(&self, keys: &[PfConceptKey]) -> PfModelResult<u64>;

    async fn delete_by_reference_key<T: PfConcept>(&self, keys: &[PfReferenceKey]) -> PfModelResult<u64>;

    async fn delete_all<T: PfConcept>(&self) -> PfModelResult<()>;

    /// Primary key lookup, always read from the store
    async fn get<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>>;

    /// Equality lookup by a concept or reference key. More than one matching
    /// row is an error.
    async fn get_concept<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>>;

    async fn get_all<T: PfConcept>(&self) -> PfModelResult<Vec<T>>;

    /// Children of `parent`, for entities with a parent key
    async fn get_all_for_parent<T: PfConcept>(&self, parent: &PfConceptKey) -> PfModelResult<Vec<T>>;

    /// All rows, ordered when `order_by` names key columns and limited when
    /// `limit` is positive
    async fn get_all_ordered<T: PfConcept>(&self, order_by: Option<&str>, limit: usize) -> PfModelResult<Vec<T>>;

    async fn get_all_versions<T: PfConcept>(&self, name: &str) -> PfModelResult<Vec<T>>;

    async fn get_all_versions_by_parent<T: PfConcept>(&self, parent_name: &str) -> PfModelResult<Vec<T>>;

    /// `None` name lists everything, `None` version lists every version of
    /// `name`, otherwise the single matching instance if present
    async fn get_filtered<T: PfConcept>(&self, name: Option<&str>, version: Option<&str>)
        -> PfModelResult<Vec<T>>;

    /// Rows matching `params`, returned as decoded from the store
    async fn get_filtered_by_params<T: PfConcept>(&self, params: &PfFilterParameters) -> PfModelResult<Vec<T>>;

    /// Upsert `obj` and return the stored instance
    async fn update<T: PfConcept>(&self, obj: &T) -> PfModelResult<T>;

    async fn size<T: PfConcept>(&self) -> PfModelResult<u64>;
}
