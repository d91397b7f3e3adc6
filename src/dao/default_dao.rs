//! Pool-owning DAO: a connection per call and a transaction per write.

use super::session::PfSession;
use super::PfDao;
use crate::concept::PfConcept;
use crate::config::DaoParameters;
use crate::error::{PfModelError, PfModelResult, ResponseStatus};
use crate::filter::PfFilterParameters;
use crate::keys::{PfConceptKey, PfKey, PfReferenceKey};
use crate::persistence::{generate_schema, PersistenceCatalog, PersistenceUnit};
use crate::log_dao;
use async_trait::async_trait;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Run `$body` in a session over a pooled connection
macro_rules! read_session {
    ($dao:expr, |$session:ident| $body:expr) => {{
        let state = $dao.state()?;
        let mut conn = state.pool.acquire().await?;
        let mut $session = PfSession::new(&mut *conn, &state.unit);
        let result = $body.await;
        result
    }};
}

/// Run `$body` in a session over a new transaction, committing on success.
/// An error drops the transaction, which rolls it back.
macro_rules! write_session {
    ($dao:expr, |$session:ident| $body:expr) => {{
        let state = $dao.state()?;
        let mut tx = state.pool.begin().await?;
        let mut $session = PfSession::new(&mut *tx, &state.unit);
        let result = $body.await?;
        tx.commit().await?;
        PfModelResult::Ok(result)
    }};
}

#[derive(Debug)]
struct DaoState {
    pool: AnyPool,
    unit: PersistenceUnit,
}

/// The default [`PfDao`]. Create with [`DefaultPfDao::new`], then
/// [`init`](PfDao::init) before use; every other operation fails with
/// [`PfModelError::NotInitialized`] until then.
#[derive(Debug)]
pub struct DefaultPfDao {
    catalog: Arc<PersistenceCatalog>,
    state: Option<DaoState>,
}

impl DefaultPfDao {
    pub fn new(catalog: Arc<PersistenceCatalog>) -> Self {
        Self { catalog, state: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The pool opened by `init`, for callers that need their own transaction
    /// (for example to drive a [`ProxyDao`](super::ProxyDao))
    pub fn pool(&self) -> PfModelResult<&AnyPool> {
        Ok(&self.state()?.pool)
    }

    fn state(&self) -> PfModelResult<&DaoState> {
        self.state.as_ref().ok_or(PfModelError::NotInitialized)
    }

    async fn open(&self, params: &DaoParameters, unit_name: &str) -> PfModelResult<DaoState> {
        let unit = self
            .catalog
            .unit(unit_name)
            .ok_or_else(|| PfModelError::InvalidArgument(format!("persistence unit \"{unit_name}\" is not registered")))?;
        params.validate()?;
        let url = params.connection_url()?;

        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(params.pool.max_connections)
            .min_connections(params.pool.min_connections)
            .acquire_timeout(params.pool.acquire_timeout())
            .connect(&url)
            .await?;

        let schema = match pool.acquire().await {
            Ok(mut conn) => generate_schema(&mut *conn, &unit, params.schema_generation).await,
            Err(e) => Err(e.into()),
        };

        match schema {
            Ok(()) => Ok(DaoState { pool, unit }),
            Err(e) => {
                pool.close().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl PfDao for DefaultPfDao {
    async fn init(&mut self, params: &DaoParameters) -> PfModelResult<()> {
        let Some(unit_name) = params.persistence_unit.as_deref().filter(|name| !name.trim().is_empty()) else {
            let message = "Policy Framework persistence unit parameter not set";
            error!("{message}");
            return Err(PfModelError::model(ResponseStatus::InternalServerError, message));
        };

        log_dao!(debug, "Creating Policy Framework persistence unit", unit: unit_name);
        self.close().await;

        match self.open(params, unit_name).await {
            Ok(state) => {
                self.state = Some(state);
                log_dao!(debug, "Created Policy Framework persistence unit", unit: unit_name);
                Ok(())
            }
            Err(e) => {
                let message = format!("Creation of Policy Framework persistence unit \"{unit_name}\" failed");
                warn!(unit = %unit_name, error = %e, "{message}");
                Err(PfModelError::model_with_source(ResponseStatus::InternalServerError, message, e))
            }
        }
    }

    async fn close(&mut self) {
        if let Some(state) = self.state.take() {
            state.pool.close().await;
            log_dao!(debug, "Closed Policy Framework persistence unit", unit: state.unit.name());
        }
    }

    async fn create<T: PfConcept>(&self, obj: &T) -> PfModelResult<()> {
        write_session!(self, |session| session.upsert(obj)).map(|_| ())
    }

    async fn create_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()> {
        if objs.is_empty() {
            return Ok(());
        }
        write_session!(self, |session| session.upsert_all(objs))
    }

    async fn delete<T: PfConcept>(&self, obj: &T) -> PfModelResult<()> {
        let key = obj.key();
        write_session!(self, |session| session.delete_key::<T>(&key)).map(|_| ())
    }

    async fn delete_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()> {
        if objs.is_empty() {
            return Ok(());
        }
        let keys: Vec<PfKey> = objs.iter().map(T::key).collect();
        write_session!(self, |session| session.delete_keys::<T>(&keys)).map(|_| ())
    }

    async fn delete_by_key<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<()> {
        write_session!(self, |session| session.delete_key::<T>(key)).map(|_| ())
    }

    async fn delete_by_concept_key<T: PfConcept>(&self, keys: &[PfConceptKey]) -> PfModelResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<PfKey> = keys.iter().cloned().map(PfKey::from).collect();
        write_session!(self, |session| session.delete_keys::<T>(&keys))
    }

    async fn delete_by_reference_key<T: PfConcept>(&self, keys: &[PfReferenceKey]) -> PfModelResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<PfKey> = keys.iter().cloned().map(PfKey::from).collect();
        write_session!(self, |session| session.delete_keys::<T>(&keys))
    }

    async fn delete_all<T: PfConcept>(&self) -> PfModelResult<()> {
        let deleted = write_session!(self, |session| session.delete_all::<T>())?;
        debug!(entity = T::ENTITY_NAME, deleted, "deleted all rows");
        Ok(())
    }

    async fn get<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>> {
        read_session!(self, |session| session.get::<T>(key))
    }

    async fn get_concept<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>> {
        read_session!(self, |session| session.get_concept::<T>(key))
    }

    async fn get_all<T: PfConcept>(&self) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_all::<T>())
    }

    async fn get_all_for_parent<T: PfConcept>(&self, parent: &PfConceptKey) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_all_for_parent::<T>(parent))
    }

    async fn get_all_ordered<T: PfConcept>(&self, order_by: Option<&str>, limit: usize) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_all_ordered::<T>(order_by, limit))
    }

    async fn get_all_versions<T: PfConcept>(&self, name: &str) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_all_versions::<T>(name))
    }

    async fn get_all_versions_by_parent<T: PfConcept>(&self, parent_name: &str) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_all_versions_by_parent::<T>(parent_name))
    }

    async fn get_filtered<T: PfConcept>(
        &self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_filtered::<T>(name, version))
    }

    async fn get_filtered_by_params<T: PfConcept>(&self, params: &PfFilterParameters) -> PfModelResult<Vec<T>> {
        read_session!(self, |session| session.get_filtered_by_params::<T>(params))
    }

    async fn update<T: PfConcept>(&self, obj: &T) -> PfModelResult<T> {
        write_session!(self, |session| session.update(obj))
    }

    async fn size<T: PfConcept>(&self) -> PfModelResult<u64> {
        read_session!(self, |session| session.size::<T>())
    }
}
