//! DAO over a caller-owned connection or transaction.

use super::session::PfSession;
use super::PfDao;
use crate::concept::PfConcept;
use crate::config::DaoParameters;
use crate::error::PfModelResult;
use crate::filter::PfFilterParameters;
use crate::keys::{PfConceptKey, PfKey, PfReferenceKey};
use crate::persistence::PersistenceUnit;
use async_trait::async_trait;
use sqlx::AnyConnection;
use tokio::sync::Mutex;

/// Run `$body` in a session over the borrowed connection
macro_rules! with_session {
    ($dao:expr, |$session:ident| $body:expr) => {{
        let mut conn = $dao.conn.lock().await;
        let mut $session = PfSession::new(&mut **conn, &$dao.unit);
        let result = $body.await;
        result
    }};
}

/// A [`PfDao`] that runs every operation on a connection it is handed.
///
/// No transaction is begun or committed here. Hand it `&mut *tx` of an open
/// transaction to make several DAO calls atomic, then commit or roll back the
/// transaction once the proxy is dropped. Calls are serialised on the
/// connection; sharing the proxy between tasks does not make the transaction
/// safe to interleave with other work on it.
///
/// `init` and `close` do nothing: the connection's lifecycle belongs to the
/// caller.
pub struct ProxyDao<'c> {
    conn: Mutex<&'c mut AnyConnection>,
    unit: PersistenceUnit,
}

impl<'c> ProxyDao<'c> {
    pub fn new(conn: &'c mut AnyConnection, unit: PersistenceUnit) -> Self {
        Self {
            conn: Mutex::new(conn),
            unit,
        }
    }

    pub fn unit(&self) -> &PersistenceUnit {
        &self.unit
    }
}

#[async_trait]
impl<'c> PfDao for ProxyDao<'c> {
    async fn init(&mut self, _params: &DaoParameters) -> PfModelResult<()> {
        Ok(())
    }

    async fn close(&mut self) {}

    async fn create<T: PfConcept>(&self, obj: &T) -> PfModelResult<()> {
        with_session!(self, |session| session.upsert(obj)).map(|_| ())
    }

    async fn create_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()> {
        if objs.is_empty() {
            return Ok(());
        }
        with_session!(self, |session| session.upsert_all(objs))
    }

    async fn delete<T: PfConcept>(&self, obj: &T) -> PfModelResult<()> {
        let key = obj.key();
        with_session!(self, |session| session.delete_key::<T>(&key)).map(|_| ())
    }

    async fn delete_collection<T: PfConcept>(&self, objs: &[T]) -> PfModelResult<()> {
        if objs.is_empty() {
            return Ok(());
        }
        let keys: Vec<PfKey> = objs.iter().map(T::key).collect();
        with_session!(self, |session| session.delete_keys::<T>(&keys)).map(|_| ())
    }

    async fn delete_by_key<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<()> {
        with_session!(self, |session| session.delete_key::<T>(key)).map(|_| ())
    }

    async fn delete_by_concept_key<T: PfConcept>(&self, keys: &[PfConceptKey]) -> PfModelResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<PfKey> = keys.iter().cloned().map(PfKey::from).collect();
        with_session!(self, |session| session.delete_keys::<T>(&keys))
    }

    async fn delete_by_reference_key<T: PfConcept>(&self, keys: &[PfReferenceKey]) -> PfModelResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<PfKey> = keys.iter().cloned().map(PfKey::from).collect();
        with_session!(self, |session| session.delete_keys::<T>(&keys))
    }

    async fn delete_all<T: PfConcept>(&self) -> PfModelResult<()> {
        with_session!(self, |session| session.delete_all::<T>()).map(|_| ())
    }

    async fn get<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>> {
        with_session!(self, |session| session.get::<T>(key))
    }

    async fn get_concept<T: PfConcept>(&self, key: &PfKey) -> PfModelResult<Option<T>> {
        with_session!(self, |session| session.get_concept::<T>(key))
    }

    async fn get_all<T: PfConcept>(&self) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_all::<T>())
    }

    async fn get_all_for_parent<T: PfConcept>(&self, parent: &PfConceptKey) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_all_for_parent::<T>(parent))
    }

    async fn get_all_ordered<T: PfConcept>(&self, order_by: Option<&str>, limit: usize) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_all_ordered::<T>(order_by, limit))
    }

    async fn get_all_versions<T: PfConcept>(&self, name: &str) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_all_versions::<T>(name))
    }

    async fn get_all_versions_by_parent<T: PfConcept>(&self, parent_name: &str) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_all_versions_by_parent::<T>(parent_name))
    }

    async fn get_filtered<T: PfConcept>(
        &self,
        name: Option<&str>,
        version: Option<&str>,
    ) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_filtered::<T>(name, version))
    }

    async fn get_filtered_by_params<T: PfConcept>(&self, params: &PfFilterParameters) -> PfModelResult<Vec<T>> {
        with_session!(self, |session| session.get_filtered_by_params::<T>(params))
    }

    async fn update<T: PfConcept>(&self, obj: &T) -> PfModelResult<T> {
        with_session!(self, |session| session.update(obj))
    }

    async fn size<T: PfConcept>(&self) -> PfModelResult<u64> {
        with_session!(self, |session| session.size::<T>())
    }
}
