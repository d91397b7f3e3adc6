//! The contract every persisted entity fulfils.

use crate::error::CopyError;
use crate::keys::{KeyShape, PfKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A persisted Policy Framework concept.
///
/// `ENTITY_NAME` is the name the entity is registered under in a
/// [`PersistenceUnit`](crate::persistence::PersistenceUnit) and doubles as its
/// table name, so it must be a plain SQL identifier. The key returned by
/// [`key`](PfConcept::key) must have shape `KEY_SHAPE`.
///
/// Concepts are stored as their key columns plus a JSON body, so the
/// serialized form must round-trip.
pub trait PfConcept:
    Clone + Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    const ENTITY_NAME: &'static str;
    const KEY_SHAPE: KeyShape;

    fn key(&self) -> PfKey;

    /// Defensive copy handed to DAO callers in place of the decoded instance
    fn copy_concept(&self) -> Result<Self, CopyError> {
        Ok(self.clone())
    }
}
