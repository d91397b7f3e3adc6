#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Policy Models
//!
//! Generic persistence layer for Policy Framework model entities.
//!
//! ## Overview
//!
//! Any entity implementing [`PfConcept`] can be created, read, updated,
//! deleted and queried through one [`PfDao`] without per-entity boilerplate.
//! Entities are identified by one of four key shapes:
//!
//! - [`PfConceptKey`]: name and version
//! - [`PfReferenceKey`]: parent name and version plus a local name
//! - [`PfTimestampKey`]: name, version and an instant
//! - [`PfReferenceTimestampKey`]: a reference key plus an instant
//!
//! ## Architecture
//!
//! Two DAOs implement the same trait. [`DefaultPfDao`] owns a connection pool
//! and runs each write in its own transaction. [`ProxyDao`] works on a
//! connection the caller owns, so a higher level service can span several
//! DAO calls with one transaction.
//!
//! Entity tables are named only from registered [`persistence::PersistenceUnit`]s,
//! never from caller strings. Ad-hoc queries go through the [`filter`]
//! subsystem, which picks a filter from the entity's key shape.
//!
//! ## Module Organization
//!
//! - [`keys`] - The four key shapes and their validation
//! - [`concept`] - The persisted entity contract
//! - [`persistence`] - Persistence units, entity registry and schema generation
//! - [`dao`] - The DAO trait, its two implementations and the factory
//! - [`filter`] - Filter parameters to SQL fragments, per key shape
//! - [`query_builder`] - Query templates, bind values and ordering
//! - [`models`] - Policy Framework entities, one per key shape
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use policy_models::config::ConfigManager;
//! use policy_models::dao::{PfDao, PfDaoFactory};
//! use policy_models::models::{policy_persistence_unit, ToscaPolicyType};
//! use policy_models::persistence::PersistenceCatalog;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! policy_models::logging::init_structured_logging();
//! let config = ConfigManager::load()?;
//! let catalog = Arc::new(PersistenceCatalog::new().with_unit(policy_persistence_unit("PolicyModels")));
//!
//! let dao = PfDaoFactory::create_pf_dao(config.parameters(), catalog).await?;
//! let all: Vec<ToscaPolicyType> = dao.get_all_versions("onap.policies.Monitoring").await?;
//! println!("{} versions stored", all.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Integration tests run against shared in-memory SQLite databases:
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod concept;
pub mod config;
pub mod constants;
pub mod dao;
pub mod error;
pub mod filter;
pub mod keys;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod query_builder;

pub use concept::PfConcept;
pub use config::{ConfigManager, DaoParameters};
pub use dao::{DefaultPfDao, PfDao, PfDaoFactory, ProxyDao};
pub use error::{CopyError, PfModelError, PfModelResult, ResponseStatus};
pub use filter::{PfFilter, PfFilterFactory, PfFilterParameters};
pub use keys::{KeyShape, PfConceptKey, PfKey, PfReferenceKey, PfReferenceTimestampKey, PfTimestampKey};
pub use persistence::{PersistenceCatalog, PersistenceUnit, SchemaGeneration};
