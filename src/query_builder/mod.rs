//! # Query Builder System
//!
//! Constrained dynamic SQL for the generic DAO.
//!
//! ## Overview
//!
//! Every DAO query starts life as a [`QueryTemplate`] containing the
//! `__TABLE__` token. A template is rendered into a [`NamedQuery`] only with an
//! [`EntityName`](crate::persistence::EntityName), which can only be obtained
//! from a persistence unit's entity registry, so the table name is never
//! caller-supplied text.
//!
//! Named queries carry `:name` placeholders plus their [`BindValue`]s and are
//! translated to positional `$n` parameters (accepted by both PostgreSQL and
//! SQLite) just before execution.
//!
//! ## Key Components
//!
//! - [`bind`] - Values bound to placeholders
//! - [`template`] - Table templating and named placeholder translation
//! - [`order`] - Validated ORDER BY clauses and sort order
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let mut query = QueryTemplate::new("SELECT body FROM __TABLE__ WHERE name = :name")
//!     .render(&entity_name);
//! query.set_parameter("name", "onap.policies.Monitoring");
//! let (sql, values) = query.to_positional()?;
//! ```

pub mod bind;
pub mod order;
pub mod template;

pub use bind::BindValue;
pub use order::{order_clause, order_clause_with_default, SortOrder};
pub use template::{NamedQuery, QueryTemplate};
