//! # Model Layer Constants
//!
//! Shared constants for key values, column names and query templating used
//! across the key, persistence, filter and DAO modules.

/// Null key values shared by every key shape
pub mod keys {
    pub const NULL_KEY_NAME: &str = "NULL";
    pub const NULL_KEY_VERSION: &str = "0.0.0";

    /// Maximum length of a key name or version column
    pub const MAX_KEY_FIELD_LENGTH: usize = 120;

    /// Width each version segment is zero-padded to in `version_sort`, the
    /// number of digits in `u64::MAX`
    pub const VERSION_SEGMENT_WIDTH: usize = 20;
}

/// Column names of the generated concept tables
pub mod columns {
    pub const NAME: &str = "name";
    pub const VERSION: &str = "version";
    pub const PARENT_KEY_NAME: &str = "parent_key_name";
    pub const PARENT_KEY_VERSION: &str = "parent_key_version";
    pub const PARENT_LOCAL_NAME: &str = "parent_local_name";
    pub const LOCAL_NAME: &str = "local_name";
    pub const TIME_STAMP: &str = "time_stamp";
    pub const VERSION_SORT: &str = "version_sort";
    pub const BODY: &str = "body";
}

/// Query templating
pub mod query {
    /// Token replaced by the registered entity table name immediately before execution
    pub const TABLE_TOKEN: &str = "__TABLE__";

    /// Prefix of named placeholders in query templates
    pub const PLACEHOLDER_PREFIX: char = ':';
}

/// Environment variables read by configuration and logging
pub mod env {
    pub const ENVIRONMENT: &str = "POLICY_MODELS_ENV";
    pub const LOG_FORMAT: &str = "POLICY_MODELS_LOG_FORMAT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Plugin name of the pool-owning DAO implementation
pub const DEFAULT_DAO_PLUGIN: &str = "DefaultPfDao";
