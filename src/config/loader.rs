//! Configuration Loader
//!
//! Environment-aware loading of `policy-models.yaml`. The file holds a base
//! configuration plus optional `development`/`test`/`production` sections
//! whose values are merged over the base for the active environment.

use super::PolicyModelsConfig;
use super::DaoParameters;
use crate::constants::env;
use crate::error::{PfModelError, PfModelResult};
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const CONFIG_FILE_NAMES: &[&str] = &["policy-models.yaml", "policy-models.yml"];
const ENVIRONMENTS: &[&str] = &["development", "test", "production"];
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Loaded, validated configuration for one environment
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PolicyModelsConfig,
    environment: String,
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection from `./config`
    pub fn load() -> PfModelResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    pub fn load_from_directory(config_dir: Option<PathBuf>) -> PfModelResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load from a directory with an explicit environment, without touching
    /// process-wide environment variables other than `DATABASE_URL`
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> PfModelResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));
        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory)?;
        let yaml = Self::read_config_file_safely(&config_file)?;
        let mut manager = Self::from_yaml_str(&yaml, environment)?;

        if let Ok(url) = std::env::var(env::DATABASE_URL) {
            debug!("Overriding database url from {}", env::DATABASE_URL);
            manager.config.dao.jdbc_properties.url = url;
        }
        manager.config_file = Some(config_file);

        crate::log_dao!(info, "Configuration loaded",
            environment: environment,
            persistence_unit: manager.config.dao.persistence_unit.clone(),
            plugin: manager.config.dao.plugin.clone()
        );

        Ok(Arc::new(manager))
    }

    /// Parse, merge and validate configuration from YAML text
    pub fn from_yaml_str(yaml: &str, environment: &str) -> PfModelResult<ConfigManager> {
        let mut yaml_data: YamlValue = serde_yaml::from_str(yaml)
            .map_err(|e| PfModelError::Configuration(format!("invalid YAML: {e}")))?;

        if let Some(overrides) = yaml_data.get(environment).cloned() {
            debug!("Applying environment-specific overrides for: {}", environment);
            Self::merge_yaml_values(&mut yaml_data, overrides);
        }

        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for name in ENVIRONMENTS {
                map.remove(*name);
            }
        }

        let config: PolicyModelsConfig = serde_yaml::from_value(yaml_data).map_err(|e| {
            PfModelError::Configuration(format!("Failed to deserialize configuration: {e}"))
        })?;
        config.dao.validate()?;

        let manager = ConfigManager {
            config,
            environment: environment.to_string(),
            config_file: None,
        };
        debug!("Configuration: {}", manager.debug_config());
        Ok(manager)
    }

    pub fn parameters(&self) -> &DaoParameters {
        &self.config.dao
    }

    pub fn config(&self) -> &PolicyModelsConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Configuration as JSON with credentials masked
    pub fn debug_config(&self) -> serde_json::Value {
        let mut json = serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null);
        Self::sanitize_json_recursive(&mut json, &["password", "secret", "token", "credential"]);
        json
    }

    fn detect_environment() -> String {
        std::env::var(env::ENVIRONMENT)
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn find_config_file(config_directory: &Path) -> PfModelResult<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| config_directory.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| {
                PfModelError::Configuration(format!(
                    "no {} found in {}",
                    CONFIG_FILE_NAMES.join(" or "),
                    config_directory.display()
                ))
            })
    }

    fn read_config_file_safely(path: &Path) -> PfModelResult<String> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            PfModelError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(PfModelError::Configuration(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(PfModelError::Configuration(format!(
                "{} is larger than {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }
        std::fs::read_to_string(path)
            .map_err(|e| PfModelError::Configuration(format!("cannot read {}: {e}", path.display())))
    }

    /// Recursively merge `overrides` into `base`; mappings merge, everything else replaces
    fn merge_yaml_values(base: &mut YamlValue, overrides: YamlValue) {
        match (base, overrides) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    match base_map.get_mut(&key) {
                        Some(existing) => Self::merge_yaml_values(existing, value),
                        None => {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
            (base, overrides) => *base = overrides,
        }
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    if sensitive_patterns.iter().any(|p| key_lower.contains(p)) {
                        if !val.is_null() {
                            *val = serde_json::Value::String("[MASKED]".to_string());
                        }
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items.iter_mut() {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SchemaGeneration;
    use std::io::Write;

    const YAML: &str = r#"
dao:
  plugin: DefaultPfDao
  persistence_unit: PolicyModels
  jdbc_properties:
    driver: postgres
    url: postgres://localhost:5432/policyadmin
    user: policy_user
    password: policy_password
  pool:
    max_connections: 20
test:
  dao:
    jdbc_properties:
      driver: sqlite
      url: "sqlite:policy_models?mode=memory&cache=shared"
    schema_generation: drop-and-create
"#;

    #[test]
    fn test_base_configuration() {
        let manager = ConfigManager::from_yaml_str(YAML, "development").unwrap();
        let params = manager.parameters();
        assert_eq!(params.persistence_unit.as_deref(), Some("PolicyModels"));
        assert_eq!(params.jdbc_properties.driver.as_deref(), Some("postgres"));
        assert_eq!(params.pool.max_connections, 20);
        assert_eq!(params.schema_generation, SchemaGeneration::None);
        assert_eq!(manager.environment(), "development");
    }

    #[test]
    fn test_environment_overrides_merge_over_base() {
        let manager = ConfigManager::from_yaml_str(YAML, "test").unwrap();
        let params = manager.parameters();
        assert_eq!(params.jdbc_properties.driver.as_deref(), Some("sqlite"));
        assert_eq!(
            params.jdbc_properties.url,
            "sqlite:policy_models?mode=memory&cache=shared"
        );
        // untouched siblings survive the merge
        assert_eq!(params.jdbc_properties.user.as_deref(), Some("policy_user"));
        assert_eq!(params.pool.max_connections, 20);
        assert_eq!(params.schema_generation, SchemaGeneration::DropAndCreate);
    }

    #[test]
    fn test_debug_config_masks_password() {
        let manager = ConfigManager::from_yaml_str(YAML, "development").unwrap();
        let json = manager.debug_config();
        assert_eq!(json["dao"]["jdbc_properties"]["password"], "[MASKED]");
        assert_eq!(json["dao"]["jdbc_properties"]["user"], "policy_user");
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let err = ConfigManager::from_yaml_str("dao: [1, 2]", "development").unwrap_err();
        assert!(matches!(err, PfModelError::Configuration(_)));

        let yaml = "dao:\n  pool:\n    max_connections: 0\n";
        assert!(ConfigManager::from_yaml_str(yaml, "development").is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("policy-models.yaml")).unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let manager =
            ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test").unwrap();
        assert_eq!(manager.parameters().persistence_unit.as_deref(), Some("PolicyModels"));
        assert!(manager.config_file().unwrap().ends_with("policy-models.yaml"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
            .unwrap_err();
        assert!(err.to_string().contains("policy-models.yaml"));
    }
}
