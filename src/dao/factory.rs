use super::{DefaultPfDao, PfDao};
use crate::config::DaoParameters;
use crate::constants::DEFAULT_DAO_PLUGIN;
use crate::error::{PfModelError, PfModelResult, ResponseStatus};
use crate::persistence::PersistenceCatalog;
use std::sync::Arc;
use tracing::error;

/// Creates and initialises the DAO named by `DaoParameters::plugin`
pub struct PfDaoFactory;

impl PfDaoFactory {
    pub async fn create_pf_dao(
        params: &DaoParameters,
        catalog: Arc<PersistenceCatalog>,
    ) -> PfModelResult<DefaultPfDao> {
        match params.plugin.as_str() {
            DEFAULT_DAO_PLUGIN => {
                let mut dao = DefaultPfDao::new(catalog);
                dao.init(params).await?;
                Ok(dao)
            }
            plugin => {
                let message = format!("Policy Framework DAO class not found for DAO plugin \"{plugin}\"");
                error!("{message}");
                Err(PfModelError::model(ResponseStatus::InternalServerError, message))
            }
        }
    }
}
