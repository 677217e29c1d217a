use crate::model::{
    Application, ApplicationFilter, EaCategoryCount, Id, ImportMode, ImportOutcome,
};
use anyhow::Result;

#[async_trait::async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get_application(&self, id: &str) -> Result<Option<Application>>;
    /// Matching applications in identifier order
    async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>>;
    /// Successor of the highest `APP-NNN` identifier in use
    async fn next_application_id(&self) -> Result<Id>;
    async fn insert_application(&self, application: &Application) -> Result<()>;
    /// Write back the attribute columns of a live record. False when the id
    /// is unknown or the record has been decommissioned meanwhile.
    async fn update_application(&self, application: &Application) -> Result<bool>;
    /// Persist status and decommission fields, only if the record is still live
    async fn decommission_application(&self, application: &Application) -> Result<bool>;
    async fn count_applications(&self) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Live (non-decommissioned) application counts per EA group/category
    async fn count_by_ea_category(&self) -> Result<Vec<EaCategoryCount>>;
    /// Apply an import in one transaction. Existing rows keep their
    /// decommission fields and creation audit.
    async fn import_applications(
        &self,
        applications: Vec<Application>,
        mode: ImportMode,
    ) -> Result<ImportOutcome>;
}

pub trait Store: ApplicationStore + PortfolioStore + Send + Sync {}
