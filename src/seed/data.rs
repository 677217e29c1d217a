use crate::model::{Application, ImportMode, NewApplication, UserContext};
use crate::store::traits::Store;
use anyhow::{Context, Result};

/// Demo portfolio shipped with the binary
const DEMO_PORTFOLIO: &str = include_str!("portfolio.json");

/// Parse the bundled demo portfolio, attributed to the system user
pub fn demo_applications() -> Result<Vec<Application>> {
    let records: Vec<NewApplication> =
        serde_json::from_str(DEMO_PORTFOLIO).context("Failed to parse demo portfolio")?;
    let system = UserContext::system();

    records
        .into_iter()
        .map(|record| {
            record
                .into_imported(&system)
                .context("Invalid demo portfolio record")
        })
        .collect()
}

/// Load the demo portfolio into an empty store. Returns how many
/// applications were inserted; a store that already holds data is left as is.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<usize> {
    let existing = store.count_applications().await?;
    if existing > 0 {
        log::debug!("Skipping seed data, store already holds {} applications", existing);
        return Ok(0);
    }

    let applications = demo_applications()?;
    let outcome = store
        .import_applications(applications, ImportMode::Upsert)
        .await?;

    log::info!("Seeded {} demo applications", outcome.added);
    Ok(outcome.added)
}
