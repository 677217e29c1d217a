use anyhow::{Context, Result};
use itertools::Itertools;
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;

use crate::model::{
    format_application_id, Application, ApplicationFilter, EaCategoryCount, Id, ImportMode,
    ImportOutcome,
};
use crate::store::traits::{ApplicationStore, PortfolioStore, Store};

/// Writable attribute columns, in bind order
const ATTRIBUTE_COLUMNS: &[&str] = &[
    "name",
    "domain",
    "vendor",
    "type",
    "status",
    "bcg",
    "health",
    "tech_debt",
    "age",
    "tco",
    "users",
    "criticality",
    "dr",
    "eol",
    "pi_spi",
    "contract_end",
    "integration",
    "stack",
    "capability",
    "strategic",
    "persons",
    "src_avail",
    "service_hour",
    "maint_window",
    "lang",
    "os",
    "db_platform",
    "support",
    "owner",
    "biz_owner",
    "compliance",
    "stream",
    "approach",
    "assess_status",
    "assess_date",
    "wave",
    "ea_group",
    "ea_category",
    "ea_sub_category",
];

const DECOMMISSION_COLUMNS: &[&str] = &["decommissioned", "decomm_date", "decomm_reason"];
const UPDATE_AUDIT_COLUMNS: &[&str] = &["updated_at", "updated_by"];

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the SQLite database at the given URL.
    /// In-memory databases live on a single pinned connection.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite connection string: {}", database_url))?
            .create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// Fresh private in-memory store with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let store = Self::new("sqlite::memory:", 1).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn insert_sql() -> String {
    let columns = ["id", "created_at", "created_by"]
        .iter()
        .chain(ATTRIBUTE_COLUMNS)
        .chain(DECOMMISSION_COLUMNS)
        .chain(UPDATE_AUDIT_COLUMNS)
        .copied()
        .collect_vec();
    format!(
        "INSERT INTO applications ({}) VALUES ({})",
        columns.iter().join(", "),
        columns.iter().map(|_| "?").join(", ")
    )
}

/// Update of a row that is still live; retired rows are never rewritten
fn live_update_sql<'a>(columns: impl Iterator<Item = &'a &'static str>) -> String {
    format!(
        "UPDATE applications SET {} WHERE id = ? AND decommissioned = 0",
        columns.map(|c| format!("{} = ?", c)).join(", ")
    )
}

/// Import overwrite: a retired row keeps its `Decommissioned` status
fn import_update_sql() -> String {
    let assignments = ATTRIBUTE_COLUMNS
        .iter()
        .chain(UPDATE_AUDIT_COLUMNS)
        .map(|column| match *column {
            "status" => "status = CASE WHEN decommissioned = 1 THEN status ELSE ? END".to_string(),
            other => format!("{} = ?", other),
        })
        .join(", ");
    format!("UPDATE applications SET {} WHERE id = ?", assignments)
}

fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Stored lists that fail to parse read back as empty
fn decode_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn bind_attributes<'q>(query: SqliteQuery<'q>, app: &Application) -> SqliteQuery<'q> {
    query
        .bind(app.name.clone())
        .bind(app.domain.clone())
        .bind(app.vendor.clone())
        .bind(app.app_type.clone())
        .bind(app.status.clone())
        .bind(app.bcg.clone())
        .bind(app.health)
        .bind(app.tech_debt)
        .bind(app.age)
        .bind(app.tco)
        .bind(app.users)
        .bind(app.criticality.clone())
        .bind(app.dr)
        .bind(app.eol.clone())
        .bind(app.pi_spi)
        .bind(app.contract_end.clone())
        .bind(app.integration)
        .bind(encode_list(&app.stack))
        .bind(app.capability.clone())
        .bind(app.strategic)
        .bind(app.persons)
        .bind(app.src_avail)
        .bind(app.service_hour.clone())
        .bind(app.maint_window.clone())
        .bind(app.lang.clone())
        .bind(app.os.clone())
        .bind(app.db_platform.clone())
        .bind(app.support.clone())
        .bind(app.owner.clone())
        .bind(app.biz_owner.clone())
        .bind(encode_list(&app.compliance))
        .bind(app.stream.clone())
        .bind(app.approach.clone())
        .bind(app.assess_status.clone())
        .bind(app.assess_date.clone())
        .bind(app.wave)
        .bind(app.ea_group.clone())
        .bind(app.ea_category.clone())
        .bind(app.ea_sub_category.clone())
}

fn bind_decommission<'q>(query: SqliteQuery<'q>, app: &Application) -> SqliteQuery<'q> {
    query
        .bind(app.decommissioned)
        .bind(app.decomm_date)
        .bind(app.decomm_reason.clone())
}

fn bind_update_audit<'q>(query: SqliteQuery<'q>, app: &Application) -> SqliteQuery<'q> {
    query.bind(app.updated_at).bind(app.updated_by.clone())
}

fn bind_insert<'q>(query: SqliteQuery<'q>, app: &Application) -> SqliteQuery<'q> {
    let query = query
        .bind(app.id.clone())
        .bind(app.created_at)
        .bind(app.created_by.clone());
    let query = bind_attributes(query, app);
    let query = bind_decommission(query, app);
    bind_update_audit(query, app)
}

fn application_from_row(row: &SqliteRow) -> Result<Application> {
    Ok(Application {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        domain: row.try_get("domain")?,
        vendor: row.try_get("vendor")?,
        app_type: row.try_get("type")?,
        status: row.try_get("status")?,
        bcg: row.try_get("bcg")?,
        health: row.try_get("health")?,
        tech_debt: row.try_get("tech_debt")?,
        age: row.try_get("age")?,
        tco: row.try_get("tco")?,
        users: row.try_get("users")?,
        criticality: row.try_get("criticality")?,
        dr: row.try_get("dr")?,
        eol: row.try_get("eol")?,
        pi_spi: row.try_get("pi_spi")?,
        contract_end: row.try_get("contract_end")?,
        integration: row.try_get("integration")?,
        stack: decode_list(row.try_get("stack")?),
        capability: row.try_get("capability")?,
        strategic: row.try_get("strategic")?,
        persons: row.try_get("persons")?,
        src_avail: row.try_get("src_avail")?,
        service_hour: row.try_get("service_hour")?,
        maint_window: row.try_get("maint_window")?,
        lang: row.try_get("lang")?,
        os: row.try_get("os")?,
        db_platform: row.try_get("db_platform")?,
        support: row.try_get("support")?,
        owner: row.try_get("owner")?,
        biz_owner: row.try_get("biz_owner")?,
        compliance: decode_list(row.try_get("compliance")?),
        stream: row.try_get("stream")?,
        approach: row.try_get("approach")?,
        assess_status: row.try_get("assess_status")?,
        assess_date: row.try_get("assess_date")?,
        wave: row.try_get("wave")?,
        ea_group: row.try_get("ea_group")?,
        ea_category: row.try_get("ea_category")?,
        ea_sub_category: row.try_get("ea_sub_category")?,
        decommissioned: row.try_get("decommissioned")?,
        decomm_date: row.try_get("decomm_date")?,
        decomm_reason: row.try_get("decomm_reason")?,
        created_at: row.try_get("created_at")?,
        created_by: row.try_get("created_by")?,
        updated_at: row.try_get("updated_at")?,
        updated_by: row.try_get("updated_by")?,
    })
}

#[async_trait::async_trait]
impl ApplicationStore for SqliteStore {
    async fn get_application(&self, id: &str) -> Result<Option<Application>> {
        let row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch application")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(application_from_row(&row)?))
    }

    async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM applications WHERE 1 = 1");

        if !filter.show_decomm {
            builder.push(" AND decommissioned = 0");
        }
        let exact = [
            ("status", &filter.status),
            ("domain", &filter.domain),
            ("bcg", &filter.bcg),
            ("ea_group", &filter.ea_group),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                builder
                    .push(format!(" AND {} = ", column))
                    .push_bind(value.clone());
            }
        }
        builder.push(" ORDER BY LENGTH(id), id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list applications")?;

        // SQLite's LOWER() only folds ASCII, so the search runs on decoded rows
        let mut applications = Vec::with_capacity(rows.len());
        for row in &rows {
            let application = application_from_row(row)?;
            if filter.matches_search(&application) {
                applications.push(application);
            }
        }
        Ok(applications)
    }

    async fn next_application_id(&self) -> Result<Id> {
        let highest: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(CAST(SUBSTR(id, 5) AS INTEGER)), 0)
            FROM applications
            WHERE id LIKE 'APP-%'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute next application id")?;

        let next = highest
            .checked_add(1)
            .context("Application id sequence exhausted")?;
        Ok(format_application_id(next))
    }

    async fn insert_application(&self, application: &Application) -> Result<()> {
        let sql = insert_sql();
        bind_insert(sqlx::query(&sql), application)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert application {}", application.id))?;

        Ok(())
    }

    async fn update_application(&self, application: &Application) -> Result<bool> {
        let sql = live_update_sql(ATTRIBUTE_COLUMNS.iter().chain(UPDATE_AUDIT_COLUMNS));
        let query = bind_attributes(sqlx::query(&sql), application);
        let result = bind_update_audit(query, application)
            .bind(application.id.clone())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update application {}", application.id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn decommission_application(&self, application: &Application) -> Result<bool> {
        let sql = live_update_sql(
            ["status"]
                .iter()
                .chain(DECOMMISSION_COLUMNS)
                .chain(UPDATE_AUDIT_COLUMNS),
        );
        let query = sqlx::query(&sql).bind(application.status.clone());
        let query = bind_decommission(query, application);
        let result = bind_update_audit(query, application)
            .bind(application.id.clone())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to decommission application {}", application.id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_applications(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count applications")?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl PortfolioStore for SqliteStore {
    async fn count_by_ea_category(&self) -> Result<Vec<EaCategoryCount>> {
        let rows = sqlx::query(
            r#"
            SELECT ea_group, ea_category, COUNT(*) AS count
            FROM applications
            WHERE decommissioned = 0 AND ea_group IS NOT NULL AND ea_category IS NOT NULL
            GROUP BY ea_group, ea_category
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to count applications per EA category")?;

        rows.iter()
            .map(|row| {
                Ok(EaCategoryCount {
                    ea_group: row.try_get("ea_group")?,
                    ea_category: row.try_get("ea_category")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    async fn import_applications(
        &self,
        applications: Vec<Application>,
        mode: ImportMode,
    ) -> Result<ImportOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start import transaction")?;

        if mode == ImportMode::Replace {
            sqlx::query("DELETE FROM applications")
                .execute(&mut *tx)
                .await
                .context("Failed to clear applications before import")?;
        }

        let insert = insert_sql();
        let update = import_update_sql();
        let mut outcome = ImportOutcome::default();

        for app in &applications {
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM applications WHERE id = ?")
                    .bind(app.id.clone())
                    .fetch_optional(&mut *tx)
                    .await
                    .context("Failed to look up imported application")?;

            let result = if existing.is_some() {
                let query = bind_attributes(sqlx::query(&update), app);
                bind_update_audit(query, app)
                    .bind(app.id.clone())
                    .execute(&mut *tx)
                    .await
            } else {
                bind_insert(sqlx::query(&insert), app).execute(&mut *tx).await
            };

            match result {
                Ok(_) if existing.is_some() => outcome.updated += 1,
                Ok(_) => outcome.added += 1,
                Err(e) => {
                    log::warn!("Import of application {} failed: {}", app.id, e);
                    outcome.failed += 1;
                }
            }
        }

        tx.commit()
            .await
            .context("Failed to commit import transaction")?;

        Ok(outcome)
    }
}

impl Store for SqliteStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ApplicationWrite, DecommissionRequest, NewApplication, UserContext, STATUS_DECOMMISSIONED,
    };

    fn build(id: &str, name: &str, fields: ApplicationWrite) -> Application {
        NewApplication {
            id: None,
            fields: ApplicationWrite {
                name: Some(name.to_string()),
                ..fields
            },
        }
        .into_application(id.to_string(), &UserContext::system())
        .unwrap()
    }

    async fn seeded_store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        let apps = [
            build(
                "APP-001",
                "SAP S/4HANA",
                ApplicationWrite {
                    domain: Some("Finance".to_string()),
                    vendor: Some("SAP".to_string()),
                    bcg: Some("Invest".to_string()),
                    ea_group: Some("3. Core Products".to_string()),
                    ea_category: Some("3.2 Corporate & Core System".to_string()),
                    stack: Some(vec!["ABAP".to_string(), "HANA".to_string()]),
                    ..Default::default()
                },
            ),
            build(
                "APP-002",
                "Salesforce CRM",
                ApplicationWrite {
                    domain: Some("CRM".to_string()),
                    vendor: Some("Salesforce".to_string()),
                    bcg: Some("Invest".to_string()),
                    ea_group: Some("2. Services".to_string()),
                    ea_category: Some("2.1 Customer".to_string()),
                    ..Default::default()
                },
            ),
            build(
                "APP-003",
                "Core Banking AS/400",
                ApplicationWrite {
                    domain: Some("Finance".to_string()),
                    vendor: Some("IBM".to_string()),
                    status: Some("Phase-out".to_string()),
                    bcg: Some("Retire".to_string()),
                    capability: Some("Core Banking".to_string()),
                    ea_group: Some("3. Core Products".to_string()),
                    ea_category: Some("3.2 Corporate & Core System".to_string()),
                    ..Default::default()
                },
            ),
        ];
        for app in &apps {
            store.insert_application(app).await.unwrap();
        }
        store
    }

    fn ids(apps: &[Application]) -> Vec<&str> {
        apps.iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = seeded_store().await;
        let app = store.get_application("APP-001").await.unwrap().unwrap();

        assert_eq!(app.name, "SAP S/4HANA");
        assert_eq!(app.domain.as_deref(), Some("Finance"));
        assert_eq!(app.stack, vec!["ABAP".to_string(), "HANA".to_string()]);
        assert_eq!(app.health, 75);
        assert!(app.src_avail);
        assert!(!app.decommissioned);
        assert_eq!(app.created_by, "system");

        assert!(store.get_application("APP-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_combine_with_and() {
        let store = seeded_store().await;

        let all = store
            .list_applications(&ApplicationFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(&all), vec!["APP-001", "APP-002", "APP-003"]);

        let filter = ApplicationFilter {
            domain: Some("Finance".to_string()),
            bcg: Some("Invest".to_string()),
            ..Default::default()
        };
        let finance = store.list_applications(&filter).await.unwrap();
        assert_eq!(ids(&finance), vec!["APP-001"]);

        let filter = ApplicationFilter {
            status: Some("Active".to_string()),
            ..Default::default()
        };
        let active = store.list_applications(&filter).await.unwrap();
        assert!(active.iter().all(|a| a.status == "Active"));
        assert_eq!(active.len(), 2);

        let filter = ApplicationFilter {
            ea_group: Some("3. Core Products".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&store.list_applications(&filter).await.unwrap()),
            vec!["APP-001", "APP-003"]
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = seeded_store().await;

        let filter = ApplicationFilter {
            search: Some("sales".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&store.list_applications(&filter).await.unwrap()),
            vec!["APP-002"]
        );

        // vendor match
        let filter = ApplicationFilter {
            search: Some("ibm".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&store.list_applications(&filter).await.unwrap()),
            vec!["APP-003"]
        );

        // capability match
        let filter = ApplicationFilter {
            search: Some("BANKING".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&store.list_applications(&filter).await.unwrap()),
            vec!["APP-003"]
        );

        let filter = ApplicationFilter {
            search: Some("%".to_string()),
            ..Default::default()
        };
        assert!(store.list_applications(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_non_ascii_names() {
        let store = seeded_store().await;
        store
            .insert_application(&build(
                "APP-004",
                "École Registry",
                ApplicationWrite::default(),
            ))
            .await
            .unwrap();

        for term in ["École", "ÉCOLE", "école"] {
            let filter = ApplicationFilter {
                search: Some(term.to_string()),
                ..Default::default()
            };
            assert_eq!(
                ids(&store.list_applications(&filter).await.unwrap()),
                vec!["APP-004"]
            );
        }
    }

    #[tokio::test]
    async fn test_decommissioned_hidden_unless_requested() {
        let store = seeded_store().await;
        let mut app = store.get_application("APP-002").await.unwrap().unwrap();
        app.decommission(
            DecommissionRequest {
                decomm_date: Some("2025-12-31".to_string()),
                decomm_reason: Some("Replaced".to_string()),
            },
            &UserContext::system(),
        )
        .unwrap();
        assert!(store.decommission_application(&app).await.unwrap());

        let default_listing = store
            .list_applications(&ApplicationFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(&default_listing), vec!["APP-001", "APP-003"]);

        let everything = store
            .list_applications(&ApplicationFilter::everything())
            .await
            .unwrap();
        assert_eq!(everything.len(), 3);

        let stored = store.get_application("APP-002").await.unwrap().unwrap();
        assert_eq!(stored.status, STATUS_DECOMMISSIONED);
        assert_eq!(stored.decomm_date, chrono::NaiveDate::from_ymd_opt(2025, 12, 31));
        assert_eq!(stored.decomm_reason.as_deref(), Some("Replaced"));
    }

    #[tokio::test]
    async fn test_next_id_uses_numeric_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert_eq!(store.next_application_id().await.unwrap(), "APP-001");

        store
            .insert_application(&build("APP-999", "Nine", ApplicationWrite::default()))
            .await
            .unwrap();
        store
            .insert_application(&build("LEGACY-5000", "Legacy", ApplicationWrite::default()))
            .await
            .unwrap();
        assert_eq!(store.next_application_id().await.unwrap(), "APP-1000");

        store
            .insert_application(&build("APP-1000", "Thousand", ApplicationWrite::default()))
            .await
            .unwrap();
        assert_eq!(store.next_application_id().await.unwrap(), "APP-1001");

        let listing = store
            .list_applications(&ApplicationFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(&listing), vec!["APP-999", "APP-1000", "LEGACY-5000"]);
    }

    #[tokio::test]
    async fn test_next_id_reports_exhausted_sequence() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .insert_application(&build(
                "APP-9223372036854775807",
                "Last",
                ApplicationWrite::default(),
            ))
            .await
            .unwrap();

        assert!(store.next_application_id().await.is_err());
    }

    #[tokio::test]
    async fn test_stale_update_cannot_revive_decommissioned_row() {
        let store = seeded_store().await;
        let mut stale = store.get_application("APP-001").await.unwrap().unwrap();

        let mut retired = stale.clone();
        retired
            .decommission(
                DecommissionRequest {
                    decomm_date: Some("2025-12-31".to_string()),
                    decomm_reason: Some("Replaced".to_string()),
                },
                &UserContext::system(),
            )
            .unwrap();
        assert!(store.decommission_application(&retired).await.unwrap());

        stale
            .apply_update(
                ApplicationWrite {
                    health: Some(10),
                    ..Default::default()
                },
                &UserContext::default_user(),
            )
            .unwrap();
        assert!(!store.update_application(&stale).await.unwrap());
        // decommissioning twice is refused as well
        assert!(!store.decommission_application(&retired).await.unwrap());

        let stored = store.get_application("APP-001").await.unwrap().unwrap();
        assert!(stored.decommissioned);
        assert_eq!(stored.status, STATUS_DECOMMISSIONED);
        assert_eq!(stored.decomm_date, chrono::NaiveDate::from_ymd_opt(2025, 12, 31));
        assert_eq!(stored.health, 75);
    }

    #[tokio::test]
    async fn test_update_unknown_id_reports_false() {
        let store = SqliteStore::in_memory().await.unwrap();
        let ghost = build("APP-404", "Ghost", ApplicationWrite::default());
        assert!(!store.update_application(&ghost).await.unwrap());
        assert!(!store.decommission_application(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_ea_category_skips_decommissioned() {
        let store = seeded_store().await;
        let mut app = store.get_application("APP-003").await.unwrap().unwrap();
        app.decommission(
            DecommissionRequest {
                decomm_date: Some("2025-06-30".to_string()),
                decomm_reason: None,
            },
            &UserContext::system(),
        )
        .unwrap();
        store.decommission_application(&app).await.unwrap();

        let mut counts = store.count_by_ea_category().await.unwrap();
        counts.sort_by(|a, b| a.ea_group.cmp(&b.ea_group));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].ea_category, "2.1 Customer");
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].ea_category, "3.2 Corporate & Core System");
        assert_eq!(counts[1].count, 1);
    }

    #[tokio::test]
    async fn test_import_upsert_keeps_decommission_fields() {
        let store = seeded_store().await;
        let mut retired = store.get_application("APP-003").await.unwrap().unwrap();
        retired
            .decommission(
                DecommissionRequest {
                    decomm_date: Some("2025-06-30".to_string()),
                    decomm_reason: None,
                },
                &UserContext::system(),
            )
            .unwrap();
        store.decommission_application(&retired).await.unwrap();

        let incoming = vec![
            build(
                "APP-003",
                "Core Banking (renamed)",
                ApplicationWrite::default(),
            ),
            build("APP-050", "Imported", ApplicationWrite::default()),
        ];
        let outcome = store
            .import_applications(incoming, ImportMode::Upsert)
            .await
            .unwrap();
        assert_eq!(outcome, ImportOutcome { added: 1, updated: 1, failed: 0 });

        let renamed = store.get_application("APP-003").await.unwrap().unwrap();
        assert_eq!(renamed.name, "Core Banking (renamed)");
        assert!(renamed.decommissioned);
        assert_eq!(renamed.status, STATUS_DECOMMISSIONED);
        assert!(renamed.decomm_date.is_some());
        assert_eq!(store.count_applications().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_import_replace_clears_existing_rows() {
        let store = seeded_store().await;
        let incoming = vec![build("APP-100", "Only One", ApplicationWrite::default())];
        let outcome = store
            .import_applications(incoming, ImportMode::Replace)
            .await
            .unwrap();

        assert_eq!(outcome.added, 1);
        assert_eq!(store.count_applications().await.unwrap(), 1);
        assert!(store.get_application("APP-001").await.unwrap().is_none());
    }
}
