use crate::model::{clamp_score, Id, UserContext, STATUS_ACTIVE, STATUS_DECOMMISSIONED};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HEALTH: i32 = 75;
pub const DEFAULT_DECOMMISSION_REASON: &str = "Not specified";

/// An enterprise software asset tracked in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Id,
    pub name: String,
    pub domain: Option<String>,
    pub vendor: Option<String>,
    #[serde(rename = "type")]
    pub app_type: String,
    pub status: String,
    pub bcg: String,
    pub health: i32,
    pub tech_debt: i32,
    pub age: i32,
    pub tco: i64,
    pub users: i64,
    pub criticality: String,
    pub dr: bool,
    pub eol: Option<String>,
    pub pi_spi: bool,
    pub contract_end: Option<String>,
    pub integration: i32,
    pub stack: Vec<String>,
    pub capability: Option<String>,
    pub strategic: i32,
    pub persons: i32,
    pub src_avail: bool,
    pub service_hour: Option<String>,
    pub maint_window: Option<String>,
    pub lang: Option<String>,
    pub os: Option<String>,
    pub db_platform: Option<String>,
    pub support: Option<String>,
    pub owner: Option<String>,
    pub biz_owner: Option<String>,
    pub compliance: Vec<String>,
    pub stream: Option<String>,
    pub approach: Option<String>,
    pub assess_status: Option<String>,
    pub assess_date: Option<String>,
    pub wave: i32,
    pub ea_group: Option<String>,
    pub ea_category: Option<String>,
    pub ea_sub_category: Option<String>,

    /// Decommission metadata; `decomm_date` is always set once `decommissioned` is true
    pub decommissioned: bool,
    pub decomm_date: Option<NaiveDate>,
    pub decomm_reason: Option<String>,

    /// Audit fields for tracking who created/modified this application
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Writable application attributes. Every field is optional: on create the
/// missing ones take their defaults, on update they are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationWrite {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub vendor: Option<String>,
    #[serde(rename = "type")]
    pub app_type: Option<String>,
    pub status: Option<String>,
    pub bcg: Option<String>,
    pub health: Option<i32>,
    pub tech_debt: Option<i32>,
    pub age: Option<i32>,
    pub tco: Option<i64>,
    pub users: Option<i64>,
    pub criticality: Option<String>,
    pub dr: Option<bool>,
    pub eol: Option<String>,
    pub pi_spi: Option<bool>,
    pub contract_end: Option<String>,
    pub integration: Option<i32>,
    pub stack: Option<Vec<String>>,
    pub capability: Option<String>,
    pub strategic: Option<i32>,
    pub persons: Option<i32>,
    pub src_avail: Option<bool>,
    pub service_hour: Option<String>,
    pub maint_window: Option<String>,
    pub lang: Option<String>,
    pub os: Option<String>,
    pub db_platform: Option<String>,
    pub support: Option<String>,
    pub owner: Option<String>,
    pub biz_owner: Option<String>,
    pub compliance: Option<Vec<String>>,
    pub stream: Option<String>,
    pub approach: Option<String>,
    pub assess_status: Option<String>,
    pub assess_date: Option<String>,
    pub wave: Option<i32>,
    pub ea_group: Option<String>,
    pub ea_category: Option<String>,
    pub ea_sub_category: Option<String>,
}

/// Application input model for creation and import.
/// The ID is assigned server-side unless the caller supplies one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(flatten)]
    pub fields: ApplicationWrite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecommissionRequest {
    #[serde(default)]
    pub decomm_date: Option<String>,
    #[serde(default)]
    pub decomm_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error("name is required")]
    BlankName,
    #[error("id is required")]
    MissingId,
    #[error("Application {0} is already decommissioned")]
    AlreadyDecommissioned(Id),
    #[error("status 'Decommissioned' can only be set through the decommission endpoint")]
    DecommissionThroughUpdate,
    #[error("decomm_date is required")]
    MissingDecommissionDate,
    #[error("invalid decomm_date '{0}', expected YYYY-MM-DD")]
    InvalidDecommissionDate(String),
    #[error("App {0} already exists")]
    DuplicateId(Id),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn replace_optional<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl NewApplication {
    /// Caller-supplied identifier, ignoring blank values
    pub fn supplied_id(&self) -> Option<Id> {
        non_blank(self.id.clone())
    }

    /// Build a full Application with defaults and audit information
    pub fn into_application(
        self,
        id: Id,
        user: &UserContext,
    ) -> Result<Application, ApplicationError> {
        let f = self.fields;
        let name = non_blank(f.name).ok_or(ApplicationError::BlankName)?;
        if f.status.as_deref() == Some(STATUS_DECOMMISSIONED) {
            return Err(ApplicationError::DecommissionThroughUpdate);
        }

        let health = clamp_score(f.health.unwrap_or(DEFAULT_HEALTH));
        let tech_debt = clamp_score(f.tech_debt.unwrap_or(100 - health));
        let now = Utc::now();

        Ok(Application {
            id,
            name,
            domain: f.domain,
            vendor: f.vendor,
            app_type: f.app_type.unwrap_or_else(|| "Package".to_string()),
            status: f.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            bcg: f.bcg.unwrap_or_else(|| "Tolerate".to_string()),
            health,
            tech_debt,
            age: f.age.unwrap_or(0),
            tco: f.tco.unwrap_or(0),
            users: f.users.unwrap_or(0),
            criticality: f.criticality.unwrap_or_else(|| "Medium".to_string()),
            dr: f.dr.unwrap_or(false),
            eol: f.eol,
            pi_spi: f.pi_spi.unwrap_or(false),
            contract_end: f.contract_end,
            integration: f.integration.unwrap_or(0),
            stack: f.stack.unwrap_or_default(),
            capability: f.capability,
            strategic: f.strategic.unwrap_or(70),
            persons: f.persons.unwrap_or(1),
            src_avail: f.src_avail.unwrap_or(true),
            service_hour: f.service_hour.or_else(|| Some("Business Hours".to_string())),
            maint_window: f.maint_window,
            lang: f.lang,
            os: f.os,
            db_platform: f.db_platform,
            support: f.support.or_else(|| Some("Inhouse".to_string())),
            owner: f.owner,
            biz_owner: f.biz_owner,
            compliance: f.compliance.unwrap_or_default(),
            stream: f.stream,
            approach: f.approach.or_else(|| Some("Upgrade".to_string())),
            assess_status: f.assess_status.or_else(|| Some("Not Started".to_string())),
            assess_date: f.assess_date,
            wave: f.wave.unwrap_or(3),
            ea_group: f.ea_group,
            ea_category: f.ea_category,
            ea_sub_category: f.ea_sub_category.or_else(|| Some("-".to_string())),
            decommissioned: false,
            decomm_date: None,
            decomm_reason: None,
            created_at: now,
            created_by: user.user_id.clone(),
            updated_at: now,
            updated_by: user.user_id.clone(),
        })
    }

    /// Imported records must name their own identifier
    pub fn into_imported(self, user: &UserContext) -> Result<Application, ApplicationError> {
        let id = self.supplied_id().ok_or(ApplicationError::MissingId)?;
        self.into_application(id, user)
    }
}

impl Application {
    /// Active in the portfolio sense: status Active and not retired
    pub fn is_active(&self) -> bool {
        !self.decommissioned && self.status == STATUS_ACTIVE
    }

    /// Merge a partial update onto this record, preserving the identifier
    /// and creation audit trail
    pub fn apply_update(
        &mut self,
        update: ApplicationWrite,
        user: &UserContext,
    ) -> Result<(), ApplicationError> {
        if self.decommissioned {
            return Err(ApplicationError::AlreadyDecommissioned(self.id.clone()));
        }
        if update.status.as_deref() == Some(STATUS_DECOMMISSIONED) {
            return Err(ApplicationError::DecommissionThroughUpdate);
        }
        if let Some(name) = update.name {
            self.name = non_blank(Some(name)).ok_or(ApplicationError::BlankName)?;
        }

        replace(&mut self.app_type, update.app_type);
        replace(&mut self.status, update.status);
        replace(&mut self.bcg, update.bcg);
        replace(&mut self.age, update.age);
        replace(&mut self.tco, update.tco);
        replace(&mut self.users, update.users);
        replace(&mut self.criticality, update.criticality);
        replace(&mut self.dr, update.dr);
        replace(&mut self.pi_spi, update.pi_spi);
        replace(&mut self.integration, update.integration);
        replace(&mut self.stack, update.stack);
        replace(&mut self.strategic, update.strategic);
        replace(&mut self.persons, update.persons);
        replace(&mut self.src_avail, update.src_avail);
        replace(&mut self.compliance, update.compliance);
        replace(&mut self.wave, update.wave);
        replace_optional(&mut self.domain, update.domain);
        replace_optional(&mut self.vendor, update.vendor);
        replace_optional(&mut self.eol, update.eol);
        replace_optional(&mut self.contract_end, update.contract_end);
        replace_optional(&mut self.capability, update.capability);
        replace_optional(&mut self.service_hour, update.service_hour);
        replace_optional(&mut self.maint_window, update.maint_window);
        replace_optional(&mut self.lang, update.lang);
        replace_optional(&mut self.os, update.os);
        replace_optional(&mut self.db_platform, update.db_platform);
        replace_optional(&mut self.support, update.support);
        replace_optional(&mut self.owner, update.owner);
        replace_optional(&mut self.biz_owner, update.biz_owner);
        replace_optional(&mut self.stream, update.stream);
        replace_optional(&mut self.approach, update.approach);
        replace_optional(&mut self.assess_status, update.assess_status);
        replace_optional(&mut self.assess_date, update.assess_date);
        replace_optional(&mut self.ea_group, update.ea_group);
        replace_optional(&mut self.ea_category, update.ea_category);
        replace_optional(&mut self.ea_sub_category, update.ea_sub_category);
        if let Some(health) = update.health {
            self.health = clamp_score(health);
        }
        if let Some(tech_debt) = update.tech_debt {
            self.tech_debt = clamp_score(tech_debt);
        }

        self.touch(user);
        Ok(())
    }

    /// Retire this application. The row is kept; only status and
    /// decommission metadata change.
    pub fn decommission(
        &mut self,
        request: DecommissionRequest,
        user: &UserContext,
    ) -> Result<(), ApplicationError> {
        if self.decommissioned {
            return Err(ApplicationError::AlreadyDecommissioned(self.id.clone()));
        }
        let raw_date =
            non_blank(request.decomm_date).ok_or(ApplicationError::MissingDecommissionDate)?;
        let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
            .map_err(|_| ApplicationError::InvalidDecommissionDate(raw_date.clone()))?;

        self.decommissioned = true;
        self.status = STATUS_DECOMMISSIONED.to_string();
        self.decomm_date = Some(date);
        self.decomm_reason = Some(
            non_blank(request.decomm_reason)
                .unwrap_or_else(|| DEFAULT_DECOMMISSION_REASON.to_string()),
        );
        self.touch(user);
        Ok(())
    }

    fn touch(&mut self, user: &UserContext) {
        self.updated_by = user.user_id.clone();
        self.updated_at = Utc::now();
    }
}
