use serde::{Deserialize, Serialize};

/// Dashboard KPIs over the whole portfolio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Every record, decommissioned ones included
    pub total: i64,
    /// Status Active and not decommissioned
    pub active: i64,
    /// Total cost of ownership of the live (non-decommissioned) portfolio
    pub tco: i64,
    /// Mean health of active records, one decimal
    pub avg_health: f64,
    pub mission_critical: i64,
    pub domains: i64,
    pub decommissioned: i64,
}
