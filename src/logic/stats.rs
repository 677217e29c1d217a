use itertools::Itertools;

use crate::model::{Application, PortfolioStats, CRITICALITY_MISSION_CRITICAL};

/// Compute dashboard KPIs in a single pass over the portfolio
pub fn compute_stats(applications: &[Application]) -> PortfolioStats {
    let mut stats = PortfolioStats {
        total: applications.len() as i64,
        ..Default::default()
    };
    let mut health_sum = 0i64;

    for app in applications {
        if app.decommissioned {
            stats.decommissioned += 1;
            continue;
        }
        stats.tco = stats.tco.saturating_add(app.tco);
        if app.criticality == CRITICALITY_MISSION_CRITICAL {
            stats.mission_critical += 1;
        }
        if app.is_active() {
            stats.active += 1;
            health_sum += i64::from(app.health);
        }
    }

    stats.domains = applications
        .iter()
        .filter(|app| !app.decommissioned)
        .filter_map(|app| app.domain.as_deref())
        .unique()
        .count() as i64;

    if stats.active > 0 {
        let mean = health_sum as f64 / stats.active as f64;
        stats.avg_health = (mean * 10.0).round() / 10.0;
    }

    stats
}
