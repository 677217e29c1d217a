pub type Id = String;

/// Prefix shared by every server-assigned application identifier
pub const APPLICATION_ID_PREFIX: &str = "APP-";

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_DECOMMISSIONED: &str = "Decommissioned";
pub const CRITICALITY_MISSION_CRITICAL: &str = "Mission Critical";

/// Format a sequence number as an application identifier, e.g. `APP-007`
pub fn format_application_id(sequence: i64) -> Id {
    format!("{}{:03}", APPLICATION_ID_PREFIX, sequence)
}

/// Keep a score inside the 0..=100 range used by health and tech debt
pub fn clamp_score(value: i32) -> i32 {
    value.clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_id_formatting() {
        assert_eq!(format_application_id(1), "APP-001");
        assert_eq!(format_application_id(42), "APP-042");
        assert_eq!(format_application_id(1000), "APP-1000");
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(55), 55);
        assert_eq!(clamp_score(140), 100);
    }
}
