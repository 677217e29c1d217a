use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A top-level enterprise architecture group and its ordered categories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaGroupDef {
    pub group: &'static str,
    pub color: &'static str,
    pub categories: &'static [&'static str],
}

pub const EA_GROUPS: &[EaGroupDef] = &[
    EaGroupDef {
        group: "1. Direction",
        color: "#7b61ff",
        categories: &[
            "1.1 BOD",
            "1.2 Vision, Mission, Strategies",
            "1.3 Goals, Objectives",
            "1.4 Governance Body",
            "1.5 Standard & Policies",
            "1.6 Business Process & Services",
        ],
    },
    EaGroupDef {
        group: "2. Services",
        color: "#00e5ff",
        categories: &[
            "2.1 Customer",
            "2.2 Partner",
            "2.3 Service",
            "2.4 Employee",
            "2.6 Channel",
            "2.7 Portal & Gateway",
        ],
    },
    EaGroupDef {
        group: "3. Core Products",
        color: "#00d68f",
        categories: &[
            "3.1 Organization",
            "3.2 Corporate & Core System",
            "3.3 Back Office & Support System",
        ],
    },
    EaGroupDef {
        group: "4. Support",
        color: "#ff9f43",
        categories: &[
            "4.1 Training & Communication",
            "4.2 Corporate Information",
            "4.3 Corporate Application & Information Technology",
        ],
    },
    EaGroupDef {
        group: "5. Governance",
        color: "#ff4757",
        categories: &[
            "5.1 Corporate Security & Policy",
            "5.2 Risk & Internal Control",
            "5.3 Law & Compliance",
        ],
    },
];

/// Live application count for one (group, category) pair, as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaCategoryCount {
    pub ea_group: String,
    pub ea_category: String,
    pub count: i64,
}

/// One group of the EA structure response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaGroupSummary {
    pub group: String,
    pub color: String,
    pub categories: Vec<String>,
    pub counts: BTreeMap<String, i64>,
    pub total: i64,
}
