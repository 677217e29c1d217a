use serde::{Deserialize, Serialize};

use crate::model::Application;

/// Query parameters accepted by the application listing. Every filter is
/// optional and they combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ea_group: Option<String>,
    /// Case-insensitive substring matched against name, vendor, domain and capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub show_decomm: bool,
}

impl ApplicationFilter {
    /// Everything, decommissioned records included
    pub fn everything() -> Self {
        Self {
            show_decomm: true,
            ..Default::default()
        }
    }

    /// Drop empty parameters (`?status=` means "no status filter") and trim search
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            status: present(self.status),
            domain: present(self.domain),
            bcg: present(self.bcg),
            ea_group: present(self.ea_group),
            search: present(self.search.map(|s| s.trim().to_string())),
            show_decomm: self.show_decomm,
        }
    }

    /// Case-insensitive substring match of the search term against name,
    /// vendor, domain and capability. Folding is full Unicode on both sides.
    pub fn matches_search(&self, app: &Application) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let needle = term.to_lowercase();

        [
            Some(app.name.as_str()),
            app.vendor.as_deref(),
            app.domain.as_deref(),
            app.capability.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Query parameters of the export endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub include_decomm: bool,
}

impl From<ExportQuery> for ApplicationFilter {
    fn from(query: ExportQuery) -> Self {
        Self {
            show_decomm: query.include_decomm,
            ..Default::default()
        }
    }
}
