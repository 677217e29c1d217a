use std::collections::{BTreeMap, HashMap};

use crate::model::{EaCategoryCount, EaGroupSummary, EA_GROUPS};

/// Lay the live per-category counts over the fixed EA group hierarchy.
/// Categories without applications report zero; counts for pairs outside
/// the hierarchy are not reported.
pub fn build_ea_structure(counts: &[EaCategoryCount]) -> Vec<EaGroupSummary> {
    let lookup: HashMap<(&str, &str), i64> = counts
        .iter()
        .map(|c| ((c.ea_group.as_str(), c.ea_category.as_str()), c.count))
        .collect();

    EA_GROUPS
        .iter()
        .map(|def| {
            let counts: BTreeMap<String, i64> = def
                .categories
                .iter()
                .map(|category| {
                    let count = lookup.get(&(def.group, *category)).copied().unwrap_or(0);
                    (category.to_string(), count)
                })
                .collect();

            EaGroupSummary {
                group: def.group.to_string(),
                color: def.color.to_string(),
                categories: def.categories.iter().map(|c| c.to_string()).collect(),
                total: counts.values().sum(),
                counts,
            }
        })
        .collect()
}
