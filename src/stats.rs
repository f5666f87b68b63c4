use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::CompanyRecord;

/// Distribution snapshot over the accumulated set. Always rebuilt from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub total_companies: usize,
    pub by_sector: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
    /// Key 0 collects unknown years.
    pub by_founded_year: BTreeMap<i32, usize>,
    pub last_updated: DateTime<Utc>,
}

pub fn compute(records: &[CompanyRecord], now: DateTime<Utc>) -> CompanyStats {
    let mut by_sector = BTreeMap::new();
    let mut by_location = BTreeMap::new();
    let mut by_founded_year = BTreeMap::new();

    for r in records {
        *by_sector.entry(r.sector.clone()).or_insert(0) += 1;
        *by_location.entry(r.location.clone()).or_insert(0) += 1;
        *by_founded_year.entry(r.founded_year).or_insert(0) += 1;
    }

    CompanyStats {
        total_companies: records.len(),
        by_sector,
        by_location,
        by_founded_year,
        last_updated: now,
    }
}

/// Records grouped by sector, preserving accumulation order within a group.
pub fn group_by_sector(records: &[CompanyRecord]) -> BTreeMap<&str, Vec<&CompanyRecord>> {
    let mut groups: BTreeMap<&str, Vec<&CompanyRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.sector.as_str()).or_default().push(r);
    }
    groups
}

/// Entries sorted by descending count, then key.
pub fn ranked<K: Clone + Ord>(counts: &BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}
