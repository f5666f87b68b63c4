use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::model::{CompanyRecord, ExtractionProgress};
use crate::parser::record::slugify;
use crate::stats::{self, CompanyStats};

pub const COMPANIES_PATH: &str = "companies.json";
pub const STATS_PATH: &str = "stats.json";
pub const PROGRESS_PATH: &str = "progress.json";
const RECORDS_DIR: &str = "companies";
const SECTORS_DIR: &str = "sectors";

/// Named JSON blobs.
pub trait BlobStore {
    /// Persist `value` at `path`, creating parent locations as needed.
    fn write(&self, path: &str, value: &Value) -> Result<()>;

    /// `None` when the blob is absent or cannot be parsed.
    fn read(&self, path: &str) -> Option<Value>;
}

/// Pretty-printed JSON files under a root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for FsBlobStore {
    fn write(&self, path: &str, value: &Value) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(value)?;
        fs::write(&full, body).with_context(|| format!("Failed to write {}", full.display()))?;
        Ok(())
    }

    fn read(&self, path: &str) -> Option<Value> {
        let full = self.root.join(path);
        let body = fs::read_to_string(&full).ok()?;
        match serde_json::from_str(&body) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Ignoring unparsable {}: {}", full.display(), e);
                None
            }
        }
    }
}

fn write_json<S: BlobStore, T: Serialize + ?Sized>(store: &S, path: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value).with_context(|| format!("Failed to serialize {}", path))?;
    store.write(path, &value)
}

pub fn read_json<S: BlobStore, T: DeserializeOwned>(store: &S, path: &str) -> Option<T> {
    serde_json::from_value(store.read(path)?).ok()
}

// ── Snapshots ──

/// Aggregate, fresh statistics and progress. Written after every merged page.
pub fn save_snapshot<S: BlobStore>(
    store: &S,
    records: &[CompanyRecord],
    progress: &ExtractionProgress,
) -> Result<CompanyStats> {
    let stats = stats::compute(records, Utc::now());
    write_json(store, COMPANIES_PATH, records)?;
    write_json(store, STATS_PATH, &stats)?;
    write_json(store, PROGRESS_PATH, progress)?;
    debug!("Snapshot saved: {} companies", records.len());
    Ok(stats)
}

/// One file per record and one per sector grouping. Written once, at completion.
pub fn save_final<S: BlobStore>(store: &S, records: &[CompanyRecord]) -> Result<()> {
    for r in records {
        write_json(store, &format!("{}/{}.json", RECORDS_DIR, r.slug), r)?;
    }

    let groups = stats::group_by_sector(records);
    for (sector, members) in &groups {
        let value = json!({
            "sector": sector,
            "count": members.len(),
            "companies": members,
        });
        store.write(&format!("{}/{}.json", SECTORS_DIR, sector_file_stem(sector)), &value)?;
    }

    info!(
        "Saved {} company files and {} sector files",
        records.len(),
        groups.len()
    );
    Ok(())
}

fn sector_file_stem(sector: &str) -> String {
    let stem = slugify(sector);
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}

pub fn load_companies<S: BlobStore>(store: &S) -> Vec<CompanyRecord> {
    read_json(store, COMPANIES_PATH).unwrap_or_default()
}

pub fn load_stats<S: BlobStore>(store: &S) -> Option<CompanyStats> {
    read_json(store, STATS_PATH)
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// In-process store for tests.
    #[derive(Default)]
    pub struct MemoryStore {
        pub blobs: Mutex<BTreeMap<String, Value>>,
    }

    impl MemoryStore {
        pub fn paths(&self) -> Vec<String> {
            self.blobs.lock().unwrap().keys().cloned().collect()
        }
    }

    impl BlobStore for MemoryStore {
        fn write(&self, path: &str, value: &Value) -> Result<()> {
            self.blobs.lock().unwrap().insert(path.to_string(), value.clone());
            Ok(())
        }

        fn read(&self, path: &str) -> Option<Value> {
            self.blobs.lock().unwrap().get(path).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::model::UNKNOWN;

    fn rec(slug: &str, sector: &str) -> CompanyRecord {
        CompanyRecord {
            id: format!("antler-{}", slug),
            name: slug.to_string(),
            slug: slug.to_string(),
            website: format!("https://{}.io", slug),
            description: format!("{} is a portfolio company of Antler.", slug),
            founded_year: 0,
            location: UNKNOWN.to_string(),
            sector: sector.to_string(),
            logo_url: String::new(),
            portfolio_url: String::new(),
            api_url: format!("/api/companies/{}", slug),
        }
    }

    #[test]
    fn fs_store_creates_dirs_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        store.write("a/b/c.json", &json!({"k": [1, 2]})).unwrap();

        let body = std::fs::read_to_string(dir.path().join("a/b/c.json")).unwrap();
        assert!(body.contains('\n'));
        assert_eq!(store.read("a/b/c.json"), Some(json!({"k": [1, 2]})));
    }

    #[test]
    fn fs_store_read_missing_or_garbage_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        assert_eq!(store.read("nope.json"), None);

        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert_eq!(store.read("bad.json"), None);
    }

    #[test]
    fn snapshot_layout() {
        let store = MemoryStore::default();
        let records = vec![rec("acme", "FinTech"), rec("nimbus", UNKNOWN)];
        let progress = ExtractionProgress::new(Utc::now());

        let stats = save_snapshot(&store, &records, &progress).unwrap();
        assert_eq!(stats.total_companies, 2);
        assert_eq!(store.paths(), vec!["companies.json", "progress.json", "stats.json"]);
        assert_eq!(load_companies(&store), records);
        assert_eq!(load_stats(&store).unwrap().by_sector["FinTech"], 1);
    }

    #[test]
    fn final_layout() {
        let store = MemoryStore::default();
        let records = vec![rec("acme", "Deep Tech"), rec("nimbus", "Deep Tech"), rec("zeta", UNKNOWN)];
        save_final(&store, &records).unwrap();

        assert_eq!(
            store.paths(),
            vec![
                "companies/acme.json",
                "companies/nimbus.json",
                "companies/zeta.json",
                "sectors/deep-tech.json",
                "sectors/unknown.json",
            ]
        );
        let group = store.read("sectors/deep-tech.json").unwrap();
        assert_eq!(group["count"], 2);
        assert_eq!(group["companies"][1]["slug"], "nimbus");
        assert_eq!(group["sector"], "Deep Tech");
    }

    #[test]
    fn missing_aggregate_loads_empty() {
        assert!(load_companies(&MemoryStore::default()).is_empty());
        assert!(load_stats(&MemoryStore::default()).is_none());
    }
}
