//! File-backed persistence of per-build annotation lists.
//!
//! Each build is one file below the builds directory:
//!
//! - `<id>.json` holds the current schema.
//! - `<id>.xml` is a legacy build file. It is read only when no JSON record
//!   exists; its annotations are migrated and written back as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use badgekit_core::error::CoreError;
use badgekit_core::icon::IconResolver;
use badgekit_core::manager::Persist;
use badgekit_core::migration::{LegacyMigrator, MigrationState};
use badgekit_core::store::AnnotationStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};
use crate::legacy_xml::read_legacy_actions;

pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The JSON document stored for one build.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRecord {
    pub build_id: String,
    pub updated_at: Timestamp,
    pub annotations: AnnotationStore,
}

#[derive(Serialize)]
struct BuildRecordRef<'a> {
    build_id: &'a str,
    updated_at: Timestamp,
    annotations: &'a AnnotationStore,
}

fn validate_build_id(build_id: &str) -> HostResult<()> {
    let invalid = build_id.trim().is_empty()
        || build_id.contains(['/', '\\'])
        || build_id == "."
        || build_id.contains("..");
    if invalid {
        return Err(HostError::InvalidBuildId(build_id.to_string()));
    }
    Ok(())
}

fn read_optional(path: &Path) -> HostResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, content: &str) -> HostResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct BuildStore {
    root: PathBuf,
}

impl BuildStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn json_path(&self, build_id: &str) -> PathBuf {
        self.root.join(format!("{build_id}.json"))
    }

    fn xml_path(&self, build_id: &str) -> PathBuf {
        self.root.join(format!("{build_id}.xml"))
    }

    /// Load a build's annotations, upgrading anything still in the legacy
    /// schema. A build with no file yields an empty store.
    pub fn load(&self, build_id: &str, icons: &IconResolver) -> HostResult<AnnotationStore> {
        validate_build_id(build_id)?;
        let migrator = LegacyMigrator::new(icons);

        if let Some(text) = read_optional(&self.json_path(build_id))? {
            let record: BuildRecord = serde_json::from_str(&text)?;
            let mut store = record.annotations;
            if migrator.migrate_store(&mut store) > 0 {
                self.save(build_id, &mut store)?;
            }
            return Ok(store);
        }

        let Some(xml) = read_optional(&self.xml_path(build_id))? else {
            return Ok(AnnotationStore::new());
        };

        let annotations = read_legacy_actions(&xml)?
            .into_iter()
            .filter_map(
                |action| match MigrationState::LoadedLegacy(action).advance(&migrator) {
                    MigrationState::Migrated(annotation) => Some(annotation),
                    MigrationState::LoadedLegacy(_) => None,
                },
            )
            .collect();
        let mut store = AnnotationStore::from_annotations(annotations);
        store.mark_dirty();
        self.save(build_id, &mut store)?;
        tracing::info!(
            build_id = %build_id,
            count = store.len(),
            "Migrated legacy build file"
        );
        Ok(store)
    }

    /// Write the JSON record for a build and clear the store's dirty flag.
    pub fn save(&self, build_id: &str, store: &mut AnnotationStore) -> HostResult<()> {
        self.write(build_id, store)?;
        store.mark_persisted();
        Ok(())
    }

    fn write(&self, build_id: &str, store: &AnnotationStore) -> HostResult<()> {
        validate_build_id(build_id)?;
        fs::create_dir_all(&self.root)?;
        let record = BuildRecordRef {
            build_id,
            updated_at: Utc::now(),
            annotations: store,
        };
        let json = serde_json::to_string_pretty(&record)?;
        write_atomic(&self.json_path(build_id), &json)?;
        tracing::debug!(build_id = %build_id, count = store.len(), "Persisted annotations");
        Ok(())
    }

    /// Read the stored record without migrating it.
    pub fn read_record(&self, build_id: &str) -> HostResult<Option<BuildRecord>> {
        validate_build_id(build_id)?;
        read_optional(&self.json_path(build_id))?
            .map(|text| serde_json::from_str(&text).map_err(HostError::from))
            .transpose()
    }

    /// Remove a build's JSON record. Returns whether a record existed.
    pub fn delete(&self, build_id: &str) -> HostResult<bool> {
        validate_build_id(build_id)?;
        match fs::remove_file(self.json_path(build_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Builds that only have a legacy XML file, sorted by id.
    pub fn legacy_build_ids(&self) -> HostResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_build_id(id).is_ok() && !self.json_path(id).exists() {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// A [`Persist`] bound to one build.
    pub fn persister<'s>(&'s self, build_id: &'s str) -> BuildPersister<'s> {
        BuildPersister {
            store: self,
            build_id,
        }
    }
}

/// Persists a [`BadgeManager`](badgekit_core::manager::BadgeManager)'s
/// store to one build's JSON record.
#[derive(Debug, Clone, Copy)]
pub struct BuildPersister<'s> {
    store: &'s BuildStore,
    build_id: &'s str,
}

impl Persist for BuildPersister<'_> {
    fn persist(&self, store: &AnnotationStore) -> Result<(), CoreError> {
        self.store
            .write(self.build_id, store)
            .map_err(|e| CoreError::Persist(format!("build {}: {e}", self.build_id)))
    }
}

// ---------------------------------------------------------------------------
// Bulk migration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Upgrade every legacy-only build below the store root. A build that
/// fails is logged and reported; the rest still run.
pub fn migrate_all(store: &BuildStore, icons: &IconResolver) -> HostResult<MigrationReport> {
    let mut report = MigrationReport::default();
    for build_id in store.legacy_build_ids()? {
        match store.load(&build_id, icons) {
            Ok(_) => report.migrated.push(build_id),
            Err(e) => {
                tracing::error!(build_id = %build_id, error = %e, "Failed to migrate build");
                report.failed.push((build_id, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use badgekit_core::icon::ProbeError;

    fn icons() -> IconResolver {
        IconResolver::new("/static", |_: &str| Ok::<bool, ProbeError>(false))
    }

    #[test]
    fn build_id_validation() {
        for bad in ["", "  ", ".", "..", "a/b", "a\\b", "../x"] {
            assert_matches!(validate_build_id(bad), Err(HostError::InvalidBuildId(_)));
        }
        for good in ["42", "job-7_build.3", "main#12"] {
            assert!(validate_build_id(good).is_ok(), "{good}");
        }
    }

    #[test]
    fn missing_build_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BuildStore::new(dir.path());
        let loaded = store.load("1", &icons()).unwrap();
        assert!(loaded.is_empty());
        assert!(!loaded.needs_persist());
        assert!(store.read_record("1").unwrap().is_none());
    }

    #[test]
    fn delete_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!BuildStore::new(dir.path()).delete("1").unwrap());
    }

    #[test]
    fn legacy_ids_skip_migrated_builds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.xml"), "<build/>").unwrap();
        fs::write(dir.path().join("2.xml"), "<build/>").unwrap();
        fs::write(dir.path().join("2.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let store = BuildStore::new(dir.path());
        assert_eq!(store.legacy_build_ids().unwrap(), vec!["1".to_string()]);
    }

    #[test]
    fn missing_root_has_no_legacy_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = BuildStore::new(dir.path().join("absent"));
        assert!(store.legacy_build_ids().unwrap().is_empty());
    }
}
