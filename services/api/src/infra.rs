use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use society::config::AppConfig;
use society::error::AppError;
use society::services::{BuildingSnapshot, ResidentSnapshot};
use society::{seed, SocietyContext, SocietySnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

const RESIDENTS_FILE: &str = "residents.json";
const BILLS_FILE: &str = "bills.json";
const VISITORS_FILE: &str = "visitors.json";
const COMPLAINTS_FILE: &str = "complaints.json";
const FACILITIES_FILE: &str = "facilities.json";
const BUILDING_FILE: &str = "building.json";

const SNAPSHOT_FILES: [&str; 6] = [
    RESIDENTS_FILE,
    BILLS_FILE,
    VISITORS_FILE,
    COMPLAINTS_FILE,
    FACILITIES_FILE,
    BUILDING_FILE,
];

/// One JSON document per structure inside the data directory. A missing file reads as empty.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn exists(&self) -> bool {
        SNAPSHOT_FILES
            .iter()
            .any(|file| self.dir.join(file).is_file())
    }

    pub(crate) fn load(&self, society: &str) -> Result<SocietySnapshot, AppError> {
        let building = self
            .read::<BuildingSnapshot>(BUILDING_FILE)?
            .unwrap_or_else(|| BuildingSnapshot {
                society: society.to_string(),
                towers: Vec::new(),
            });

        Ok(SocietySnapshot {
            residents: ResidentSnapshot {
                residents: self.read(RESIDENTS_FILE)?.unwrap_or_default(),
                bills: self.read(BILLS_FILE)?.unwrap_or_default(),
            },
            visitors: self.read(VISITORS_FILE)?.unwrap_or_default(),
            complaints: self.read(COMPLAINTS_FILE)?.unwrap_or_default(),
            facilities: self.read(FACILITIES_FILE)?.unwrap_or_default(),
            building,
        })
    }

    pub(crate) fn save(&self, snapshot: &SocietySnapshot) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        self.write(RESIDENTS_FILE, &snapshot.residents.residents)?;
        self.write(BILLS_FILE, &snapshot.residents.bills)?;
        self.write(VISITORS_FILE, &snapshot.visitors)?;
        self.write(COMPLAINTS_FILE, &snapshot.complaints)?;
        self.write(FACILITIES_FILE, &snapshot.facilities)?;
        self.write(BUILDING_FILE, &snapshot.building)?;
        info!(dir = %self.dir.display(), "society snapshot saved");
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, AppError> {
        let path = self.dir.join(file);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "snapshot file missing, starting empty");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(self.dir.join(file), bytes)?;
        Ok(())
    }
}

/// Build the society the service starts from: the persisted snapshot when one exists, otherwise
/// sample data when the configuration asks for it, otherwise an empty society.
pub(crate) fn open_society(
    config: &AppConfig,
    store: &SnapshotStore,
) -> Result<SocietyContext, AppError> {
    let context = SocietyContext::new(config.society.name.clone());

    if store.exists() {
        context.restore(store.load(&config.society.name)?)?;
        info!(dir = %store.dir().display(), "society restored from snapshot");
    } else if config.storage.seed_sample_data {
        seed::populate(&context)?;
    } else {
        info!("starting with an empty society");
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use society::records::VisitorRecord;

    fn seeded() -> SocietyContext {
        let context = SocietyContext::new("Green Valley Apartments");
        seed::populate(&context).expect("seed data is consistent");
        context
    }

    #[test]
    fn missing_directory_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path().join("absent"));

        assert!(!store.exists());
        let snapshot = store.load("Lake View").expect("empty snapshot");
        assert!(snapshot.residents.residents.is_empty());
        assert!(snapshot.visitors.is_empty());
        assert_eq!(snapshot.building.society, "Lake View");
    }

    #[test]
    fn save_writes_one_file_per_structure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        let context = seeded();

        store.save(&context.dump()).expect("snapshot saves");

        for file in SNAPSHOT_FILES {
            assert!(dir.path().join(file).is_file(), "{file} written");
        }
        let restored = SocietyContext::new("placeholder");
        restored
            .restore(store.load("placeholder").expect("snapshot loads"))
            .expect("snapshot is consistent");
        assert_eq!(restored.dump(), context.dump());
    }

    #[test]
    fn partial_snapshots_fill_missing_structures() {
        let dir = tempfile::tempdir().expect("temp dir");
        let visitors: Vec<VisitorRecord> = seeded().dump().visitors;
        fs::write(
            dir.path().join(VISITORS_FILE),
            serde_json::to_vec(&visitors).expect("serialize"),
        )
        .expect("write visitors");

        let store = SnapshotStore::new(dir.path());
        assert!(store.exists());
        let snapshot = store.load("Green Valley Apartments").expect("loads");
        assert_eq!(snapshot.visitors, visitors);
        assert!(snapshot.complaints.is_empty());
        assert!(snapshot.facilities.facilities.is_empty());
    }

    #[test]
    fn corrupt_files_surface_snapshot_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(COMPLAINTS_FILE), b"{not json").expect("write");

        let store = SnapshotStore::new(dir.path());
        assert!(matches!(
            store.load("Green Valley Apartments"),
            Err(AppError::Snapshot(_))
        ));
    }
}
