//! The workout store: the single owner of the persisted workout collection.

mod backend;

pub use backend::{Backend, FileBackend, MemoryBackend};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::constants::{BACKUP_KEY_PREFIX, CURRENT_VERSION, STORAGE_KEY, VERSION_KEY};
use crate::error::{GymcalError, GymcalResult};
use crate::validate::{check_actual, decode_collection, parse_collection};
use crate::workout::{ActualRecord, PlanDraft, Workout};

/// A serialized snapshot of the collection, ready to be written to a file.
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub contents: String,
}

/// Space used by the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUsage {
    pub bytes: u64,
    pub item_count: usize,
}

impl StorageUsage {
    pub fn kilobytes(&self) -> String {
        format!("{:.2}", self.bytes as f64 / 1024.0)
    }
}

/// Workouts parsed and checked from an external file, not yet applied.
#[derive(Debug, Clone)]
pub struct ImportBatch(Vec<Workout>);

impl ImportBatch {
    pub fn parse(raw: &str) -> GymcalResult<Self> {
        let mut workouts = parse_collection(raw)
            .map_err(|e| GymcalError::Import(format!("Invalid file format: {}", e)))?;
        workouts.sort_by_key(|w| w.date);
        Ok(ImportBatch(workouts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn millis(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or(0)
}

fn backup_key() -> String {
    format!("{}{}", BACKUP_KEY_PREFIX, millis(Utc::now()))
}

/// Ordered collection of workouts backed by a key-value `Backend`.
///
/// Mutations persist a candidate collection first and only replace the
/// in-memory copy once the write succeeded, so memory and storage never
/// disagree after a failed save.
pub struct WorkoutStore<B: Backend> {
    backend: B,
    workouts: Vec<Workout>,
}

impl<B: Backend> WorkoutStore<B> {
    /// Open the store and load whatever the backend holds.
    pub fn open(backend: B) -> Self {
        let mut store = WorkoutStore {
            backend,
            workouts: Vec::new(),
        };
        store.workouts = store.load();
        store
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: u64) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // PERSISTENCE:

    /// Read the persisted collection. Unreadable data is backed up under a
    /// timestamped key and replaced by an empty collection; this never fails.
    pub fn load(&mut self) -> Vec<Workout> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Error loading workouts: {}", e);
                self.move_unreadable_aside();
                return Vec::new();
            }
        };

        match self.backend.get(VERSION_KEY) {
            Ok(Some(version)) if version != CURRENT_VERSION => {
                warn!(
                    "Stored data has version {}, expected {}",
                    version, CURRENT_VERSION
                );
                self.backup_corrupted(&raw);
                return Vec::new();
            }
            _ => {}
        }

        match decode_collection(&raw) {
            Ok(workouts) => {
                debug!("Loaded {} workouts", workouts.len());
                workouts
            }
            Err(e) => {
                warn!("Invalid workout data structure: {}", e);
                self.backup_corrupted(&raw);
                Vec::new()
            }
        }
    }

    fn backup_corrupted(&mut self, raw: &str) {
        let key = backup_key();
        match self.backend.set(&key, raw) {
            Ok(()) => info!("Corrupted data backed up to {}", key),
            Err(e) => error!("Could not back up corrupted data: {}", e),
        }
    }

    /// A blob that cannot even be read as text is moved under the backup
    /// key as-is, so the next save cannot overwrite it.
    fn move_unreadable_aside(&mut self) {
        let key = backup_key();
        match self.backend.rename(STORAGE_KEY, &key) {
            Ok(()) => info!("Unreadable data moved to {}", key),
            Err(e) => error!("Could not back up unreadable data: {}", e),
        }
    }

    /// Persist `workouts` together with the version tag.
    pub fn save(&mut self, workouts: &[Workout]) -> GymcalResult<()> {
        let data = serde_json::to_string(workouts)
            .map_err(|e| GymcalError::Serialization(e.to_string()))?;

        self.backend
            .set_many(&[(STORAGE_KEY, data.as_str()), (VERSION_KEY, CURRENT_VERSION)])
            .inspect_err(|e| match e {
                GymcalError::QuotaExceeded { .. } => warn!("Storage quota exceeded"),
                _ => error!("Error saving workouts: {}", e),
            })
    }

    fn commit(&mut self, candidate: Vec<Workout>) -> GymcalResult<()> {
        self.save(&candidate)?;
        self.workouts = candidate;
        Ok(())
    }

    fn index_of(&self, id: u64) -> GymcalResult<usize> {
        self.workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(GymcalError::NotFound(id))
    }

    // OPERATIONS:

    pub fn add(&mut self, plan: &PlanDraft) -> GymcalResult<Workout> {
        self.add_at(plan, Utc::now())
    }

    /// Validate and insert a plan, keeping the collection sorted by date.
    /// Workouts on the same date stay in insertion order.
    pub fn add_at(&mut self, plan: &PlanDraft, now: DateTime<Utc>) -> GymcalResult<Workout> {
        let plan = plan.validate()?;

        let next_free = match self.workouts.iter().map(|w| w.id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| GymcalError::Storage("No workout ids left".into()))?,
            None => 0,
        };
        let workout = Workout {
            id: millis(now).max(next_free),
            date: plan.date,
            body_parts: plan.body_parts,
            actual: None,
        };

        let mut candidate = self.workouts.clone();
        let position = candidate.partition_point(|w| w.date <= workout.date);
        candidate.insert(position, workout.clone());
        self.commit(candidate)?;

        info!("Added workout {} on {}", workout.id, workout.date);
        Ok(workout)
    }

    /// Record (or replace) the outcome of a workout.
    pub fn attach_actual(&mut self, id: u64, actual: ActualRecord) -> GymcalResult<&Workout> {
        check_actual(&actual).map_err(GymcalError::Validation)?;
        let index = self.index_of(id)?;

        let mut candidate = self.workouts.clone();
        candidate[index].actual = Some(actual);
        self.commit(candidate)?;

        info!("Recorded actuals for workout {}", id);
        Ok(&self.workouts[index])
    }

    pub fn remove(&mut self, id: u64) -> GymcalResult<Workout> {
        let index = self.index_of(id)?;

        let mut candidate = self.workouts.clone();
        let removed = candidate.remove(index);
        self.commit(candidate)?;

        info!("Deleted workout {}", id);
        Ok(removed)
    }

    /// Replace the whole collection with an already-checked batch.
    pub fn replace_all(&mut self, batch: ImportBatch) -> GymcalResult<&[Workout]> {
        self.commit(batch.0)?;
        info!("Imported {} workouts", self.workouts.len());
        Ok(&self.workouts)
    }

    /// Parse, check and apply an external blob. Destructive: the previous
    /// collection is gone once this returns Ok.
    pub fn import_all(&mut self, raw: &str) -> GymcalResult<&[Workout]> {
        let batch = ImportBatch::parse(raw)?;
        self.replace_all(batch)
    }

    pub fn export_all(&self) -> GymcalResult<Export> {
        self.export_at(Utc::now())
    }

    /// Pretty-printed snapshot named after the generation time.
    pub fn export_at(&self, now: DateTime<Utc>) -> GymcalResult<Export> {
        let contents = serde_json::to_string_pretty(&self.workouts)
            .map_err(|e| GymcalError::Serialization(e.to_string()))?;

        Ok(Export {
            filename: format!("gym-workouts-backup-{}.json", millis(now)),
            contents,
        })
    }

    pub fn usage(&self) -> StorageUsage {
        let bytes = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw.len() as u64,
            _ => 0,
        };

        StorageUsage {
            bytes,
            item_count: self.workouts.len(),
        }
    }
}
