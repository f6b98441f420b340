//! Persistence of workout history and current working weights.
//!
//! Two independent JSON documents live in the data directory:
//! - `workouts.json`: array of finished workouts in completion order
//! - `current_weights.json`: object mapping exercise name to weight (kg)
//!
//! Reads take a shared lock, writes replace the whole document atomically
//! under an exclusive lock. A missing or unreadable document reads as empty.

use crate::{CurrentWeights, Error, Result, Workout};
use fs2::FileExt;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const WORKOUTS_FILE: &str = "workouts.json";
pub const CURRENT_WEIGHTS_FILE: &str = "current_weights.json";

/// Gateway to the durable workout log and working weights
pub trait WorkoutStore {
    /// All finished workouts, oldest first
    fn workouts(&self) -> Result<Vec<Workout>>;

    /// Append a finished workout to the log
    fn save_workout(&mut self, workout: &Workout) -> Result<()>;

    fn current_weights(&self) -> Result<CurrentWeights>;

    /// Insert or replace the working weight for one exercise
    fn update_exercise_weight(&mut self, name: &str, weight: f64) -> Result<()>;

    /// Most recently finished workout
    fn last_workout(&self) -> Result<Option<Workout>> {
        Ok(self.workouts()?.pop())
    }
}

/// In-memory store, for tests and dry runs
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub workouts: Vec<Workout>,
    pub weights: CurrentWeights,
}

impl WorkoutStore for MemoryStore {
    fn workouts(&self) -> Result<Vec<Workout>> {
        Ok(self.workouts.clone())
    }

    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        self.workouts.push(workout.clone());
        Ok(())
    }

    fn current_weights(&self) -> Result<CurrentWeights> {
        Ok(self.weights.clone())
    }

    fn update_exercise_weight(&mut self, name: &str, weight: f64) -> Result<()> {
        self.weights.insert(name.to_string(), weight);
        Ok(())
    }
}

impl<S: WorkoutStore + ?Sized> WorkoutStore for &mut S {
    fn workouts(&self) -> Result<Vec<Workout>> {
        (**self).workouts()
    }

    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        (**self).save_workout(workout)
    }

    fn current_weights(&self) -> Result<CurrentWeights> {
        (**self).current_weights()
    }

    fn update_exercise_weight(&mut self, name: &str, weight: f64) -> Result<()> {
        (**self).update_exercise_weight(name, weight)
    }
}

/// File-backed store rooted at a data directory
#[derive(Clone, Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn workouts_path(&self) -> PathBuf {
        self.dir.join(WORKOUTS_FILE)
    }

    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(CURRENT_WEIGHTS_FILE)
    }

    /// Raw workout entries, keeping ones this version cannot parse so that
    /// appending never drops them
    fn raw_workouts(&self) -> Vec<serde_json::Value> {
        let path = self.workouts_path();
        let Some(contents) = read_document(&path) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<serde_json::Value>>(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse workout log {:?}: {}. Treating as empty.",
                    path,
                    e
                );
                Vec::new()
            }
        }
    }
}

impl WorkoutStore for JsonStore {
    fn workouts(&self) -> Result<Vec<Workout>> {
        let mut workouts = Vec::new();

        for (index, entry) in self.raw_workouts().into_iter().enumerate() {
            match serde_json::from_value::<Workout>(entry) {
                Ok(workout) => workouts.push(workout),
                Err(e) => {
                    tracing::warn!("Skipping malformed workout entry {}: {}", index, e);
                }
            }
        }

        tracing::debug!("Read {} workouts from {:?}", workouts.len(), self.dir);
        Ok(workouts)
    }

    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        let mut entries = self.raw_workouts();
        entries.push(serde_json::to_value(workout)?);
        write_document(&self.workouts_path(), &entries)?;

        tracing::debug!("Appended workout {} to log", workout.id);
        Ok(())
    }

    fn current_weights(&self) -> Result<CurrentWeights> {
        let path = self.weights_path();
        let Some(contents) = read_document(&path) else {
            return Ok(CurrentWeights::new());
        };

        match serde_json::from_str::<CurrentWeights>(&contents) {
            Ok(mut weights) => {
                weights.retain(|name, weight| {
                    let keep = weight.is_finite() && *weight >= 0.0;
                    if !keep {
                        tracing::warn!("Ignoring invalid stored weight {} for {}", weight, name);
                    }
                    keep
                });
                Ok(weights)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse current weights {:?}: {}. Treating as empty.",
                    path,
                    e
                );
                Ok(CurrentWeights::new())
            }
        }
    }

    fn update_exercise_weight(&mut self, name: &str, weight: f64) -> Result<()> {
        let mut weights = self.current_weights()?;
        weights.insert(name.to_string(), weight);
        write_document(&self.weights_path(), &weights)?;

        tracing::debug!("Stored working weight {} kg for {}", weight, name);
        Ok(())
    }
}

/// Read a whole document under a shared lock; None if missing or unreadable
fn read_document(path: &Path) -> Option<String> {
    if !path.exists() {
        tracing::debug!("No document at {:?}", path);
        return None;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Treating as empty.", path, e);
            return None;
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Treating as empty.", path, e);
        return None;
    }

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    let _ = file.unlock();

    match read {
        Ok(_) => Some(contents),
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}. Treating as empty.", path, e);
            None
        }
    }
}

/// Replace a document atomically: temp file, fsync, rename
fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "document path missing parent",
        ))
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseRecord, WorkoutType};
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_workout(workout_type: WorkoutType) -> Workout {
        Workout {
            id: Uuid::now_v7(),
            workout_type,
            date: Utc::now(),
            exercises: vec![ExerciseRecord {
                name: "Squat".into(),
                weight: 60.0,
                sets: 5,
                reps: 5,
                completed: true,
            }],
            completed: true,
        }
    }

    #[test]
    fn test_append_and_read_in_order() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());

        let first = create_test_workout(WorkoutType::A);
        let second = create_test_workout(WorkoutType::B);
        store.save_workout(&first).unwrap();
        store.save_workout(&second).unwrap();

        let workouts = store.workouts().unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].id, first.id);
        assert_eq!(workouts[1].id, second.id);
        assert_eq!(store.last_workout().unwrap().unwrap().id, second.id);
    }

    #[test]
    fn test_missing_documents_read_as_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path().join("nowhere"));

        assert!(store.workouts().unwrap().is_empty());
        assert!(store.current_weights().unwrap().is_empty());
        assert!(store.last_workout().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_documents_read_as_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(WORKOUTS_FILE), "{ invalid json }").unwrap();
        std::fs::write(temp_dir.path().join(CURRENT_WEIGHTS_FILE), "[1, 2").unwrap();

        let store = JsonStore::new(temp_dir.path());
        assert!(store.workouts().unwrap().is_empty());
        assert!(store.current_weights().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_log_is_replaced_on_append() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(WORKOUTS_FILE), "garbage").unwrap();

        let mut store = JsonStore::new(temp_dir.path());
        store
            .save_workout(&create_test_workout(WorkoutType::A))
            .unwrap();
        assert_eq!(store.workouts().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_entries_skipped_but_kept() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(WORKOUTS_FILE),
            r#"[{"id": "not-a-workout"}]"#,
        )
        .unwrap();

        let mut store = JsonStore::new(temp_dir.path());
        assert!(store.workouts().unwrap().is_empty());

        store
            .save_workout(&create_test_workout(WorkoutType::B))
            .unwrap();
        assert_eq!(store.workouts().unwrap().len(), 1);

        let raw: Vec<serde_json::Value> = serde_json::from_str(
            &std::fs::read_to_string(temp_dir.path().join(WORKOUTS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_update_exercise_weight_upserts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());

        store.update_exercise_weight("Squat", 60.0).unwrap();
        store.update_exercise_weight("Deadlift", 100.0).unwrap();
        store.update_exercise_weight("Squat", 62.5).unwrap();

        let weights = store.current_weights().unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["Squat"], 62.5);
        assert_eq!(weights["Deadlift"], 100.0);
    }

    #[test]
    fn test_negative_stored_weights_ignored() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CURRENT_WEIGHTS_FILE),
            r#"{"Squat": -5, "Bench Press": 40}"#,
        )
        .unwrap();

        let store = JsonStore::new(temp_dir.path());
        let weights = store.current_weights().unwrap();
        assert!(!weights.contains_key("Squat"));
        assert_eq!(weights["Bench Press"], 40.0);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(temp_dir.path());
        store.update_exercise_weight("Squat", 20.0).unwrap();
        store
            .save_workout(&create_test_workout(WorkoutType::A))
            .unwrap();

        let mut names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![CURRENT_WEIGHTS_FILE, WORKOUTS_FILE]);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        store.update_exercise_weight("Squat", 25.0).unwrap();
        store
            .save_workout(&create_test_workout(WorkoutType::A))
            .unwrap();

        assert_eq!(store.current_weights().unwrap()["Squat"], 25.0);
        assert_eq!(
            store.last_workout().unwrap().unwrap().workout_type,
            WorkoutType::A
        );
    }
}
