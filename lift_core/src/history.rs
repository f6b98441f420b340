//! Read-only views over stored workouts: listing, per-exercise progress
//! and CSV export.

use crate::{Result, Workout, WorkoutType};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Working weight of one exercise on one workout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub weight: f64,
}

/// Workouts newest first
pub fn recent_first(workouts: &[Workout]) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    // Later entries first on equal timestamps; sort_by is stable
    sorted.reverse();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Weight series per exercise name, in completion order
pub fn progress_by_exercise(workouts: &[Workout]) -> BTreeMap<String, Vec<ProgressPoint>> {
    let mut series: BTreeMap<String, Vec<ProgressPoint>> = BTreeMap::new();

    for workout in workouts {
        for exercise in &workout.exercises {
            series
                .entry(exercise.name.clone())
                .or_default()
                .push(ProgressPoint {
                    date: workout.date,
                    weight: exercise.weight,
                });
        }
    }

    series
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_id: String,
    workout_type: WorkoutType,
    date: String,
    exercise: &'a str,
    weight: f64,
    sets: usize,
    reps: u32,
}

/// Write one row per exercise snapshot to `path`, replacing any existing
/// file. Returns the number of rows written.
pub fn export_csv(workouts: &[Workout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    let mut rows = 0;
    for workout in workouts {
        let workout_id = workout.id.to_string();
        let date = workout.date.to_rfc3339();
        for exercise in &workout.exercises {
            writer.serialize(CsvRow {
                workout_id: workout_id.clone(),
                workout_type: workout.workout_type,
                date: date.clone(),
                exercise: &exercise.name,
                weight: exercise.weight,
                sets: exercise.sets,
                reps: exercise.reps,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!(
        "Exported {} rows from {} workouts to {:?}",
        rows,
        workouts.len(),
        path
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExerciseRecord;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn workout(workout_type: WorkoutType, days: i64, squat: f64) -> Workout {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap() + Duration::days(days);
        Workout {
            id: Uuid::now_v7(),
            workout_type,
            date,
            exercises: vec![
                ExerciseRecord {
                    name: "Squat".into(),
                    weight: squat,
                    sets: 5,
                    reps: 5,
                    completed: true,
                },
                ExerciseRecord {
                    name: if workout_type == WorkoutType::A {
                        "Bench Press".into()
                    } else {
                        "Overhead Press".into()
                    },
                    weight: 20.0,
                    sets: 5,
                    reps: 5,
                    completed: true,
                },
            ],
            completed: true,
        }
    }

    fn sample() -> Vec<Workout> {
        vec![
            workout(WorkoutType::A, 0, 20.0),
            workout(WorkoutType::B, 2, 22.5),
            workout(WorkoutType::A, 4, 25.0),
        ]
    }

    #[test]
    fn test_recent_first() {
        let workouts = sample();
        let listed = recent_first(&workouts);
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, workouts[2].id);
        assert_eq!(listed[2].id, workouts[0].id);
    }

    #[test]
    fn test_recent_first_same_timestamp_keeps_later_entry_first() {
        let mut workouts = sample();
        workouts[1].date = workouts[0].date;
        let listed = recent_first(&workouts[..2]);
        assert_eq!(listed[0].id, workouts[1].id);
    }

    #[test]
    fn test_progress_series() {
        let progress = progress_by_exercise(&sample());

        let squat: Vec<f64> = progress["Squat"].iter().map(|p| p.weight).collect();
        assert_eq!(squat, vec![20.0, 22.5, 25.0]);
        assert_eq!(progress["Bench Press"].len(), 2);
        assert_eq!(progress["Overhead Press"].len(), 1);
        assert!(progress["Squat"][0].date < progress["Squat"][1].date);
    }

    #[test]
    fn test_progress_empty() {
        assert!(progress_by_exercise(&[]).is_empty());
    }

    #[test]
    fn test_export_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("history.csv");

        let rows = export_csv(&sample(), &path).unwrap();
        assert_eq!(rows, 6);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("workout_id,workout_type,date,exercise,weight,sets,reps")
        );
        let first = lines.next().unwrap();
        assert!(first.contains(",A,2024-01-15T18:00:00+00:00,Squat,20.0,5,5"));
        assert_eq!(contents.lines().count(), 7);
    }

    #[test]
    fn test_export_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");

        export_csv(&sample(), &path).unwrap();
        let rows = export_csv(&sample()[..1], &path).unwrap();
        assert_eq!(rows, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
