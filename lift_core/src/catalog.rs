//! Default catalog of the two 5×5 workouts.
//!
//! Workout A: Squat, Bench Press, Barbell Row.
//! Workout B: Squat, Overhead Press, Deadlift (one heavy set).

use crate::types::{Exercise, WorkoutType};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Weight added to an exercise after a fully successful session (kg)
pub const WEIGHT_INCREMENT: f64 = 2.5;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// The fixed pair of workout programs
#[derive(Clone, Debug)]
pub struct Catalog {
    pub workout_a: Vec<Exercise>,
    pub workout_b: Vec<Exercise>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Exercises for a workout type from the default catalog, in visiting order
pub fn exercises_for(workout_type: WorkoutType) -> &'static [Exercise] {
    get_default_catalog().exercises(workout_type)
}

/// Builds the default catalog
///
/// Prefer `get_default_catalog()`; this is kept for tests and validation.
pub fn build_default_catalog() -> Catalog {
    Catalog {
        workout_a: vec![
            Exercise {
                name: "Squat",
                starting_weight: 20.0,
                sets: 5,
                reps: 5,
            },
            Exercise {
                name: "Bench Press",
                starting_weight: 20.0,
                sets: 5,
                reps: 5,
            },
            Exercise {
                name: "Barbell Row",
                starting_weight: 20.0,
                sets: 5,
                reps: 5,
            },
        ],
        workout_b: vec![
            Exercise {
                name: "Squat",
                starting_weight: 20.0,
                sets: 5,
                reps: 5,
            },
            Exercise {
                name: "Overhead Press",
                starting_weight: 20.0,
                sets: 5,
                reps: 5,
            },
            Exercise {
                name: "Deadlift",
                starting_weight: 40.0,
                sets: 1,
                reps: 5,
            },
        ],
    }
}

impl Catalog {
    pub fn exercises(&self, workout_type: WorkoutType) -> &[Exercise] {
        match workout_type {
            WorkoutType::A => &self.workout_a,
            WorkoutType::B => &self.workout_b,
        }
    }

    /// Validate the catalog, returning a list of problems (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for workout_type in [WorkoutType::A, WorkoutType::B] {
            let exercises = self.exercises(workout_type);
            if exercises.is_empty() {
                errors.push(format!("Workout {} has no exercises", workout_type));
            }

            let mut seen = HashSet::new();
            for exercise in exercises {
                if !seen.insert(exercise.name) {
                    errors.push(format!(
                        "Workout {}: duplicate exercise '{}'",
                        workout_type, exercise.name
                    ));
                }
                if exercise.sets == 0 {
                    errors.push(format!(
                        "Workout {} '{}': set count must be positive",
                        workout_type, exercise.name
                    ));
                }
                if exercise.reps == 0 {
                    errors.push(format!(
                        "Workout {} '{}': target reps must be positive",
                        workout_type, exercise.name
                    ));
                }
                if exercise.starting_weight < 0.0 {
                    errors.push(format!(
                        "Workout {} '{}': starting weight {} is negative",
                        workout_type, exercise.name, exercise.starting_weight
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.workout_a.len(), 3);
        assert_eq!(catalog.workout_b.len(), 3);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_squat_in_both_workouts() {
        let a: Vec<_> = exercises_for(WorkoutType::A).iter().map(|e| e.name).collect();
        let b: Vec<_> = exercises_for(WorkoutType::B).iter().map(|e| e.name).collect();
        assert_eq!(a, vec!["Squat", "Bench Press", "Barbell Row"]);
        assert_eq!(b, vec!["Squat", "Overhead Press", "Deadlift"]);
    }

    #[test]
    fn test_deadlift_is_single_heavier_set() {
        let deadlift = exercises_for(WorkoutType::B)
            .iter()
            .find(|e| e.name == "Deadlift")
            .unwrap();
        assert_eq!(deadlift.sets, 1);
        assert_eq!(deadlift.reps, 5);
        assert_eq!(deadlift.starting_weight, 40.0);
    }

    #[test]
    fn test_validate_flags_duplicates_and_zero_sets() {
        let mut catalog = build_default_catalog();
        catalog.workout_a.push(Exercise {
            name: "Squat",
            starting_weight: 20.0,
            sets: 0,
            reps: 5,
        });

        let errors = catalog.validate();
        assert_eq!(errors.len(), 2, "{:?}", errors);
    }
}
