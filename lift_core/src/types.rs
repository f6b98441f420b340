//! Core domain types for the Lift system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Catalog exercises and the two workout programs
//! - Set logs recorded during a session
//! - Finished workout records and current working weights

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Catalog Types
// ============================================================================

/// One of the two alternating programs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorkoutType {
    A,
    B,
}

impl WorkoutType {
    /// The program that follows this one
    pub fn alternate(self) -> Self {
        match self {
            WorkoutType::A => WorkoutType::B,
            WorkoutType::B => WorkoutType::A,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutType::A => f.write_str("A"),
            WorkoutType::B => f.write_str("B"),
        }
    }
}

impl FromStr for WorkoutType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(WorkoutType::A),
            "B" => Ok(WorkoutType::B),
            other => Err(crate::Error::Other(format!(
                "Unknown workout type '{}' (expected A or B)",
                other
            ))),
        }
    }
}

/// A catalog exercise prescription (e.g., "Squat 5x5 starting at 20kg")
#[derive(Clone, Debug, PartialEq)]
pub struct Exercise {
    pub name: &'static str,
    pub starting_weight: f64,
    pub sets: usize,
    pub reps: u32,
}

// ============================================================================
// Session Types
// ============================================================================

/// The recorded outcome of one set slot
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetLog {
    /// 1-based set number; 0 while the slot is still pending
    pub set_number: usize,
    pub reps: u32,
    pub completed: bool,
    #[serde(default)]
    pub failed: bool,
}

impl SetLog {
    /// A slot that has not been attempted yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// Whether this set was completed without failure at or above `target` reps
    pub fn is_successful(&self, target: u32) -> bool {
        self.completed && !self.failed && self.reps >= target
    }
}

// ============================================================================
// History Types
// ============================================================================

/// Snapshot of one exercise as it stood when a workout was finished
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub name: String,
    /// Working weight used for the session (kg)
    pub weight: f64,
    pub sets: usize,
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
}

/// A finished workout, appended to the history log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub date: DateTime<Utc>,
    pub exercises: Vec<ExerciseRecord>,
    pub completed: bool,
}

/// Exercise name to working weight (kg) used to start the next session
pub type CurrentWeights = BTreeMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_type_alternates() {
        assert_eq!(WorkoutType::A.alternate(), WorkoutType::B);
        assert_eq!(WorkoutType::B.alternate(), WorkoutType::A);
    }

    #[test]
    fn test_workout_type_parse() {
        assert_eq!("a".parse::<WorkoutType>().unwrap(), WorkoutType::A);
        assert_eq!(" B ".parse::<WorkoutType>().unwrap(), WorkoutType::B);
        assert!("C".parse::<WorkoutType>().is_err());
    }

    #[test]
    fn test_workout_json_field_names() {
        let workout = Workout {
            id: Uuid::now_v7(),
            workout_type: WorkoutType::B,
            date: Utc::now(),
            exercises: vec![ExerciseRecord {
                name: "Deadlift".into(),
                weight: 40.0,
                sets: 1,
                reps: 5,
                completed: true,
            }],
            completed: true,
        };

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["type"], "B");
        assert_eq!(value["exercises"][0]["name"], "Deadlift");
        assert_eq!(value["exercises"][0]["weight"], 40.0);
        assert_eq!(value["completed"], true);
    }

    #[test]
    fn test_set_log_success_requires_target_reps() {
        let log = SetLog {
            set_number: 1,
            reps: 4,
            completed: true,
            failed: false,
        };
        assert!(!log.is_successful(5));
        assert!(log.is_successful(4));
        assert!(!SetLog::pending().is_successful(0));
    }
}
