//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A set was recorded somewhere other than the current position
    #[error(
        "Set recorded out of order: expected exercise {expected_exercise} set {expected_set}, \
         got exercise {exercise} set {set}"
    )]
    OutOfOrder {
        expected_exercise: usize,
        expected_set: usize,
        exercise: usize,
        set: usize,
    },

    /// Every set of the workout has already been recorded
    #[error("Workout is already complete")]
    WorkoutComplete,

    /// The exercise has all of its sets recorded
    #[error("Exercise '{0}' is already complete")]
    ExerciseComplete(String),

    /// Exercise index outside the active workout
    #[error("No exercise at index {0}")]
    UnknownExercise(usize),

    /// There is no recent set that can be marked as failed
    #[error("No set is waiting for a failure override")]
    NothingToOverride,

    /// A command needed an active workout but none was started
    #[error("No workout in progress")]
    NoActiveWorkout,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
