#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift 5×5 tracker.
//!
//! This crate provides:
//! - Domain types (exercises, set logs, workouts, working weights)
//! - The A/B exercise catalog
//! - Scheduling of the next workout
//! - Set/exercise progression and linear weight progression
//! - Rest timer, fail-confirmation window and plate calculator
//! - Persistence (JSON documents with locking and atomic writes)
//! - History views and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod logging;
pub mod confirm;
pub mod timer;
pub mod plates;
pub mod schedule;
pub mod session;
pub mod store;
pub mod history;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::build_default_catalog;
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigProblem, Severity};
pub use plates::{calculate_plates, PlateCount, PlateLoad};
pub use schedule::NextWorkout;
pub use session::{working_weight, ActiveWorkout, FinishedWorkout, SetTransition};
pub use store::{JsonStore, MemoryStore, WorkoutStore};
pub use timer::RestTimer;
pub use tracker::{TapOutcome, Tracker};
