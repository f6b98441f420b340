//! Set and exercise progression for one workout session.
//!
//! An `ActiveWorkout` walks its exercises in catalog order and each
//! exercise's sets in order. Recording the last set of the last exercise
//! completes the workout; `finish` then writes the history record and
//! applies linear progression:
//!
//! - Every set completed, not failed and at or above target reps:
//!   next session starts at `weight + increment`
//! - Anything else: weight unchanged (no automatic deload)

use crate::catalog;
use crate::confirm::SetRef;
use crate::store::WorkoutStore;
use crate::{CurrentWeights, Error, Exercise, ExerciseRecord, Result, SetLog, Workout, WorkoutType};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One exercise being performed, with its set slots
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveExercise {
    pub name: String,
    pub sets: usize,
    pub target_reps: u32,
    /// Working weight (kg), adjustable until the exercise is complete
    pub weight: f64,
    pub set_logs: Vec<SetLog>,
    /// Next set to perform; equals `sets` once every set is recorded
    pub current_set: usize,
}

/// Stored working weight for `exercise`, or its starting weight when none
/// is stored or the stored value is zero
pub fn working_weight(exercise: &Exercise, weights: &CurrentWeights) -> f64 {
    weights
        .get(exercise.name)
        .copied()
        .filter(|w| *w > 0.0)
        .unwrap_or(exercise.starting_weight)
}

impl ActiveExercise {
    /// Start from the catalog entry at its current working weight
    pub fn from_catalog(exercise: &Exercise, weights: &CurrentWeights) -> Self {
        let weight = working_weight(exercise, weights);

        Self {
            name: exercise.name.to_string(),
            sets: exercise.sets,
            target_reps: exercise.reps,
            weight,
            set_logs: vec![SetLog::pending(); exercise.sets],
            current_set: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.set_logs.iter().all(|log| log.completed)
    }

    pub fn completed_sets(&self) -> usize {
        self.set_logs.iter().filter(|log| log.completed).count()
    }

    /// True when the weight should go up next time
    pub fn all_successful(&self) -> bool {
        self.set_logs
            .iter()
            .all(|log| log.is_successful(self.target_reps))
    }
}

/// Where the session moved after a set was recorded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetTransition {
    /// Same exercise, next set
    NextSet { exercise: usize, set: usize },
    /// Previous exercise finished; this one is up
    NextExercise { exercise: usize },
    /// Every set of every exercise is recorded
    WorkoutComplete,
}

/// Result of finishing a workout
#[derive(Clone, Debug)]
pub struct FinishedWorkout {
    pub workout: Workout,
    /// Exercises whose working weight went up, with the new weight
    pub progressed: Vec<(String, f64)>,
}

/// A workout in progress
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveWorkout {
    pub workout_type: WorkoutType,
    pub exercises: Vec<ActiveExercise>,
    /// Exercise being performed; equals `exercises.len()` once complete
    pub current_exercise: usize,
    last_recorded: Option<SetRef>,
}

impl ActiveWorkout {
    /// Build a session for `workout_type` from the default catalog
    pub fn start(workout_type: WorkoutType, weights: &CurrentWeights) -> Self {
        Self::from_exercises(workout_type, catalog::exercises_for(workout_type), weights)
    }

    pub fn from_exercises(
        workout_type: WorkoutType,
        exercises: &[Exercise],
        weights: &CurrentWeights,
    ) -> Self {
        let exercises: Vec<ActiveExercise> = exercises
            .iter()
            .map(|e| ActiveExercise::from_catalog(e, weights))
            .collect();

        tracing::info!(
            "Starting workout {} with {} exercises",
            workout_type,
            exercises.len()
        );

        Self {
            workout_type,
            exercises,
            current_exercise: 0,
            last_recorded: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_exercise >= self.exercises.len()
    }

    /// Exercise being performed, None once the workout is complete
    pub fn current(&self) -> Option<&ActiveExercise> {
        self.exercises.get(self.current_exercise)
    }

    /// Position of the next set to record
    pub fn current_position(&self) -> Option<SetRef> {
        self.current().map(|exercise| SetRef {
            exercise: self.current_exercise,
            set: exercise.current_set,
        })
    }

    /// Most recently recorded set
    pub fn last_recorded(&self) -> Option<SetRef> {
        self.last_recorded
    }

    /// Record the outcome of the set at (`exercise_index`, `set_index`)
    ///
    /// Sets must be recorded in order; anything other than the current
    /// position is rejected and leaves the session untouched.
    pub fn record_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        reps: u32,
        failed: bool,
    ) -> Result<SetTransition> {
        let position = self.current_position().ok_or(Error::WorkoutComplete)?;
        if exercise_index >= self.exercises.len() {
            return Err(Error::UnknownExercise(exercise_index));
        }
        if position.exercise != exercise_index || position.set != set_index {
            return Err(Error::OutOfOrder {
                expected_exercise: position.exercise,
                expected_set: position.set,
                exercise: exercise_index,
                set: set_index,
            });
        }

        let exercise = &mut self.exercises[exercise_index];
        exercise.set_logs[set_index] = SetLog {
            set_number: set_index + 1,
            reps,
            completed: true,
            failed,
        };
        self.last_recorded = Some(position);

        tracing::debug!(
            "{} set {}/{}: {} reps at {} kg{}",
            exercise.name,
            set_index + 1,
            exercise.sets,
            reps,
            exercise.weight,
            if failed { " (failed)" } else { "" }
        );

        if set_index + 1 < exercise.sets {
            exercise.current_set = set_index + 1;
            return Ok(SetTransition::NextSet {
                exercise: exercise_index,
                set: set_index + 1,
            });
        }

        exercise.current_set = exercise.sets;
        self.current_exercise += 1;

        if self.is_complete() {
            tracing::info!("Workout {} complete", self.workout_type);
            Ok(SetTransition::WorkoutComplete)
        } else {
            Ok(SetTransition::NextExercise {
                exercise: self.current_exercise,
            })
        }
    }

    /// Turn the most recently recorded set into a failure, keeping its reps
    pub fn mark_failed(&mut self, target: SetRef) -> Result<()> {
        if self.last_recorded != Some(target) {
            return Err(Error::NothingToOverride);
        }

        let log = self
            .exercises
            .get_mut(target.exercise)
            .and_then(|e| e.set_logs.get_mut(target.set))
            .ok_or(Error::NothingToOverride)?;
        if !log.completed {
            return Err(Error::NothingToOverride);
        }
        log.failed = true;

        tracing::debug!(
            "Marked exercise {} set {} as failed",
            target.exercise,
            target.set + 1
        );
        Ok(())
    }

    /// Change an exercise's working weight by `delta` kg, never below zero
    ///
    /// Returns the new weight. Rejected once all of the exercise's sets are
    /// recorded.
    pub fn adjust_weight(&mut self, exercise_index: usize, delta: f64) -> Result<f64> {
        let exercise = self
            .exercises
            .get_mut(exercise_index)
            .ok_or(Error::UnknownExercise(exercise_index))?;
        if exercise.is_complete() {
            return Err(Error::ExerciseComplete(exercise.name.clone()));
        }

        let adjusted = exercise.weight + delta;
        exercise.weight = if adjusted.is_finite() {
            adjusted.max(0.0)
        } else {
            exercise.weight
        };

        tracing::debug!("{} weight now {} kg", exercise.name, exercise.weight);
        Ok(exercise.weight)
    }

    /// History record for this session as of `now`
    pub fn to_record(&self, now: DateTime<Utc>) -> Workout {
        Workout {
            id: Uuid::now_v7(),
            workout_type: self.workout_type,
            date: now,
            exercises: self
                .exercises
                .iter()
                .map(|e| ExerciseRecord {
                    name: e.name.clone(),
                    weight: e.weight,
                    sets: e.sets,
                    reps: e.target_reps,
                    completed: true,
                })
                .collect(),
            completed: true,
        }
    }

    /// Append the history record and progress weights of fully successful
    /// exercises. Consumes the session.
    pub fn finish<S: WorkoutStore + ?Sized>(
        self,
        store: &mut S,
        now: DateTime<Utc>,
        increment: f64,
    ) -> Result<FinishedWorkout> {
        let workout = self.to_record(now);
        store.save_workout(&workout)?;
        let progressed = self.apply_progression(store, increment)?;

        Ok(FinishedWorkout {
            workout,
            progressed,
        })
    }

    /// Store `weight + increment` for every exercise whose sets all
    /// succeeded; returns those exercises with their new weight
    ///
    /// Only call once the history record is saved.
    pub fn apply_progression<S: WorkoutStore + ?Sized>(
        &self,
        store: &mut S,
        increment: f64,
    ) -> Result<Vec<(String, f64)>> {
        let mut progressed = Vec::new();
        for exercise in &self.exercises {
            if exercise.all_successful() {
                let next = exercise.weight + increment;
                store.update_exercise_weight(&exercise.name, next)?;
                tracing::info!(
                    "{}: all sets successful, next session at {} kg",
                    exercise.name,
                    next
                );
                progressed.push((exercise.name.clone(), next));
            } else {
                tracing::info!(
                    "{}: staying at {} kg ({}/{} sets completed)",
                    exercise.name,
                    exercise.weight,
                    exercise.completed_sets(),
                    exercise.sets
                );
            }
        }

        Ok(progressed)
    }
}
