//! Command surface used by front ends.
//!
//! `Tracker` owns the transient parts of a session (active workout, staged
//! rep count, fail-confirmation window, rest timer) and talks to a
//! `WorkoutStore` for everything durable. Time comes from an injected
//! `Clock`, so the double-tap window is testable without sleeping.

use crate::clock::Clock;
use crate::confirm::{FailWindow, SetRef};
use crate::plates::{plate_load, PlateLoad};
use crate::schedule::{self, NextWorkout};
use crate::session::{ActiveWorkout, FinishedWorkout, SetTransition};
use crate::store::WorkoutStore;
use crate::timer::RestTimer;
use crate::{Config, Error, Result, WorkoutType};

/// What a tap on "complete set" did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// First tap: the set was recorded as a success
    Recorded {
        position: SetRef,
        reps: u32,
        transition: SetTransition,
    },
    /// Second tap inside the window: the set just recorded is now failed
    MarkedFailed { position: SetRef },
}

pub struct Tracker<S, C> {
    store: S,
    clock: C,
    config: Config,
    active: Option<ActiveWorkout>,
    staged_reps: u32,
    fail_window: FailWindow,
    rest_timer: RestTimer,
}

impl<S: WorkoutStore, C: Clock> Tracker<S, C> {
    pub fn new(store: S, clock: C, config: Config) -> Self {
        let rest_timer = RestTimer::from_config(&config.rest_timer);
        Self {
            store,
            clock,
            config,
            active: None,
            staged_reps: 0,
            fail_window: FailWindow::Disarmed,
            rest_timer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Type and date of the next session, from the last stored workout
    pub fn next_workout(&self) -> Result<NextWorkout> {
        let last = self.store.last_workout()?;
        Ok(schedule::next_workout(
            last.map(|w| (w.workout_type, self.clock.local_date(w.date))),
            self.clock.today(),
            &self.config.schedule.days,
        ))
    }

    /// "Today", "Tomorrow", or a weekday name for `next`
    pub fn describe_date(&self, next: &NextWorkout) -> String {
        schedule::format_next_workout_date(next.date, self.clock.today())
    }

    /// Begin a session at the stored working weights
    ///
    /// A session already in progress is abandoned without being saved.
    pub fn start_workout(&mut self, workout_type: WorkoutType) -> Result<&ActiveWorkout> {
        let weights = self.store.current_weights()?;

        if let Some(previous) = self.active.take() {
            tracing::warn!(
                "Abandoning unfinished workout {} to start {}",
                previous.workout_type,
                workout_type
            );
        }

        self.fail_window.disarm();
        self.rest_timer.stop();

        let active = self.active.insert(ActiveWorkout::start(workout_type, &weights));
        self.staged_reps = active.current().map(|e| e.target_reps).unwrap_or(0);
        Ok(&*active)
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    /// Drop the current session without saving it
    pub fn abandon_workout(&mut self) -> Option<ActiveWorkout> {
        self.fail_window.disarm();
        self.rest_timer.stop();
        self.active.take()
    }

    pub fn staged_reps(&self) -> u32 {
        self.staged_reps
    }

    /// Nudge the rep count for the next set, never below zero
    pub fn stage_reps(&mut self, delta: i64) -> u32 {
        let reps = (i64::from(self.staged_reps) + delta).clamp(0, i64::from(u32::MAX));
        self.staged_reps = reps as u32;
        self.staged_reps
    }

    pub fn set_staged_reps(&mut self, reps: u32) {
        self.staged_reps = reps;
    }

    /// Record a set explicitly
    ///
    /// Resets the staged reps to the target of whichever exercise is now
    /// current and starts the rest timer for successful sets. Closes any
    /// open fail-confirmation window.
    pub fn record_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        reps: u32,
        failed: bool,
    ) -> Result<SetTransition> {
        let active = self.active.as_mut().ok_or(Error::NoActiveWorkout)?;
        let transition = active.record_set(exercise_index, set_index, reps, failed)?;

        self.fail_window.disarm();
        if let Some(exercise) = active.current() {
            self.staged_reps = exercise.target_reps;
        }
        if !failed {
            self.rest_timer.start();
        }

        Ok(transition)
    }

    /// The "complete set" button
    ///
    /// First tap records the current set as a success with the staged reps
    /// and opens the fail window. A second tap while the window is open
    /// marks that same set as failed instead.
    pub fn complete_set(&mut self) -> Result<TapOutcome> {
        let now = self.clock.now();

        if self.fail_window.pending(now).is_some() {
            let position = self.override_last_set_failed()?;
            return Ok(TapOutcome::MarkedFailed { position });
        }
        self.fail_window.disarm();

        let position = self
            .active
            .as_ref()
            .ok_or(Error::NoActiveWorkout)?
            .current_position()
            .ok_or(Error::WorkoutComplete)?;
        let reps = self.staged_reps;

        let transition = self.record_set(position.exercise, position.set, reps, false)?;
        self.fail_window = FailWindow::arm(position, now);

        Ok(TapOutcome::Recorded {
            position,
            reps,
            transition,
        })
    }

    /// Set that a second tap right now would mark as failed
    pub fn pending_failure(&self) -> Option<SetRef> {
        self.fail_window.pending(self.clock.now())
    }

    /// Second tap: mark the set just recorded as failed, if still in time
    pub fn override_last_set_failed(&mut self) -> Result<SetRef> {
        let target = self
            .fail_window
            .take(self.clock.now())
            .ok_or(Error::NothingToOverride)?;
        let active = self.active.as_mut().ok_or(Error::NoActiveWorkout)?;
        active.mark_failed(target)?;
        self.rest_timer.stop();

        tracing::info!(
            "Set {} of {} marked as failed",
            target.set + 1,
            active.exercises[target.exercise].name
        );
        Ok(target)
    }

    /// Change an exercise's working weight and store it right away
    pub fn adjust_exercise_weight(&mut self, exercise_index: usize, delta: f64) -> Result<f64> {
        let active = self.active.as_mut().ok_or(Error::NoActiveWorkout)?;
        let weight = active.adjust_weight(exercise_index, delta)?;
        let name = active.exercises[exercise_index].name.clone();
        self.store.update_exercise_weight(&name, weight)?;
        Ok(weight)
    }

    /// Save the session and apply progression
    ///
    /// An open fail window is closed first, so the last success stands.
    /// If the record cannot be saved the session stays active; once it is
    /// saved the session is gone, even if a weight update then fails.
    pub fn finish_workout(&mut self) -> Result<FinishedWorkout> {
        let active = self.active.take().ok_or(Error::NoActiveWorkout)?;
        if !active.is_complete() {
            tracing::warn!(
                "Finishing workout {} before all sets were recorded",
                active.workout_type
            );
        }

        self.fail_window.disarm();
        self.rest_timer.stop();

        let workout = active.to_record(self.clock.now());
        if let Err(e) = self.store.save_workout(&workout) {
            self.active = Some(active);
            return Err(e);
        }

        let progressed =
            active.apply_progression(&mut self.store, self.config.progression.weight_increment)?;

        Ok(FinishedWorkout {
            workout,
            progressed,
        })
    }

    /// Plates per side for `total` with the configured bar and plates
    pub fn calculate_plates(&self, total: f64) -> PlateLoad {
        plate_load(
            total,
            self.config.plates.bar_weight,
            &self.config.plates.sorted_plates(),
        )
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.rest_timer
    }

    pub fn rest_timer_mut(&mut self) -> &mut RestTimer {
        &mut self.rest_timer
    }
}
