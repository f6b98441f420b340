use chrono::Local;
use clap::{Parser, Subcommand};
use lift_core::timer::format_remaining;
use lift_core::*;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type CliTracker = Tracker<JsonStore, SystemClock>;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "5x5 strength training tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the next scheduled workout (default)
    Next,

    /// Perform a workout and log it
    Start {
        /// Workout to perform (A or B); defaults to the scheduled one
        #[arg(long = "type", value_name = "A|B")]
        workout_type: Option<WorkoutType>,

        /// Auto-complete (for testing) - record every set at target reps
        #[arg(long)]
        auto_complete: bool,

        /// With --auto-complete, fail the first set of this exercise
        #[arg(long = "fail", value_name = "EXERCISE", requires = "auto_complete")]
        fail: Vec<String>,
    },

    /// List finished workouts, newest first
    History {
        /// Show at most this many workouts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Weight progression per exercise
    Progress,

    /// Current working weights
    Weights,

    /// Export workout history to CSV
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Plates to load on each side of the bar
    Plates {
        /// Target total weight (kg)
        total: f64,

        /// Bar weight (kg); defaults to the configured bar
        #[arg(long)]
        bar: Option<f64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    lift_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    for problem in config.validate() {
        match problem.severity {
            Severity::Warning => tracing::warn!("Config: {}", problem),
            Severity::Error => tracing::error!("Config: {}", problem),
        }
    }
    config.ensure_valid()?;

    // Determine data directory
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let mut tracker = Tracker::new(JsonStore::new(data_dir), SystemClock, config);

    match cli.command.unwrap_or(Commands::Next) {
        Commands::Next => cmd_next(&tracker),
        Commands::Start {
            workout_type,
            auto_complete,
            fail,
        } => cmd_start(&mut tracker, workout_type, auto_complete, &fail),
        Commands::History { limit } => cmd_history(&tracker, limit),
        Commands::Progress => cmd_progress(&tracker),
        Commands::Weights => cmd_weights(&tracker),
        Commands::Export { path } => cmd_export(&tracker, &path),
        Commands::Plates { total, bar } => cmd_plates(&tracker, total, bar),
    }
}

fn fmt_kg(weight: f64) -> String {
    format!("{} kg", weight)
}

fn cmd_next(tracker: &CliTracker) -> Result<()> {
    let next = tracker.next_workout()?;
    let weights = tracker.store().current_weights()?;

    println!(
        "Next workout: {} ({})",
        next.workout_type,
        tracker.describe_date(&next)
    );
    println!();

    for exercise in catalog::exercises_for(next.workout_type) {
        let weight = working_weight(exercise, &weights);
        println!(
            "  {:<16} {}x{}  {}",
            exercise.name,
            exercise.sets,
            exercise.reps,
            fmt_kg(weight)
        );
    }

    Ok(())
}

fn cmd_start(
    tracker: &mut CliTracker,
    workout_type: Option<WorkoutType>,
    auto_complete: bool,
    fail: &[String],
) -> Result<()> {
    let catalog = build_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let workout_type = match workout_type {
        Some(workout_type) => workout_type,
        None => tracker.next_workout()?.workout_type,
    };

    let exercises = catalog.exercises(workout_type);
    if let Some(unknown) = fail
        .iter()
        .find(|name| !exercises.iter().any(|e| e.name.eq_ignore_ascii_case(name)))
    {
        return Err(Error::Other(format!(
            "Workout {} has no exercise named '{}'",
            workout_type, unknown
        )));
    }

    tracker.start_workout(workout_type)?;
    display_workout(tracker);

    if auto_complete {
        auto_complete_workout(tracker, fail)?;
    } else if !run_interactive(tracker)? {
        println!("\nWorkout abandoned - nothing logged.");
        return Ok(());
    }

    let finished = tracker.finish_workout()?;
    display_summary(&finished);

    Ok(())
}

fn display_workout(tracker: &CliTracker) {
    let Some(active) = tracker.active() else {
        return;
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT {}", active.workout_type);
    println!("╰─────────────────────────────────────────╯");
    println!();
    for exercise in &active.exercises {
        println!(
            "  {:<16} {}x{}  {}",
            exercise.name,
            exercise.sets,
            exercise.target_reps,
            fmt_kg(exercise.weight)
        );
    }
    println!();
}

/// Record every set at target reps, failing the first set of each exercise
/// named in `fail`
fn auto_complete_workout(tracker: &mut CliTracker, fail: &[String]) -> Result<()> {
    while let Some(position) = tracker.active().and_then(|a| a.current_position()) {
        let Some((name, reps)) = tracker
            .active()
            .and_then(|a| a.current())
            .map(|e| (e.name.clone(), e.target_reps))
        else {
            break;
        };

        let failed = position.set == 0 && fail.iter().any(|f| f.eq_ignore_ascii_case(&name));
        tracker.record_set(position.exercise, position.set, reps, failed)?;

        println!(
            "  {} set {}: {} reps{}",
            name,
            position.set + 1,
            reps,
            if failed { " (failed)" } else { "" }
        );
    }

    Ok(())
}

fn print_controls() {
    println!("─────────────────────────────────────────");
    println!("Press Enter to complete a set");
    println!("  Enter again within 2s (or 'f') to mark it failed");
    println!("  '+' / '-' to change reps, 'w+' / 'w-' to change weight");
    println!("  's' to skip rest, 'q' to abandon");
}

fn print_status(tracker: &CliTracker) {
    let Some(active) = tracker.active() else {
        return;
    };

    match active.current() {
        Some(exercise) => println!(
            "{} - set {}/{} @ {} - {} reps",
            exercise.name,
            exercise.current_set + 1,
            exercise.sets,
            fmt_kg(exercise.weight),
            tracker.staged_reps()
        ),
        None => println!("All sets recorded. Press Enter to finish."),
    }

    let timer = tracker.rest_timer();
    if timer.is_active() {
        println!("  Rest: {} ('s' to skip)", format_remaining(timer.remaining()));
    }
}

/// Advance the rest timer by the whole seconds elapsed since `last_tick`
fn catch_up_rest(tracker: &mut CliTracker, last_tick: &mut Instant) {
    let elapsed = last_tick.elapsed().as_secs();
    if elapsed == 0 {
        return;
    }
    *last_tick += Duration::from_secs(elapsed);

    for _ in 0..elapsed {
        if tracker.rest_timer_mut().tick() {
            println!("⏰ Rest over - next set!");
            break;
        }
    }
}

/// Drive the workout from stdin. Returns false if it was abandoned.
fn run_interactive(tracker: &mut CliTracker) -> Result<bool> {
    print_controls();

    let step = tracker.config().progression.weight_step;
    let stdin = io::stdin();
    let mut last_tick = Instant::now();

    loop {
        catch_up_rest(tracker, &mut last_tick);
        println!();
        print_status(tracker);
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            tracker.abandon_workout();
            return Ok(false);
        }
        catch_up_rest(tracker, &mut last_tick);

        let complete = tracker.active().map_or(true, |a| a.is_complete());
        let command = input.trim().to_lowercase();

        match command.as_str() {
            "" if complete && tracker.pending_failure().is_none() => return Ok(true),
            "" => match tracker.complete_set() {
                Ok(TapOutcome::Recorded { reps, .. }) => {
                    println!("✓ Set recorded ({} reps)", reps);
                }
                Ok(TapOutcome::MarkedFailed { .. }) => println!("✗ Set marked as failed"),
                Err(e) => println!("  {}", e),
            },
            "f" => match tracker.override_last_set_failed() {
                Ok(_) => println!("✗ Set marked as failed"),
                Err(e) => println!("  {}", e),
            },
            "+" => {
                tracker.stage_reps(1);
            }
            "-" => {
                tracker.stage_reps(-1);
            }
            "w+" | "w-" => {
                let delta = if command == "w+" { step } else { -step };
                let Some(index) = tracker.active().map(|a| a.current_exercise) else {
                    continue;
                };
                match tracker.adjust_exercise_weight(index, delta) {
                    Ok(weight) => println!("  Weight now {}", fmt_kg(weight)),
                    Err(e) => println!("  {}", e),
                }
            }
            "s" => tracker.rest_timer_mut().skip(),
            "q" => {
                tracker.abandon_workout();
                return Ok(false);
            }
            _ => print_controls(),
        }
    }
}

fn display_summary(finished: &FinishedWorkout) {
    println!("\n✓ Workout {} logged!", finished.workout.workout_type);

    for exercise in &finished.workout.exercises {
        match finished
            .progressed
            .iter()
            .find(|(name, _)| *name == exercise.name)
        {
            Some((_, next)) => println!(
                "  {:<16} {} → {} next time",
                exercise.name,
                fmt_kg(exercise.weight),
                fmt_kg(*next)
            ),
            None => println!(
                "  {:<16} staying at {}",
                exercise.name,
                fmt_kg(exercise.weight)
            ),
        }
    }
}

fn cmd_history(tracker: &CliTracker, limit: Option<usize>) -> Result<()> {
    let workouts = tracker.store().workouts()?;
    if workouts.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for workout in history::recent_first(&workouts)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
    {
        let exercises: Vec<String> = workout
            .exercises
            .iter()
            .map(|e| format!("{} {}", e.name, fmt_kg(e.weight)))
            .collect();
        println!(
            "{}  {}  {}",
            workout.date.with_timezone(&Local).format("%Y-%m-%d"),
            workout.workout_type,
            exercises.join(", ")
        );
    }

    Ok(())
}

fn cmd_progress(tracker: &CliTracker) -> Result<()> {
    let workouts = tracker.store().workouts()?;
    if workouts.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for (name, points) in history::progress_by_exercise(&workouts) {
        let series: Vec<String> = points.iter().map(|p| p.weight.to_string()).collect();
        println!("{:<16} {} kg", name, series.join(" → "));
    }

    Ok(())
}

fn cmd_weights(tracker: &CliTracker) -> Result<()> {
    let weights = tracker.store().current_weights()?;
    let catalog = catalog::get_default_catalog();
    let mut seen = HashSet::new();

    for exercise in catalog.workout_a.iter().chain(&catalog.workout_b) {
        if !seen.insert(exercise.name) {
            continue;
        }
        match weights.get(exercise.name).filter(|w| **w > 0.0) {
            Some(weight) => println!("{:<16} {}", exercise.name, fmt_kg(*weight)),
            None => println!(
                "{:<16} {} (starting)",
                exercise.name,
                fmt_kg(exercise.starting_weight)
            ),
        }
    }

    Ok(())
}

fn cmd_export(tracker: &CliTracker, path: &Path) -> Result<()> {
    let workouts = tracker.store().workouts()?;
    let rows = history::export_csv(&workouts, path)?;

    println!("✓ Exported {} rows to {}", rows, path.display());
    Ok(())
}

fn cmd_plates(tracker: &CliTracker, total: f64, bar: Option<f64>) -> Result<()> {
    let load = match bar {
        Some(bar) if !bar.is_finite() || bar < 0.0 => {
            return Err(Error::Other(format!("Invalid bar weight: {}", bar)));
        }
        Some(bar) => plates::plate_load(total, bar, &tracker.config().plates.sorted_plates()),
        None => tracker.calculate_plates(total),
    };

    println!("{} on a {} bar", fmt_kg(load.total), fmt_kg(load.bar_weight));
    if load.plates.is_empty() {
        println!("  Bar only");
    } else {
        println!("  Per side: {}", fmt_kg(load.per_side));
        for plate in &load.plates {
            println!("    {} × {}", plate.count, fmt_kg(plate.weight));
        }
    }

    if load.leftover > 0.0 {
        println!(
            "  {} per side cannot be made with the available plates",
            fmt_kg(load.leftover)
        );
    }

    Ok(())
}
