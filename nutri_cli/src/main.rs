use clap::{Parser, Subcommand};
use nutri_core::chat::{ChatLog, SUGGESTED_PROMPTS};
use nutri_core::csv_export::write_daily_totals;
use nutri_core::energy::calorie_percent;
use nutri_core::units::{format_feet_inches, format_liters};
use nutri_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nutrilog")]
#[command(about = "Personal nutrition and hydration tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI and store it as the latest reading
    Bmi {
        /// Weight in kilograms
        #[arg(long, allow_hyphen_values = true)]
        weight: f64,

        /// Height in centimetres
        #[arg(long, conflicts_with_all = ["feet", "inches"], required_unless_present = "feet")]
        height_cm: Option<f64>,

        /// Height in feet (combine with --inches)
        #[arg(long)]
        feet: Option<u32>,

        #[arg(long, requires = "feet")]
        inches: Option<u32>,
    },

    /// Show today's calorie target and progress
    Calories,

    /// Log and review meals
    Meal {
        #[command(subcommand)]
        action: MealAction,
    },

    /// Track glasses of water
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Convert heights between metric and imperial
    Height {
        #[command(subcommand)]
        action: HeightAction,
    },

    /// View or edit the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Ask the nutrition assistant
    Chat {
        /// Message text (omit to list suggested prompts)
        message: Vec<String>,
    },

    /// Dashboard for today (default)
    Summary,

    /// Daily totals from the activity journal
    History {
        /// Number of trailing days to include
        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(i64).range(1..=36500)
        )]
        days: i64,

        /// Write the totals to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MealAction {
    /// Append a meal to a slot (breakfast, lunch, dinner, snacks)
    Add {
        slot: String,
        name: String,
        #[arg(allow_hyphen_values = true)]
        kcal: i64,
    },
    /// List today's meals by slot
    List,
    /// Suggest foods from the built-in catalog
    Suggest { query: String },
}

#[derive(Subcommand)]
enum WaterAction {
    /// Drink one glass
    Add,
    /// Undo one glass
    Remove,
    /// Back to zero glasses
    Reset,
    /// Show intake against the goal
    Status,
    /// Set the daily goal in glasses
    Goal {
        #[arg(allow_hyphen_values = true)]
        glasses: i64,
    },
}

#[derive(Subcommand)]
enum HeightAction {
    /// Centimetres to feet and inches
    ToImperial { cm: f64 },
    /// Feet and inches to centimetres
    ToMetric { feet: u32, inches: u32 },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Update profile fields; unspecified fields are kept
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long, requires_all = ["height_cm", "age", "gender"])]
        weight: Option<f64>,
        #[arg(long)]
        height_cm: Option<f64>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        /// Toggle a fitness goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
    },
}

fn main() -> Result<()> {
    nutri_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Height { action }) => cmd_height(action),
        Some(Commands::Chat { message }) => cmd_chat(&message.join(" ")),
        Some(Commands::Meal {
            action: MealAction::Suggest { query },
        }) => cmd_meal_suggest(&query),
        Some(Commands::History { days, export }) => cmd_history(&data_dir, days, export),
        command => {
            let mut tracker = open_tracker(&data_dir, &config)?;
            match command.unwrap_or(Commands::Summary) {
                Commands::Bmi {
                    weight,
                    height_cm,
                    feet,
                    inches,
                } => {
                    let height_cm = match (height_cm, feet) {
                        (Some(cm), _) => cm,
                        (None, Some(feet)) => feet_inches_to_cm(feet, inches.unwrap_or(0)),
                        (None, None) => {
                            return Err(Error::InvalidInput("height is required".into()))
                        }
                    };
                    cmd_bmi(&mut tracker, weight, height_cm)
                }
                Commands::Calories => cmd_calories(&tracker),
                Commands::Meal { action } => cmd_meal(&mut tracker, action),
                Commands::Water { action } => cmd_water(&mut tracker, action),
                Commands::Profile { action } => cmd_profile(&mut tracker, action),
                Commands::Summary => cmd_summary(&tracker),
                Commands::Height { .. } | Commands::Chat { .. } | Commands::History { .. } => {
                    Ok(())
                }
            }
        }
    }
}

fn open_tracker(data_dir: &Path, config: &Config) -> Result<Tracker<FileStore>> {
    let journal_dir = data_dir.join("journal");
    std::fs::create_dir_all(&journal_dir)?;

    let store = FileStore::new(data_dir.join("store.json"));
    let journal = JsonlJournal::new(journal_dir.join("activity.jsonl"));
    Ok(Tracker::new(store, TrackerSettings::from(config)).with_journal(journal))
}

fn warn_unsaved(persisted: bool) {
    if !persisted {
        tracing::debug!("Reporting unsaved change to the user");
        eprintln!("⚠ Could not save to storage; this change is not saved.");
    }
}

fn cmd_bmi(tracker: &mut Tracker<FileStore>, weight: f64, height_cm: f64) -> Result<()> {
    let recorded = tracker.record_bmi(weight, height_cm)?;
    let bmi = &recorded.value;

    println!("BMI: {:.1} ({})", bmi.value, bmi.category);
    println!("  Height: {:.1} cm ({})", height_cm, format_feet_inches(height_cm));

    let budget = tracker.budget_for(weight, bmi.category);
    println!("  Suggested target: {} kcal/day ({})", budget.target_kcal, budget.label);
    println!("  {}", budget.advice);

    warn_unsaved(recorded.persisted);
    Ok(())
}

fn cmd_calories(tracker: &Tracker<FileStore>) -> Result<()> {
    let goal = tracker.calorie_goal();
    let consumed = tracker.calories_consumed();

    match &goal.budget {
        Some(budget) => {
            println!("Maintenance: {} kcal/day", budget.maintenance_kcal);
            println!("Target: {} kcal/day ({})", budget.target_kcal, budget.label);
            println!("  {}", budget.advice);
        }
        None => {
            println!("Target: {} kcal/day ({})", goal.target_kcal, goal.label);
            println!("  Record your BMI for a personalised target.");
        }
    }
    println!(
        "Consumed: {} kcal ({}%)",
        consumed,
        calorie_percent(consumed, goal.target_kcal)
    );
    Ok(())
}

fn cmd_meal(tracker: &mut Tracker<FileStore>, action: MealAction) -> Result<()> {
    match action {
        MealAction::Add { slot, name, kcal } => {
            let slot: MealSlot = slot.parse()?;
            let entry = MealEntry::new(name, kcal)?;
            let recorded = tracker.log_meal(slot, entry);
            println!(
                "✓ Added to {}. Total today: {} kcal",
                slot,
                recorded.value.total_calories()
            );
            warn_unsaved(recorded.persisted);
        }
        MealAction::List => {
            let ledger = tracker.meals();
            for slot in MealSlot::ALL {
                println!("{} ({} kcal)", slot, ledger.slot_calories(slot));
                for entry in ledger.entries(slot) {
                    println!("  - {}: {} kcal", entry.name, entry.calories);
                }
            }
            println!("Total: {} kcal", ledger.total_calories());
        }
        MealAction::Suggest { query } => cmd_meal_suggest(&query)?,
    }
    Ok(())
}

fn cmd_meal_suggest(query: &str) -> Result<()> {
    let matches = nutri_core::foods::suggest(query);
    if matches.is_empty() {
        println!("No matching foods.");
    }
    for food in matches {
        println!("{}: {} kcal", food.name, food.calories);
    }
    Ok(())
}

fn cmd_water(tracker: &mut Tracker<FileStore>, action: WaterAction) -> Result<()> {
    let glass_ml = tracker.settings().glass_ml;

    let (ledger, persisted) = match action {
        WaterAction::Add => {
            let recorded = tracker.add_glass();
            if recorded.value.goal_reached {
                println!("💧 Daily water goal reached! Great job staying hydrated.");
            }
            (recorded.value.ledger, recorded.persisted)
        }
        WaterAction::Remove => {
            let recorded = tracker.remove_glass();
            (recorded.value, recorded.persisted)
        }
        WaterAction::Reset => {
            let recorded = tracker.reset_water();
            (recorded.value, recorded.persisted)
        }
        WaterAction::Goal { glasses } => {
            let recorded = tracker.set_water_goal(glasses)?;
            (recorded.value, recorded.persisted)
        }
        WaterAction::Status => (tracker.water(), true),
    };

    println!(
        "Water: {}/{} glasses ({})",
        ledger.glasses,
        ledger.goal_glasses,
        format_liters(ledger.intake_liters(glass_ml))
    );
    warn_unsaved(persisted);
    Ok(())
}

fn cmd_height(action: HeightAction) -> Result<()> {
    match action {
        HeightAction::ToImperial { cm } => {
            let (feet, inches) = cm_to_feet_inches(cm);
            println!("{}'{}\"", feet, inches);
        }
        HeightAction::ToMetric { feet, inches } => {
            println!("{:.1} cm", feet_inches_to_cm(feet, inches));
        }
    }
    Ok(())
}

fn cmd_profile(tracker: &mut Tracker<FileStore>, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => match tracker.profile() {
            Some(profile) => print_profile(&profile),
            None => println!("No profile yet. Use `nutrilog profile set` to create one."),
        },
        ProfileAction::Set {
            name,
            username,
            bio,
            weight,
            height_cm,
            age,
            gender,
            goals,
        } => {
            let mut profile = tracker.profile().unwrap_or_default();
            if let Some(name) = name {
                profile.set_full_name(&name);
            }
            if let Some(username) = username {
                profile.username = username;
            }
            if let Some(bio) = bio {
                profile.bio = bio;
            }
            if let (Some(weight), Some(height_cm), Some(age), Some(gender)) =
                (weight, height_cm, age, gender)
            {
                profile.metrics = Some(BodyMetrics::new(weight, height_cm, age, gender.parse()?)?);
            }
            for goal in goals {
                profile.toggle_goal(goal.parse()?);
            }

            let recorded = tracker.save_profile(profile);
            print_profile(&recorded.value);
            warn_unsaved(recorded.persisted);
        }
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("[{}] {}", profile.initial(), profile.full_name());
    if !profile.username.is_empty() {
        println!("  @{}", profile.username);
    }
    if !profile.bio.is_empty() {
        println!("  {}", profile.bio);
    }
    if let Some(metrics) = &profile.metrics {
        println!(
            "  {:.1} kg, {:.1} cm ({}), age {}, {:?}",
            metrics.weight_kg,
            metrics.height_cm,
            format_feet_inches(metrics.height_cm),
            metrics.age,
            metrics.gender
        );
    }
    if !profile.goals.is_empty() {
        let goals: Vec<_> = profile.goals.iter().map(|g| g.as_str()).collect();
        println!("  Goals: {}", goals.join(", "));
    }
}

fn cmd_chat(message: &str) -> Result<()> {
    let mut log = ChatLog::new();
    match log.send(message, chrono::Utc::now()) {
        Some(reply) => println!("{}", reply.text),
        None => {
            println!("Try asking:");
            for prompt in SUGGESTED_PROMPTS {
                println!("  - {}", prompt);
            }
        }
    }
    Ok(())
}

fn cmd_summary(tracker: &Tracker<FileStore>) -> Result<()> {
    let summary = tracker.summary();

    match &summary.bmi {
        Some(bmi) => println!("BMI: {:.1} ({})", bmi.bmi, bmi.category),
        None => println!("BMI: not recorded"),
    }
    println!(
        "Calories: {} / {} kcal ({}%)",
        summary.calories_consumed,
        summary.calorie_goal.target_kcal,
        (summary.calorie_progress * 100.0).round() as i64
    );
    println!(
        "Water: {}/{} glasses ({} of {} ml)",
        summary.water.glasses, summary.water.goal_glasses, summary.water_ml, summary.water_target_ml
    );
    Ok(())
}

fn cmd_history(data_dir: &Path, days: i64, export: Option<PathBuf>) -> Result<()> {
    let journal_path = data_dir.join("journal/activity.jsonl");
    if !journal_path.exists() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    let events = load_recent_events(&journal_path, days)?;
    let totals = daily_totals(&events);
    tracing::debug!("Folded {} events into {} days", events.len(), totals.len());

    for day in &totals {
        let water = day
            .water_glasses
            .map(|g| format!("{} glasses", g))
            .unwrap_or_else(|| "-".into());
        let bmi = day
            .bmi
            .map(|b| format!("{:.1}", b))
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  {:>5} kcal  {:>2} meals  water {}  bmi {}",
            day.date, day.calories, day.meals, water, bmi
        );
    }

    if let Some(csv_path) = export {
        let count = write_daily_totals(&csv_path, &totals)?;
        println!("✓ Exported {} days to {}", count, csv_path.display());
    }
    Ok(())
}
