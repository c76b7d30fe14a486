use clap::{CommandFactory, Parser};
use mental_load_cli::cli::{
    Cli, Command, ConfigOverrideTarget, describe_parse_error, parse_config_override,
    resolve_date_keyword, split_command_line,
};
use mental_load_core::config::{
    Config, ConfigOverrides, Palette, Theme, load_config_with_fallback, merge_overrides,
};
use mental_load_core::error::AppError;
use mental_load_core::model::input::format_date;
use mental_load_core::model::{Label, Priority, RepeatRule, Task, TaskInput, TaskPatch};
use mental_load_core::organizer::TaskFilter;
use mental_load_core::storage::json_store::store_path;
use mental_load_core::task_api::{self, TaskOverview};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "MENTAL_LOAD_LOG";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Repeat")]
    repeat: String,
    #[tabled(rename = "Reminder")]
    reminder: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            done: done_marker(task).to_string(),
            name: task.name.clone(),
            priority: task.priority.label().to_string(),
            date: task.scheduled_date.clone(),
            repeat: task.repeat_rule.label().to_string(),
            reminder: task.reminder.to_string(),
        }
    }
}

/// Everything a command needs besides its own arguments.
struct Session {
    store: PathBuf,
    config: Config,
    palette: Palette,
    json: bool,
}

impl Session {
    fn start(cli: &Cli) -> Result<Self, AppError> {
        let overrides = build_overrides(&cli.config_override)?;
        let loaded = load_config_with_fallback();
        if let Some(err) = loaded.error {
            tracing::warn!(error = %err, "config could not be loaded, using defaults");
        }
        let config = merge_overrides(&loaded.config, &overrides);
        let store = store_path(config.store_path.as_deref())?;
        tracing::debug!(store = %store.display(), "resolved store path");
        let palette = config.theme.unwrap_or_default().palette();

        Ok(Self {
            store,
            config,
            palette,
            json: cli.json,
        })
    }

    fn print_task(&self, verb: &str, task: &Task) -> Result<(), AppError> {
        if self.json {
            print_json(task)
        } else {
            println!("{verb} task: {} (#{})", task.name, task.id);
            Ok(())
        }
    }
}

fn build_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::validation)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => {
                overrides.theme = Some(Theme::parse_label(&parsed.value)?)
            }
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value))
            }
            ConfigOverrideTarget::DefaultPriority => {
                overrides.default_priority = Some(Priority::parse_label(&parsed.value)?)
            }
            ConfigOverrideTarget::DefaultRepeat => {
                overrides.default_repeat = Some(RepeatRule::parse_label(&parsed.value)?)
            }
        }
    }
    Ok(overrides)
}

fn today() -> time::Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn expand_date(raw: String) -> Result<String, AppError> {
    match resolve_date_keyword(&raw, today()) {
        Some(date) => format_date(date),
        None => Ok(raw),
    }
}

fn done_marker(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn print_overview_plain(overview: &TaskOverview, palette: &Palette) {
    if overview.groups.is_empty() {
        println!("No tasks.");
        return;
    }

    for group in &overview.groups {
        let done = group.tasks.iter().filter(|task| task.completed).count();
        let heading = format!("{} ({}/{})", group.category, done, group.tasks.len());
        println!("{}", palette.heading(&heading));

        let rows: Vec<TaskRow> = group.tasks.iter().map(TaskRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::psql());
        println!("{table}");
        println!();
    }

    let summary = format!(
        "{} of {} tasks completed",
        overview.completed, overview.total
    );
    println!("{}", palette.summary(&summary));
}

fn print_task_details(task: &Task) {
    println!("#{} {} {}", task.id, done_marker(task), task.name);
    println!("  category: {}", task.category);
    println!("  priority: {}", task.priority);
    println!("  date:     {}", task.scheduled_date);
    println!("  repeat:   {}", task.repeat_rule);
    println!("  reminder: {}", task.reminder);
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let session = Session::start(&cli)?;
    tracing::debug!(command = ?cli.command, json = session.json, "dispatching command");

    match cli.command {
        Command::Add {
            name,
            category,
            date,
            priority,
            repeat,
            remind,
        } => {
            let mut input = TaskInput::new(
                name.unwrap_or_default(),
                category.unwrap_or_default(),
                expand_date(date.unwrap_or_default())?,
            );
            input.priority = priority.or_else(|| {
                session
                    .config
                    .default_priority
                    .map(|value| value.label().to_string())
            });
            input.repeat_rule = repeat.or_else(|| {
                session
                    .config
                    .default_repeat
                    .map(|value| value.label().to_string())
            });
            input.reminder = remind;

            let task = task_api::add_task(&session.store, &input)?;
            session.print_task("Added", &task)?;
        }
        Command::Edit {
            id,
            name,
            category,
            date,
            priority,
            repeat,
            remind,
            done,
            open,
        } => {
            let patch = TaskPatch {
                name,
                category,
                priority,
                scheduled_date: date.map(expand_date).transpose()?,
                repeat_rule: repeat,
                reminder: (!remind.is_empty()).then_some(remind),
                completed: match (done, open) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };

            let task = task_api::edit_task(&session.store, id, &patch)?;
            session.print_task("Updated", &task)?;
        }
        Command::Toggle { id } => {
            let task = task_api::toggle_task(&session.store, id)?;
            if session.json {
                print_json(&task)?;
            } else {
                let state = if task.completed { "completed" } else { "not completed" };
                println!("Marked task {state}: {} (#{})", task.name, task.id);
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(&session.store, id)?;
            session.print_task("Deleted", &task)?;
        }
        Command::Show { id } => {
            let task = task_api::get_task(&session.store, id)?;
            if session.json {
                print_json(&task)?;
            } else {
                print_task_details(&task);
            }
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(AppError::validation(
                    "clear deletes every task, pass --yes to confirm",
                ));
            }
            let removed = task_api::clear_tasks(&session.store)?;
            if session.json {
                print_json(&serde_json::json!({ "removed": removed }))?;
            } else {
                println!("Removed {removed} task(s)");
            }
        }
        Command::List { category, date } => {
            let date = date.map(expand_date).transpose()?;
            let filter = TaskFilter::parse(category.as_deref(), date.as_deref())?;
            let overview = task_api::overview(&session.store, &filter)?;
            if session.json {
                print_json(&overview)?;
            } else {
                print_overview_plain(&overview, &session.palette);
            }
        }
    }

    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(message) => {
                eprintln!("ERROR: {}", AppError::validation(message));
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("mental_load".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", AppError::validation(describe_parse_error(&err)));
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", AppError::validation(describe_parse_error(&err)));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
