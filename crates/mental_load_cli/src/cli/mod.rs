use clap::error::{ContextKind, ErrorKind};
use clap::{Parser, Subcommand};
use time::{Date, Duration};

#[derive(Parser, Debug)]
#[command(author, version, about = "The Mental Load: household tasks by category", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: mental_load add "Vacuum the hall" -c Cleaning -d 2024-05-01
    /// Example: mental_load add "Vet visit" -c Pets -d tomorrow -p "very important" --remind morning
    Add {
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// YYYY-MM-DD, `today` or `tomorrow`
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long)]
        repeat: Option<String>,
        #[arg(long = "remind", value_name = "WHEN")]
        remind: Vec<String>,
    },
    /// Change fields of a task
    ///
    /// Example: mental_load edit 3 --name "Vacuum upstairs" --priority 2
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long)]
        repeat: Option<String>,
        #[arg(long = "remind", value_name = "WHEN")]
        remind: Vec<String>,
        /// Mark the task completed
        #[arg(long, conflicts_with = "open")]
        done: bool,
        /// Mark the task not completed
        #[arg(long)]
        open: bool,
    },
    /// Flip a task between completed and not completed
    ///
    /// Example: mental_load toggle 3
    Toggle {
        id: u64,
    },
    /// Delete a task
    ///
    /// Example: mental_load delete 3
    Delete {
        id: u64,
    },
    /// Show details of a task
    ///
    /// Example: mental_load show 3
    Show {
        id: u64,
    },
    /// Delete every task
    ///
    /// Example: mental_load clear --yes
    Clear {
        /// Confirm deleting all tasks
        #[arg(long)]
        yes: bool,
    },
    /// List tasks grouped by category
    ///
    /// Example: mental_load list
    /// Example: mental_load list --category Pets --date 2024-05-01
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Expands the `today` and `tomorrow` shorthands; anything else is passed
/// through for the core to validate.
pub fn resolve_date_keyword(raw: &str, today: Date) -> Option<Date> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.checked_add(Duration::days(1)),
        _ => None,
    }
}

/// Splits one interactive line into arguments. Single or double quotes
/// group words, `""` yields an empty argument, and a backslash takes the next
/// character literally everywhere except inside single quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current: Option<String> = None;
    let mut quote: Option<(char, usize)> = None;
    let mut chars = line.char_indices();

    while let Some((index, ch)) = chars.next() {
        match (quote, ch) {
            (Some((open, _)), ch) if ch == open => quote = None,
            (Some(('\'', _)), ch) => current.get_or_insert_with(String::new).push(ch),
            (_, '\\') => {
                let escaped = chars.next().map_or('\\', |(_, next)| next);
                current.get_or_insert_with(String::new).push(escaped);
            }
            (None, '"' | '\'') => {
                quote = Some((ch, index));
                current.get_or_insert_with(String::new);
            }
            (None, ch) if ch.is_whitespace() => args.extend(current.take()),
            (_, ch) => current.get_or_insert_with(String::new).push(ch),
        }
    }

    if let Some((open, index)) = quote {
        return Err(format!(
            "unterminated {open} quote starting at column {}",
            index + 1
        ));
    }
    args.extend(current);
    Ok(args)
}

/// One-line description of a clap failure, naming the offending command or
/// value when clap reports it.
pub fn describe_parse_error(err: &clap::Error) -> String {
    let context = |kind: ContextKind| err.get(kind).map(ToString::to_string);

    match err.kind() {
        ErrorKind::InvalidSubcommand => {
            if let Some(name) = context(ContextKind::InvalidSubcommand) {
                return format!("unknown command '{name}'");
            }
        }
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
            if let (Some(arg), Some(value)) = (
                context(ContextKind::InvalidArg),
                context(ContextKind::InvalidValue),
            ) {
                return format!("invalid value '{value}' for {arg}");
            }
        }
        _ => {}
    }

    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StorePath,
    DefaultPriority,
    DefaultRepeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "default_priority" | "priority" => ConfigOverrideTarget::DefaultPriority,
        "default_repeat" | "repeat" => ConfigOverrideTarget::DefaultRepeat,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override for '{canonical_field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
