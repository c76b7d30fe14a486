use crate::error::AppError;
use crate::model::{Label, Priority, RepeatRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "MENTAL_LOAD_CONFIG_PATH";

const RESET: &str = "\x1b[0m";

/// Colour scheme of the task list. `Plain` emits no escape codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Label for Theme {
    const KIND: &'static str = "theme";
    const ALL: &'static [Self] = &[Self::Plain, Self::Noir, Self::Solarized];

    fn label(self) -> &'static str {
        match self {
            Self::Plain => "default",
            Self::Noir => "noir",
            Self::Solarized => "solarized",
        }
    }

    fn legacy_labels(self) -> &'static [&'static str] {
        match self {
            Self::Plain => &["plain", "light"],
            Self::Noir => &["dark"],
            Self::Solarized => &[],
        }
    }
}

impl TryFrom<String> for Theme {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse_label(&raw)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.label().to_string()
    }
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette::default(),
            Self::Noir => Palette {
                heading: "\x1b[38;5;208m",
                summary: "\x1b[38;5;250m",
            },
            Self::Solarized => Palette {
                heading: "\x1b[38;5;108m",
                summary: "\x1b[38;5;250m",
            },
        }
    }
}

/// Escape codes for the category headings and the completion summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    heading: &'static str,
    summary: &'static str,
}

impl Palette {
    pub fn heading(&self, text: &str) -> String {
        paint(self.heading, text)
    }

    pub fn summary(&self, text: &str) -> String {
        paint(self.summary, text)
    }
}

fn paint(code: &str, text: &str) -> String {
    if code.is_empty() {
        text.to_string()
    } else {
        format!("{code}{text}{RESET}")
    }
}

/// User settings for the command-line shell. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Priority used when a new task names none.
    #[serde(default)]
    pub default_priority: Option<Priority>,
    /// Repeat rule used when a new task names none.
    #[serde(default)]
    pub default_repeat: Option<RepeatRule>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<Theme>,
    pub store_path: Option<PathBuf>,
    pub default_priority: Option<Priority>,
    pub default_repeat: Option<RepeatRule>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("mental-load")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("mental-load")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if overrides.theme.is_some() {
        merged.theme = overrides.theme;
    }
    if let Some(store_path) = overrides.store_path.as_ref() {
        merged.store_path = Some(store_path.clone());
    }
    if overrides.default_priority.is_some() {
        merged.default_priority = overrides.default_priority;
    }
    if overrides.default_repeat.is_some() {
        merged.default_repeat = overrides.default_repeat;
    }

    merged
}
