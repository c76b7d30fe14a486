use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A closed set of values that round-trips through its display label.
///
/// Parsing is forgiving: case, punctuation and spacing are folded away, and
/// the Danish labels used by earlier versions of the app are accepted too.
pub trait Label: Copy + Sized + 'static {
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn legacy_labels(self) -> &'static [&'static str] {
        &[]
    }

    fn parse_label(raw: &str) -> Result<Self, AppError> {
        match_label(raw)
    }
}

fn match_label<T: Label>(raw: &str) -> Result<T, AppError> {
    let key = canonical_key(raw);
    if key.is_empty() {
        return Err(AppError::validation(format!("{} is required", T::KIND)));
    }

    T::ALL
        .iter()
        .copied()
        .find(|value| {
            canonical_key(value.label()) == key
                || value
                    .legacy_labels()
                    .iter()
                    .any(|legacy| canonical_key(legacy) == key)
        })
        .ok_or_else(|| AppError::validation(format!("unknown {} '{}'", T::KIND, raw.trim())))
}

/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single underscore, so "Self-care", "self care" and "SELF_CARE" compare equal.
pub fn canonical_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            cleaned.extend(ch.to_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_end_matches('_').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Children,
    Cleaning,
    Gardening,
    Cooking,
    Shopping,
    Repairs,
    Transport,
    Pets,
    Appointments,
    Exercise,
    SelfCare,
    Other,
}

impl Label for Category {
    const KIND: &'static str = "category";
    // Display order of the grouped task list.
    const ALL: &'static [Self] = &[
        Self::Children,
        Self::Cleaning,
        Self::Gardening,
        Self::Cooking,
        Self::Shopping,
        Self::Repairs,
        Self::Transport,
        Self::Pets,
        Self::Appointments,
        Self::Exercise,
        Self::SelfCare,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Children => "Children",
            Self::Cleaning => "Cleaning",
            Self::Gardening => "Gardening",
            Self::Cooking => "Cooking",
            Self::Shopping => "Shopping",
            Self::Repairs => "Repairs",
            Self::Transport => "Transport",
            Self::Pets => "Pets",
            Self::Appointments => "Appointments",
            Self::Exercise => "Exercise",
            Self::SelfCare => "Self-care",
            Self::Other => "Other",
        }
    }

    fn legacy_labels(self) -> &'static [&'static str] {
        match self {
            Self::Children => &["Børn"],
            Self::Cleaning => &["Rengøring"],
            Self::Gardening => &["Havearbejde"],
            Self::Cooking => &["Madlavning"],
            Self::Shopping => &["Indkøb"],
            Self::Repairs => &["Reperationer", "Reparationer"],
            Self::Transport => &[],
            Self::Pets => &["Kæledyr"],
            Self::Appointments => &["Aftaler"],
            Self::Exercise => &["Motion"],
            Self::SelfCare => &["Selvforkælelse"],
            Self::Other => &["Andet"],
        }
    }
}

/// Ranked 1 to 3; a higher rank sorts first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriorityRepr", into = "u8")]
pub enum Priority {
    #[default]
    NotImportant = 1,
    Important = 2,
    VeryImportant = 3,
}

impl Priority {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u64) -> Result<Self, AppError> {
        match rank {
            1 => Ok(Self::NotImportant),
            2 => Ok(Self::Important),
            3 => Ok(Self::VeryImportant),
            other => Err(AppError::validation(format!(
                "priority must be between 1 and 3, got {other}"
            ))),
        }
    }
}

impl Label for Priority {
    const KIND: &'static str = "priority";
    const ALL: &'static [Self] = &[Self::NotImportant, Self::Important, Self::VeryImportant];

    fn label(self) -> &'static str {
        match self {
            Self::NotImportant => "not important",
            Self::Important => "important",
            Self::VeryImportant => "very important",
        }
    }

    fn legacy_labels(self) -> &'static [&'static str] {
        match self {
            Self::NotImportant => &["Ikke Vigtig", "low"],
            Self::Important => &["Vigtig", "medium"],
            Self::VeryImportant => &["Meget Vigtig", "high"],
        }
    }

    fn parse_label(raw: &str) -> Result<Self, AppError> {
        match raw.trim().parse::<u64>() {
            Ok(rank) => Self::from_rank(rank),
            Err(_) => match_label(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriorityRepr {
    Rank(u64),
    Label(String),
}

impl TryFrom<PriorityRepr> for Priority {
    type Error = AppError;

    fn try_from(repr: PriorityRepr) -> Result<Self, Self::Error> {
        match repr {
            PriorityRepr::Rank(rank) => Self::from_rank(rank),
            PriorityRepr::Label(label) if label.trim().is_empty() => Ok(Self::default()),
            PriorityRepr::Label(label) => Self::parse_label(&label),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.rank()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepeatRule {
    Daily,
    EveryOtherDay,
    Weekly,
    EveryTwoWeeks,
    EveryThreeWeeks,
    Monthly,
    #[default]
    Never,
}

impl Label for RepeatRule {
    const KIND: &'static str = "repeat rule";
    const ALL: &'static [Self] = &[
        Self::Daily,
        Self::EveryOtherDay,
        Self::Weekly,
        Self::EveryTwoWeeks,
        Self::EveryThreeWeeks,
        Self::Monthly,
        Self::Never,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::EveryOtherDay => "every other day",
            Self::Weekly => "weekly",
            Self::EveryTwoWeeks => "every 2 weeks",
            Self::EveryThreeWeeks => "every 3 weeks",
            Self::Monthly => "monthly",
            Self::Never => "never",
        }
    }

    fn legacy_labels(self) -> &'static [&'static str] {
        match self {
            Self::Daily => &["dagligt"],
            Self::EveryOtherDay => &["hver anden dag"],
            Self::Weekly => &["ugentligt"],
            Self::EveryTwoWeeks => &["hver 2. uge"],
            Self::EveryThreeWeeks => &["hver 3. uge"],
            Self::Monthly => &["månedligt"],
            Self::Never => &["aldrig"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reminder {
    Morning,
    Evening,
    Never,
}

impl Label for Reminder {
    const KIND: &'static str = "reminder";
    const ALL: &'static [Self] = &[Self::Morning, Self::Evening, Self::Never];

    fn label(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::Never => "never",
        }
    }

    fn legacy_labels(self) -> &'static [&'static str] {
        match self {
            Self::Morning => &["morgen"],
            Self::Evening => &["aften"],
            Self::Never => &["aldrig"],
        }
    }
}

/// The reminders chosen for a task. `Never` is exclusive: a set holding it
/// holds nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ReminderRepr", into = "Vec<String>")]
pub struct ReminderSet(BTreeSet<Reminder>);

impl ReminderSet {
    pub fn never() -> Self {
        Self(BTreeSet::from([Reminder::Never]))
    }

    /// Strict parse used for user input; blank entries are ignored.
    pub fn parse<I, S>(values: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reminders = Self::collect(values)?;
        if reminders.contains(&Reminder::Never) && reminders.len() > 1 {
            return Err(AppError::validation(
                "reminder 'never' cannot be combined with other reminders",
            ));
        }
        Ok(Self(reminders))
    }

    /// Lenient parse used for stored data: a stray `never` next to real
    /// reminders is dropped instead of rejected.
    pub fn normalize<I, S>(values: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reminders = Self::collect(values)?;
        if reminders.len() > 1 {
            reminders.remove(&Reminder::Never);
        }
        Ok(Self(reminders))
    }

    fn collect<I, S>(values: I) -> Result<BTreeSet<Reminder>, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter(|value| !value.as_ref().trim().is_empty())
            .map(|value| Reminder::parse_label(value.as_ref()))
            .collect()
    }

    pub fn contains(&self, reminder: Reminder) -> bool {
        self.0.contains(&reminder)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Reminder> + '_ {
        self.0.iter().copied()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(Reminder::label).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReminderRepr {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<ReminderRepr> for ReminderSet {
    type Error = AppError;

    fn try_from(repr: ReminderRepr) -> Result<Self, Self::Error> {
        match repr {
            ReminderRepr::One(value) => Self::normalize(value.split(',')),
            ReminderRepr::Many(values) => Self::normalize(values),
        }
    }
}

impl From<ReminderSet> for Vec<String> {
    fn from(set: ReminderSet) -> Self {
        set.labels().into_iter().map(str::to_string).collect()
    }
}

impl fmt::Display for ReminderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        f.write_str(&self.labels().join(", "))
    }
}

macro_rules! label_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = AppError;

                fn from_str(raw: &str) -> Result<Self, Self::Err> {
                    <$ty as Label>::parse_label(raw)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

label_conversions!(Category, Priority, RepeatRule, Reminder);

impl TryFrom<String> for Category {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse_label(&raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl TryFrom<String> for RepeatRule {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::Never);
        }
        Self::parse_label(&raw)
    }
}

impl From<RepeatRule> for String {
    fn from(rule: RepeatRule) -> Self {
        rule.label().to_string()
    }
}
