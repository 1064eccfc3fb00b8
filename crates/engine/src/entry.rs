//! The module contains the `Entry` type representing one line of the ledger.
//!
//! An entry is created with either a ready instant or a legacy `YYYY-MM-DD`
//! calendar string; see [`EntryDate`]. The display date is derived once, at
//! construction, and is never recomputed.
use core::fmt;

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    money::{finite_or_nan, format_amount},
};

/// Stable identifier assigned to every entry at creation.
pub type EntryId = Uuid;

/// Date input accepted when creating an entry.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryDate {
    /// An already constructed local instant.
    Instant(DateTime<Local>),
    /// Legacy `YYYY-MM-DD` string, resolved to local midnight of that day.
    /// Out of range months and days roll over, as calendar fields do.
    Calendar(String),
}

impl EntryDate {
    /// The current local instant.
    pub fn now() -> Self {
        Self::Instant(Local::now())
    }

    /// Builds an instant from calendar fields with a zero-indexed month
    /// (`0` is January), at local midnight.
    ///
    /// Out of range fields roll over into the neighbouring months and
    /// years: month `12` is January of the next year, day `0` the last day
    /// of the previous month. Only dates outside chrono's range fail.
    pub fn from_calendar_fields(year: i64, month0: i64, day: i64) -> ResultEngine<Self> {
        local_midnight(year, month0, day).map(Self::Instant)
    }

    /// Resolves the input to a local instant.
    pub fn resolve(&self) -> ResultEngine<DateTime<Local>> {
        match self {
            Self::Instant(at) => Ok(*at),
            Self::Calendar(text) => parse_calendar(text),
        }
    }
}

impl From<DateTime<Local>> for EntryDate {
    fn from(value: DateTime<Local>) -> Self {
        Self::Instant(value)
    }
}

/// What a setter actually changed, with the value it replaced.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryChange {
    Description { previous: String },
    Amount { previous: f64 },
}

/// One ledger line: a description, an amount and the day it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEntry", into = "StoredEntry")]
pub struct Entry {
    id: EntryId,
    description: String,
    amount: f64,
    date: DateTime<Local>,
    human_date: String,
}

impl Entry {
    /// Creates an entry with a freshly generated id.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidDate`] when a calendar string is not
    /// three integer parts.
    pub fn new(description: impl Into<String>, amount: f64, date: EntryDate) -> ResultEngine<Self> {
        Self::with_id(Uuid::new_v4(), description, amount, date)
    }

    /// Creates an entry with a caller provided id.
    pub fn with_id(
        id: EntryId,
        description: impl Into<String>,
        amount: f64,
        date: EntryDate,
    ) -> ResultEngine<Self> {
        let date = date.resolve()?;
        Ok(Self::from_parts(id, description.into(), amount, date))
    }

    fn from_parts(id: EntryId, description: String, amount: f64, date: DateTime<Local>) -> Self {
        Self {
            id,
            description,
            amount: finite_or_nan(amount),
            human_date: human_date(&date),
            date,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }

    /// Display date as `month/day/year`, month 1-based.
    pub fn human_date(&self) -> &str {
        &self.human_date
    }

    /// Replaces the amount. Returns `None` when the value is the same.
    ///
    /// Infinities are stored as `NaN`, and two `NaN` amounts count as the
    /// same value.
    pub fn set_amount(&mut self, amount: f64) -> Option<EntryChange> {
        let amount = finite_or_nan(amount);
        if same_amount(self.amount, amount) {
            return None;
        }
        let previous = std::mem::replace(&mut self.amount, amount);
        Some(EntryChange::Amount { previous })
    }

    /// Replaces the description. Returns `None` when the text is the same.
    pub fn set_description(&mut self, description: impl Into<String>) -> Option<EntryChange> {
        let description = description.into();
        if self.description == description {
            return None;
        }
        let previous = std::mem::replace(&mut self.description, description);
        Some(EntryChange::Description { previous })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.human_date,
            self.description,
            format_amount(self.amount)
        )
    }
}

/// Formats a date as `month/day/year` from its local calendar fields.
pub fn human_date(date: &DateTime<Local>) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

fn same_amount(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn parse_calendar(text: &str) -> ResultEngine<DateTime<Local>> {
    let invalid = || EngineError::InvalidDate(format!("expected YYYY-MM-DD, got `{text}`"));

    let parts = text.trim().split('-').map(str::trim).collect::<Vec<_>>();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };

    let year: i64 = year.parse().map_err(|_| invalid())?;
    let month: i64 = month.parse().map_err(|_| invalid())?;
    let day: i64 = day.parse().map_err(|_| invalid())?;

    local_midnight(year, month - 1, day)
}

/// Calendar day for possibly out of range fields, rolled over the way a
/// JavaScript `Date(year, month0, day)` is.
fn rolled_over_day(year: i64, month0: i64, day: i64) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    first.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}

fn local_midnight(year: i64, month0: i64, day: i64) -> ResultEngine<DateTime<Local>> {
    let invalid = || {
        EngineError::InvalidDate(format!(
            "out of range: year {year}, month index {month0}, day {day}"
        ))
    };

    let date = rolled_over_day(year, month0, day).ok_or_else(invalid)?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;

    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(at) => Ok(at),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        // Midnight falls in a DST gap: the day starts one hour later.
        LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .ok_or_else(invalid),
    }
}

/// Persisted shape of an entry. `human_date` is derived, so it is not stored.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    id: EntryId,
    description: String,
    #[serde(deserialize_with = "amount_or_nan")]
    amount: f64,
    date: DateTime<Local>,
}

impl From<StoredEntry> for Entry {
    fn from(value: StoredEntry) -> Self {
        Entry::from_parts(value.id, value.description, value.amount, value.date)
    }
}

impl From<Entry> for StoredEntry {
    fn from(value: Entry) -> Self {
        Self {
            id: value.id,
            description: value.description,
            amount: value.amount,
            date: value.date,
        }
    }
}

/// JSON has no `NaN`: non-finite amounts are written as `null`, read back as `NaN`.
fn amount_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
