//! Note types and the ids derived from calendar dates

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note types determine where a note lives and how its id is formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    /// One note per day, id `YYYY-MM-DD`
    Daily,
    /// One note per ISO week, id `YYYY-Www`
    Weekly,
    /// Free-form note, id is a slug
    #[default]
    Document,
}

impl NoteType {
    pub const ALL: [NoteType; 3] = [NoteType::Daily, NoteType::Weekly, NoteType::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Daily => "daily",
            NoteType::Weekly => "weekly",
            NoteType::Document => "document",
        }
    }

    /// Directory components, relative to the workspace root
    pub fn directory(&self) -> &'static [&'static str] {
        match self {
            NoteType::Daily => &["journal", "daily"],
            NoteType::Weekly => &["journal", "weekly"],
            NoteType::Document => &["notes"],
        }
    }

    /// Whether notes of this type are keyed by a calendar period
    pub fn is_dated(&self) -> bool {
        !matches!(self, NoteType::Document)
    }

    /// Generate the id for a given date. Documents have no date-derived id.
    pub fn id_for_date(&self, date: NaiveDate) -> Option<String> {
        match self {
            NoteType::Daily => Some(date.format("%Y-%m-%d").to_string()),
            NoteType::Weekly => {
                let week = date.iso_week();
                Some(format!("{}-W{:02}", week.year(), week.week()))
            }
            NoteType::Document => None,
        }
    }

    /// Parse an id and return the first day of the period it names.
    /// Returns None if the id is not in this type's canonical form.
    pub fn date_from_id(&self, id: &str) -> Option<NaiveDate> {
        let date = match self {
            NoteType::Daily => NaiveDate::parse_from_str(id, "%Y-%m-%d").ok()?,
            NoteType::Weekly => {
                let (year, week) = id.split_once("-W")?;
                let year: i32 = year.parse().ok()?;
                let week: u32 = week.parse().ok()?;
                NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?
            }
            NoteType::Document => return None,
        };

        // Reject non-canonical spellings such as "2025-1-7" or "2025-W3"
        if self.id_for_date(date).as_deref() == Some(id) {
            Some(date)
        } else {
            None
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(NoteType::Daily),
            "weekly" | "week" => Ok(NoteType::Weekly),
            "document" | "doc" | "note" => Ok(NoteType::Document),
            _ => Err(format!(
                "Invalid note type: '{}'. Valid types are: daily, weekly, document",
                s
            )),
        }
    }
}
