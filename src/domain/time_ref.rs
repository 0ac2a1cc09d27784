//! Time references for picking a journal day

use crate::error::{KronosError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// A day named relative to "today"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeReference {
    /// Signed offset in days from today (`today`, `yesterday`, `3 days ago`, `+2`)
    Offset(i64),
    /// Current/most recent occurrence of a weekday
    Weekday(Weekday),
    /// Previous occurrence of a weekday (strictly before today)
    LastWeekday(Weekday),
    /// Next occurrence of a weekday (strictly after today)
    NextWeekday(Weekday),
    /// Specific date
    SpecificDate(NaiveDate),
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

impl TimeReference {
    /// Parse a time reference string
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        let invalid = || KronosError::InvalidTimeReference(input.to_string());

        match normalized.as_str() {
            "today" | "now" => return Ok(TimeReference::Offset(0)),
            "yesterday" => return Ok(TimeReference::Offset(-1)),
            "tomorrow" => return Ok(TimeReference::Offset(1)),
            _ => {}
        }

        if let Some(weekday) = weekday_from_name(&normalized) {
            return Ok(TimeReference::Weekday(weekday));
        }
        if let Some(day) = normalized.strip_prefix("last ") {
            return weekday_from_name(day.trim())
                .map(TimeReference::LastWeekday)
                .ok_or_else(invalid);
        }
        if let Some(day) = normalized.strip_prefix("next ") {
            return weekday_from_name(day.trim())
                .map(TimeReference::NextWeekday)
                .ok_or_else(invalid);
        }
        if let Some(count) = normalized
            .strip_suffix(" days ago")
            .or_else(|| normalized.strip_suffix(" day ago"))
        {
            let days: i64 = count.trim().parse().map_err(|_| invalid())?;
            return days
                .checked_neg()
                .map(TimeReference::Offset)
                .ok_or_else(invalid);
        }
        if normalized.starts_with(['+', '-']) {
            let days: i64 = normalized.parse().map_err(|_| invalid())?;
            return Ok(TimeReference::Offset(days));
        }

        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d-%m-%Y"))
            .map(TimeReference::SpecificDate)
            .map_err(|_| invalid())
    }

    /// Resolve this time reference to an actual date. Offsets that leave the
    /// representable calendar are rejected.
    pub fn resolve(&self, base_date: NaiveDate) -> Result<NaiveDate> {
        let date = match self {
            TimeReference::Offset(days) => shift(base_date, *days),
            TimeReference::Weekday(target) => {
                let days_back = (base_date.weekday().num_days_from_monday() + 7
                    - target.num_days_from_monday())
                    % 7;
                shift(base_date, -i64::from(days_back))
            }
            TimeReference::LastWeekday(target) => {
                let days_back = match (base_date.weekday().num_days_from_monday() + 7
                    - target.num_days_from_monday())
                    % 7
                {
                    0 => 7,
                    days => days,
                };
                shift(base_date, -i64::from(days_back))
            }
            TimeReference::NextWeekday(target) => {
                let days_forward = match (target.num_days_from_monday() + 7
                    - base_date.weekday().num_days_from_monday())
                    % 7
                {
                    0 => 7,
                    days => days,
                };
                shift(base_date, i64::from(days_forward))
            }
            TimeReference::SpecificDate(date) => Some(*date),
        };

        date.ok_or_else(|| {
            KronosError::InvalidTimeReference(format!("{} is out of range", self.describe()))
        })
    }

    fn describe(&self) -> String {
        match self {
            TimeReference::Offset(days) => format!("{:+} days", days),
            TimeReference::Weekday(day) => format!("{}", day),
            TimeReference::LastWeekday(day) => format!("last {}", day),
            TimeReference::NextWeekday(day) => format!("next {}", day),
            TimeReference::SpecificDate(date) => date.to_string(),
        }
    }
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(step)
    } else {
        date.checked_add_days(step)
    }
}
