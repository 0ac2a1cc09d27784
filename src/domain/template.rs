//! Initial content for lazily created journal entries

use crate::domain::NoteType;
use crate::error::{KronosError, Result};
use chrono::{Datelike, Days, NaiveDate};
use std::fs;
use std::path::Path;

const DAILY_TEMPLATE: &str = "## Journal Entry - {DATE}\n\n";
const WEEKLY_TEMPLATE: &str = "## Week {WEEK_NUMBER}, {YEAR} ({WEEK_START_DATE} - {WEEK_END_DATE})\n\n";

/// Template for a new journal entry
#[derive(Debug)]
pub struct Template {
    content: String,
}

/// Day of month with its English ordinal suffix: 1st, 2nd, 3rd, 11th, 22nd
pub fn ordinal_day(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// Long date, e.g. "January 17th, 2025"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        date.format("%B"),
        ordinal_day(date.day()),
        date.year()
    )
}

impl Template {
    /// Built-in template for a dated note type
    pub fn builtin(note_type: NoteType) -> Result<Self> {
        let content = match note_type {
            NoteType::Daily => DAILY_TEMPLATE,
            NoteType::Weekly => WEEKLY_TEMPLATE,
            NoteType::Document => {
                return Err(KronosError::Config(
                    "Document notes have no entry template".to_string(),
                ))
            }
        };

        Ok(Template {
            content: content.to_string(),
        })
    }

    /// Create template from custom template file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| KronosError::Config(format!("Failed to read template file: {}", e)))?;

        Ok(Template { content })
    }

    /// Render template with date variable substitution
    pub fn render(&self, date: NaiveDate) -> String {
        // Clamped to `date` at the ends of the calendar
        let week_start = date
            .checked_sub_days(Days::new(date.weekday().num_days_from_monday().into()))
            .unwrap_or(date);
        let week_end = week_start.checked_add_days(Days::new(6)).unwrap_or(date);

        self.content
            .replace("{DATE}", &long_date(date))
            .replace("{ISO_DATE}", &date.format("%Y-%m-%d").to_string())
            .replace("{YEAR}", &date.iso_week().year().to_string())
            .replace("{MONTH}", &date.format("%B").to_string())
            .replace("{WEEK_NUMBER}", &format!("{:02}", date.iso_week().week()))
            .replace("{WEEK_START_DATE}", &long_date(week_start))
            .replace("{WEEK_END_DATE}", &long_date(week_end))
            .replace("{DAY_NAME}", &date.format("%A").to_string())
    }
}

/// Load `.kronos/templates/<type>.md` from the workspace, or the built-in
pub fn load_template(workspace_root: &Path, note_type: NoteType) -> Result<Template> {
    let custom_path = workspace_root
        .join(crate::infrastructure::MARKER_DIR)
        .join("templates")
        .join(format!("{}.md", note_type));

    if custom_path.is_file() {
        Template::from_file(&custom_path)
    } else {
        Template::builtin(note_type)
    }
}
