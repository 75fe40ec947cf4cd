//! Resolves "heute", "morgen" and weekday names to calendar dates.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;
use crate::services::extractor::MenuDocument;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("montag", Weekday::Mon),
    ("dienstag", Weekday::Tue),
    ("mittwoch", Weekday::Wed),
    ("donnerstag", Weekday::Thu),
    ("freitag", Weekday::Fri),
    ("samstag", Weekday::Sat),
    ("sonntag", Weekday::Sun),
];

const SEARCH_DAYS: u64 = 13;

pub const LABEL_TODAY: &str = "Heute";
pub const LABEL_TOMORROW: &str = "Morgen";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2}\.\d{2}\.\d{4}\b").expect("valid date regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum DateReference {
    Today,
    Tomorrow,
    NamedWeekday(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    /// Spoken name of the day: "Heute", "Morgen" or the weekday.
    pub label: String,
}

pub fn german_weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

/// `DD.MM.YYYY`, as printed in the day headings.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(german, _)| *german == name)
        .map(|(_, weekday)| *weekday)
}

pub fn resolve(reference: &DateReference, today: NaiveDate) -> Result<ResolvedDate, AppError> {
    let date = match reference {
        DateReference::Today => today,
        DateReference::Tomorrow => next_day(today, 1)?,
        DateReference::NamedWeekday(name) => {
            let weekday = parse_weekday(name)
                .ok_or_else(|| AppError::UnrecognizedWeekday(name.clone()))?;
            (1..=SEARCH_DAYS)
                .filter_map(|offset| today.checked_add_days(Days::new(offset)))
                .find(|candidate| candidate.weekday() == weekday)
                .ok_or_else(|| AppError::DateNotResolvable(name.clone()))?
        }
    };

    Ok(ResolvedDate {
        date,
        label: day_label(date, today),
    })
}

fn next_day(today: NaiveDate, days: u64) -> Result<NaiveDate, AppError> {
    today
        .checked_add_days(Days::new(days))
        .ok_or_else(|| AppError::DateNotResolvable(format_date(today)))
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        LABEL_TODAY.to_string()
    } else if today.succ_opt() == Some(date) {
        LABEL_TOMORROW.to_string()
    } else {
        german_weekday_name(date.weekday()).to_string()
    }
}

/// Every `DD.MM.YYYY` mentioned in a day heading of the document.
pub fn available_dates(document: &MenuDocument) -> HashSet<String> {
    document
        .sections()
        .flat_map(|section| {
            DATE_RE
                .find_iter(&section.heading)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
