//! Reads one day's curated menu out of the weekly menu page.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::FilteredMenu;
use crate::services::dates::{format_date, german_weekday_name};
use crate::services::markup;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid static selector")
}

static SECTION: Lazy<Selector> = Lazy::new(|| selector("div.preventBreak"));
static HEADING: Lazy<Selector> =
    Lazy::new(|| selector("h3.default-headline, h3.active-headline"));
static MENU_ROW: Lazy<Selector> = Lazy::new(|| selector("table.menues tr"));
static CATEGORY: Lazy<Selector> = Lazy::new(|| selector("span.menue-category"));
static DESC_WRAPPER: Lazy<Selector> = Lazy::new(|| selector("span.menue-desc"));
static DESC: Lazy<Selector> = Lazy::new(|| selector("span.expand-nutr"));
static EXTRA: Lazy<Selector> =
    Lazy::new(|| selector("table.extras span.menue-item.extra.menue-desc"));

const ALWAYS_RELEVANT: [&str; 2] = ["Vegetarisch", "Klassiker"];
const FRIDAY_SPECIAL: &str = "Tellergericht";

/// Parsed weekly menu page. Lives for one request.
pub struct MenuDocument {
    html: Html,
}

/// A day's block of the page, headed by "Weekday, DD.MM.YYYY".
pub struct DaySection<'a> {
    pub heading: String,
    element: ElementRef<'a>,
}

impl MenuDocument {
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
        }
    }

    /// Day sections that carry a heading, in document order.
    pub fn sections(&self) -> impl Iterator<Item = DaySection<'_>> + '_ {
        self.html.select(&SECTION).filter_map(|element| {
            let heading = element.select(&HEADING).next()?;
            Some(DaySection {
                heading: joined_text(heading),
                element,
            })
        })
    }

    /// First section whose heading names both the weekday and the date.
    pub fn section_for(&self, date: NaiveDate) -> Option<DaySection<'_>> {
        let weekday = german_weekday_name(date.weekday());
        let date_str = format_date(date);
        self.sections()
            .find(|s| s.heading.contains(weekday) && s.heading.contains(&date_str))
    }
}

/// Only vegetarian and classic dishes are announced, plus the plate of the
/// day on Fridays.
pub fn is_relevant(category: &str, weekday_name: &str) -> bool {
    ALWAYS_RELEVANT.contains(&category)
        || (weekday_name == "Freitag" && category.contains(FRIDAY_SPECIAL))
}

pub fn extract(document: &MenuDocument, date: NaiveDate) -> FilteredMenu {
    let Some(section) = document.section_for(date) else {
        tracing::debug!(date = %format_date(date), "no day section for date");
        return FilteredMenu::default();
    };

    let weekday = german_weekday_name(date.weekday());
    let mut menu = FilteredMenu::default();

    for row in section.element.select(&MENU_ROW) {
        let Some((category, description)) = menu_entry(row) else {
            continue;
        };
        if is_relevant(&category, weekday) {
            menu.dishes
                .push(format!("{category}: {}", markup::normalize(&description.html())));
        } else {
            tracing::trace!(category = %category, "skipping dish");
        }
    }

    menu.sides.extend(
        section
            .element
            .select(&EXTRA)
            .map(|extra| markup::normalize(&extra.html())),
    );

    menu
}

/// Category label and description element of a menu row, if the row has both.
fn menu_entry(row: ElementRef<'_>) -> Option<(String, ElementRef<'_>)> {
    let category = row.select(&CATEGORY).next()?;
    let description = row.select(&DESC_WRAPPER).next()?.select(&DESC).next()?;
    let label: String = category.text().map(str::trim).collect();
    Some((label, description))
}

fn joined_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
