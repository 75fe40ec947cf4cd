use chrono::NaiveDate;

use crate::errors::{AppError, FALLBACK_DAY, FALLBACK_ONLY_MENU};
use crate::models::{AssistantRequest, AssistantResponse, FilteredMenu};
use crate::services::dates::{self, DateReference, ResolvedDate};
use crate::services::extractor::{self, MenuDocument};
use crate::state::AppState;

pub const WELCOME: &str = "Willkommen beim Mensaplan! Frag mich, was es heute, morgen oder an einem Wochentag in der Mensa gibt.";
pub const UNKNOWN_COMMAND: &str = "Diesen Befehl habe ich leider nicht verstanden.";

const WEEKDAY_SLOT: &str = "weekday";

#[derive(Debug, Clone, PartialEq)]
pub enum MenuIntent {
    Today,
    Tomorrow,
    ByDay,
    Other,
}

impl MenuIntent {
    pub fn parse(name: &str) -> Self {
        match name {
            "GetMensaPlanIntent" => MenuIntent::Today,
            "GetMensaPlanTomorrowIntent" => MenuIntent::Tomorrow,
            "GetMensaPlanByDayIntent" => MenuIntent::ByDay,
            _ => MenuIntent::Other,
        }
    }
}

/// Answer one assistant request. `None` means acknowledge without a body,
/// which is what the platform expects for a finished session.
pub async fn handle_request(
    state: &AppState,
    request: AssistantRequest,
) -> Option<AssistantResponse> {
    tracing::info!(kind = request.kind(), "assistant request");

    let reference = match request {
        AssistantRequest::Launch => return Some(AssistantResponse::ask(WELCOME)),
        AssistantRequest::SessionEnded => return None,
        AssistantRequest::Unknown => return Some(AssistantResponse::end(FALLBACK_ONLY_MENU)),
        AssistantRequest::Intent { name, slots } => {
            tracing::info!(intent = %name, "resolving intent");
            match MenuIntent::parse(&name) {
                MenuIntent::Today => DateReference::Today,
                MenuIntent::Tomorrow => DateReference::Tomorrow,
                MenuIntent::ByDay => match slots.get(WEEKDAY_SLOT) {
                    Some(day) if !day.trim().is_empty() => DateReference::NamedWeekday(day.clone()),
                    _ => {
                        tracing::warn!("weekday slot missing");
                        return Some(AssistantResponse::end(FALLBACK_DAY));
                    }
                },
                MenuIntent::Other => return Some(AssistantResponse::end(UNKNOWN_COMMAND)),
            }
        }
    };

    Some(menu_response(state, &reference).await)
}

/// Run the menu pipeline, turning any failure into its fallback utterance.
pub async fn menu_response(state: &AppState, reference: &DateReference) -> AssistantResponse {
    match menu_answer(state, reference).await {
        Ok(text) => AssistantResponse::end(text),
        Err(e) => {
            tracing::error!(error = %e, reference = ?reference, "menu pipeline failed");
            AssistantResponse::end(e.utterance())
        }
    }
}

pub async fn menu_answer(state: &AppState, reference: &DateReference) -> Result<String, AppError> {
    let resolved = dates::resolve(reference, state.clock.today())?;

    let raw = state
        .source
        .fetch()
        .await
        .map_err(|e| AppError::Fetch(format!("{e:#}")))?;

    Ok(answer_from_page(&raw, &resolved))
}

/// Compose the spoken answer for a resolved day from the raw menu page.
pub fn answer_from_page(raw: &str, resolved: &ResolvedDate) -> String {
    let document = MenuDocument::parse(raw);
    let menu = menu_for(&document, resolved.date);
    tracing::info!(
        date = %dates::format_date(resolved.date),
        dishes = menu.dishes.len(),
        sides = menu.sides.len(),
        "menu extracted"
    );
    render_speech(&resolved.label, &menu)
}

fn menu_for(document: &MenuDocument, date: NaiveDate) -> FilteredMenu {
    if !dates::available_dates(document).contains(&dates::format_date(date)) {
        return FilteredMenu::default();
    }
    extractor::extract(document, date)
}

pub fn render_speech(label: &str, menu: &FilteredMenu) -> String {
    if menu.dishes.is_empty() {
        return format!("{label} gibt es leider keine Angaben zur Mensa.");
    }

    let mut text = format!("{label} gibt es: {}", menu.dishes.join(", "));
    if !menu.sides.is_empty() {
        text.push_str(". Als Beilage: ");
        text.push_str(&menu.sides.join(" oder "));
    }
    text
}
