use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use tower::ServiceExt;

use mensaplan::handlers;
use mensaplan::services::clock::FixedClock;
use mensaplan::services::source::MenuSource;
use mensaplan::state::AppState;

// ── Mock Sources ──

struct StaticSource {
    html: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl MenuSource for StaticSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

struct FailingSource;

#[async_trait]
impl MenuSource for FailingSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }
}

// ── Fixtures ──

fn menu_row(category: &str, description: &str) -> String {
    format!(
        r#"<tr><td class="menue-wrapper"><span class="menue-item menue-category">{category}</span><span class="menue-item menue-desc"><span class="expand-nutr">{description}</span></span><span class="menue-item menue-price">3,20 €</span></td></tr>"#
    )
}

fn extra_row(description: &str) -> String {
    format!(r#"<tr><td><span class="menue-item extra menue-desc">{description}</span></td></tr>"#)
}

fn day_section(heading: &str, rows: &[String], extras: &[String]) -> String {
    format!(
        r#"<div class="preventBreak"><h3 class="default-headline"><a>{heading}</a></h3><div><table class="menues">{}</table><table class="extras">{}</table></div></div>"#,
        rows.concat(),
        extras.concat()
    )
}

fn week_page() -> String {
    let sections = [
        day_section(
            "Donnerstag, 29.02.2024",
            &[
                menu_row("Klassiker", "H&auml;hnchen<sup>1,2</sup>"),
                menu_row("Tellergericht", "Eintopf"),
            ],
            &[extra_row("Reis")],
        ),
        day_section(
            "Freitag, 01.03.2024",
            &[
                menu_row("Tellergericht", "Gulasch"),
                menu_row("Vegetarisch", "Falafel+"),
                menu_row("Grill", "Currywurst"),
            ],
            &[extra_row("Salat")],
        ),
        day_section(
            "Samstag, 02.03.2024",
            &[menu_row("Klassiker", r#"Fisch<span class="seperator">oder</span>Tofu"#)],
            &[],
        ),
    ];
    format!(
        "<!DOCTYPE html><html><body>{}</body></html>",
        sections.concat()
    )
}

// ── Helpers ──

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn test_state(today: &str) -> (Arc<AppState>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = Arc::new(AppState {
        source: Box::new(StaticSource {
            html: week_page(),
            calls: Arc::clone(&calls),
        }),
        clock: Box::new(FixedClock(date(today))),
    });
    (state, calls)
}

fn failing_state(today: &str) -> Arc<AppState> {
    Arc::new(AppState {
        source: Box::new(FailingSource),
        clock: Box::new(FixedClock(date(today))),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/alexa", post(handlers::skill::alexa_webhook))
        .route("/mensa", get(handlers::mensa::today))
        .with_state(state)
}

fn alexa_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/alexa")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn intent_body(name: &str) -> String {
    format!(r#"{{"version":"1.0","request":{{"type":"IntentRequest","requestId":"r1","locale":"de-DE","intent":{{"name":"{name}","confirmationStatus":"NONE"}}}}}}"#)
}

fn by_day_body(weekday: &str) -> String {
    format!(r#"{{"request":{{"type":"IntentRequest","intent":{{"name":"GetMensaPlanByDayIntent","slots":{{"weekday":{{"name":"weekday","value":"{weekday}"}}}}}}}}}}"#)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn speech(app: Router, req: Request<Body>) -> (String, bool) {
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["sessionAttributes"], serde_json::json!({}));
    assert_eq!(json["response"]["outputSpeech"]["type"], "PlainText");
    (
        json["response"]["outputSpeech"]["text"]
            .as_str()
            .unwrap()
            .to_string(),
        json["response"]["shouldEndSession"].as_bool().unwrap(),
    )
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state("2024-03-01");
    let (status, body) = call(
        test_app(state),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

// ── Assistant Webhook ──

#[tokio::test]
async fn test_launch_keeps_session_open() {
    let (state, calls) = test_state("2024-03-01");
    let (text, end) = speech(
        test_app(state),
        alexa_request(r#"{"request":{"type":"LaunchRequest"}}"#),
    )
    .await;
    assert!(text.starts_with("Willkommen"));
    assert!(!end);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_today_on_friday() {
    let (state, calls) = test_state("2024-03-01");
    let (text, end) = speech(test_app(state), alexa_request(&intent_body("GetMensaPlanIntent"))).await;
    assert_eq!(
        text,
        "Heute gibt es: Tellergericht: Gulasch, Vegetarisch: Falafel. Als Beilage: Salat"
    );
    assert!(end);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tomorrow_on_wednesday() {
    let (state, _) = test_state("2024-02-28");
    let (text, end) = speech(
        test_app(state),
        alexa_request(&intent_body("GetMensaPlanTomorrowIntent")),
    )
    .await;
    // Tellergericht is only announced on Fridays.
    assert_eq!(
        text,
        "Morgen gibt es: Klassiker: Hähnchen. Als Beilage: Reis"
    );
    assert!(end);
}

#[tokio::test]
async fn test_no_section_for_date() {
    let (state, _) = test_state("2024-03-04");
    let (text, end) = speech(test_app(state), alexa_request(&intent_body("GetMensaPlanIntent"))).await;
    assert_eq!(text, "Heute gibt es leider keine Angaben zur Mensa.");
    assert!(end);
}

#[tokio::test]
async fn test_by_day_resolves_next_saturday() {
    let (state, _) = test_state("2024-02-28");
    let (text, end) = speech(test_app(state), alexa_request(&by_day_body("samstag"))).await;
    assert_eq!(text, "Samstag gibt es: Klassiker: Fisch oder Tofu");
    assert!(end);
}

#[tokio::test]
async fn test_by_day_unknown_weekday() {
    let (state, calls) = test_state("2024-02-28");
    let (text, end) = speech(test_app(state), alexa_request(&by_day_body("blurb"))).await;
    assert_eq!(text, "Diesen Tag habe ich leider nicht verstanden.");
    assert!(end);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_by_day_missing_slot() {
    let (state, _) = test_state("2024-02-28");
    let body = r#"{"request":{"type":"IntentRequest","intent":{"name":"GetMensaPlanByDayIntent","slots":{"weekday":{"name":"weekday"}}}}}"#;
    let (text, _) = speech(test_app(state), alexa_request(body)).await;
    assert_eq!(text, "Diesen Tag habe ich leider nicht verstanden.");
}

#[tokio::test]
async fn test_unknown_intent_name() {
    let (state, _) = test_state("2024-03-01");
    let (text, end) = speech(test_app(state), alexa_request(&intent_body("AMAZON.HelpIntent"))).await;
    assert_eq!(text, "Diesen Befehl habe ich leider nicht verstanden.");
    assert!(end);
}

#[tokio::test]
async fn test_session_ended_has_empty_body() {
    let (state, _) = test_state("2024-03-01");
    let (status, body) = call(
        test_app(state),
        alexa_request(r#"{"request":{"type":"SessionEndedRequest","reason":"USER_INITIATED"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unknown_request_type() {
    let (state, _) = test_state("2024-03-01");
    let (text, end) = speech(
        test_app(state),
        alexa_request(r#"{"request":{"type":"Connections.Response"}}"#),
    )
    .await;
    assert_eq!(text, "Ich kann leider nur Fragen zum Mensaplan beantworten.");
    assert!(end);
}

#[tokio::test]
async fn test_malformed_request_answers_with_fallback() {
    let (state, _) = test_state("2024-03-01");
    let (text, end) = speech(test_app(state), alexa_request(r#"{"hello":"world"}"#)).await;
    assert_eq!(text, "Ich kann leider nur Fragen zum Mensaplan beantworten.");
    assert!(end);
}

#[tokio::test]
async fn test_fetch_failure_is_spoken_not_raised() {
    let state = failing_state("2024-03-01");
    let (text, end) = speech(test_app(state), alexa_request(&intent_body("GetMensaPlanIntent"))).await;
    assert!(text.starts_with("Ein Fehler ist aufgetreten"));
    assert!(end);
}

// ── Plain Endpoint ──

#[tokio::test]
async fn test_mensa_endpoint_answers_today() {
    let (state, calls) = test_state("2024-03-01");
    let (text, end) = speech(
        test_app(state),
        Request::builder().uri("/mensa").body(Body::empty()).unwrap(),
    )
    .await;
    assert!(text.starts_with("Heute gibt es: Tellergericht: Gulasch"));
    assert!(end);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
