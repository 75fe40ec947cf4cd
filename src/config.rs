use std::env;

const DEFAULT_MENU_URL: &str =
    "https://www.studierendenwerk-aachen.de/speiseplaene/eupenerstrasse-w.html";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub menu_url: String,
    pub fetch_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            menu_url: env::var("MENSA_URL").unwrap_or_else(|_| DEFAULT_MENU_URL.to_string()),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
