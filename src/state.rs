use crate::services::clock::Clock;
use crate::services::source::MenuSource;

/// Built once at startup and shared read-only by every request.
pub struct AppState {
    pub source: Box<dyn MenuSource>,
    pub clock: Box<dyn Clock>,
}
