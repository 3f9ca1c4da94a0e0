use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTIONS_CREATED: Counter = register_counter!(
        "trivia_questions_created_total",
        "Number of questions created through the API"
    )
    .unwrap();
    pub static ref QUESTIONS_DELETED: Counter = register_counter!(
        "trivia_questions_deleted_total",
        "Number of questions deleted through the API"
    )
    .unwrap();
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of quiz questions handed out",
        &["category"]
    )
    .unwrap();
}

/// Default filter for the HTTP server; request spans from `TraceLayer` are logged at debug.
pub const SERVER_LOG_FILTER: &str = "info,tower_http=debug";
/// Default filter for one-shot CLI commands.
pub const CLI_LOG_FILTER: &str = "info";

fn span_events(setting: Option<&str>) -> FmtSpan {
    match setting {
        Some(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}

/// Installs the global subscriber. `LOG_LEVEL` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let setting = std::env::var("INCLUDE_SPAN_EVENTS").ok();
    let fmt_layer = fmt::layer().with_span_events(span_events(setting.as_deref()));
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
