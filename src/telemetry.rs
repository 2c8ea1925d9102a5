use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .expect("quiz_questions_served_total is registered once");
    pub static ref QUIZZES_COMPLETED: IntCounterVec = register_int_counter_vec!(
        "quizzes_completed_total",
        "Number of quiz sessions that ran out of unseen questions",
        &["category"]
    )
    .expect("quizzes_completed_total is registered once");
}

/// Label value used for a quiz that draws from every category.
pub const ALL_CATEGORIES_LABEL: &str = "all";

pub fn category_label(category_id: i64) -> String {
    if category_id == 0 {
        ALL_CATEGORIES_LABEL.to_owned()
    } else {
        category_id.to_string()
    }
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
