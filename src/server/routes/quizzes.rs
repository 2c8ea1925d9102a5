use std::collections::HashSet;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    quiz::{select_next, QuizDraw, ALL_CATEGORIES},
    server::app::AppState,
    telemetry::{category_label, QUIZZES_COMPLETED, QUIZ_QUESTIONS_SERVED},
};

use super::{ApiError, ApiResponse};

pub const COMPLETED_MESSAGE: &str = "Completed successfully!";

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(request) = body?;
    let category_id = request.quiz_category.id;
    let pool_questions = if category_id == ALL_CATEGORIES {
        questions::get_all_questions(&pool).await?
    } else {
        questions::get_questions_for_category(&pool, category_id).await?
    };
    let previous: HashSet<i64> = request.previous_questions.into_iter().collect();

    let draw = select_next(category_id, pool_questions, &previous, &mut rand::thread_rng())
        .map_err(|err| {
            tracing::warn!(%err, "Cannot draw a quiz question");
            ApiError::Unprocessable
        })?;

    let label = category_label(category_id);
    let response = match draw {
        QuizDraw::Next(question) => {
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            QuizResponse {
                success: true,
                question: Some(question),
                message: None,
            }
        }
        QuizDraw::Completed => {
            QUIZZES_COMPLETED.with_label_values(&[label.as_str()]).inc();
            QuizResponse {
                success: true,
                question: None,
                message: Some(COMPLETED_MESSAGE),
            }
        }
    };
    Ok(Json(response))
}

pub fn quiz_router() -> Router<AppState> {
    Router::new().route("/quizes", post(next_quiz_question))
}
