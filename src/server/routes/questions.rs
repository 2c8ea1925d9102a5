use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    pagination::paginate,
    server::{app::AppState, deserializers::PageQuery},
};

use super::{categories::category_map, ApiError, ApiResponse};

// The client posts `category` and `difficulty` as numeric strings
#[derive(Deserialize)]
struct CreateQuestionBody {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default, rename = "searchTerm", alias = "search_term")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    categories: BTreeMap<i64, String>,
    total_questions: usize,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

impl CreateQuestionBody {
    fn validate(self) -> Result<NewQuestion, ApiError> {
        fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
            match value {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ApiError::BadRequest(format!("`{field}` must be a non-empty string"))),
            }
        }
        fn required_int(value: Option<i64>, field: &str) -> Result<i64, ApiError> {
            value.ok_or_else(|| ApiError::BadRequest(format!("`{field}` must be an integer")))
        }

        Ok(NewQuestion {
            question: required_text(self.question, "question")?,
            answer: required_text(self.answer, "answer")?,
            category: required_int(self.category, "category")?,
            difficulty: required_int(self.difficulty, "difficulty")?,
        })
    }
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool).await?;
    let categories = get_all_categories(&pool).await?;
    let total_questions = all.len();
    Ok(Json(QuestionsPage {
        success: true,
        questions: paginate(all, page),
        categories: category_map(categories),
        total_questions,
        current_category: None,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<CreateQuestionBody>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(body) = body?;
    let new_question = body.validate()?;
    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!(id, category = new_question.category, "Created question");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let question = questions::get_question_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if !questions::delete_question(&pool, question.id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Deleted question");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = body?;
    let found = match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => questions::search_questions(&pool, term).await?,
        _ => Vec::new(),
    };
    Ok(Json(SearchResults {
        success: true,
        total_questions: found.len(),
        questions: found,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> CreateQuestionBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let q = body(serde_json::json!({
            "question": "What is life?",
            "answer": "24.",
            "category": "1",
            "difficulty": 2
        }))
        .validate()
        .unwrap();
        assert_eq!(q.category, 1);
        assert_eq!(q.difficulty, 2);
    }

    #[test]
    fn blank_or_missing_fields_are_rejected() {
        let err = body(serde_json::json!({"question": "  ", "answer": "a", "category": 1, "difficulty": 1}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("question")));

        let err = body(serde_json::json!({"question": "q", "answer": "a", "category": 1}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("difficulty")));
    }

    #[test]
    fn non_numeric_category_fails_to_parse() {
        let parsed = serde_json::from_value::<CreateQuestionBody>(serde_json::json!({
            "question": "q", "answer": "a", "category": "science", "difficulty": 1
        }));
        assert!(parsed.is_err());
    }
}
