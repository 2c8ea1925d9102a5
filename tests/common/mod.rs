#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use trivia_api::db::queries::questions;
use trivia_api::db::{run_migrations, NewQuestion};
use trivia_api::server::app::build_router;
use trivia_api::settings::Settings;

/// A single-connection in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn build_test_app(pool: SqlitePool) -> Router {
    build_router(pool, &Settings::default()).unwrap()
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> i64 {
    sqlx::query("INSERT INTO categories (type) VALUES (?1)")
        .bind(kind)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn insert_question(pool: &SqlitePool, text: &str, category: i64) -> i64 {
    questions::create_question(
        pool,
        &NewQuestion {
            question: text.to_owned(),
            answer: format!("answer to {text}"),
            category,
            difficulty: 1,
        },
    )
    .await
    .unwrap()
}

/// Categories 1..=4 (Science, Art, Geography, Sports) and 15 questions:
/// ids 1..=12 in Science, 13..=14 in Art, 15 in Geography. Sports is empty.
pub async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;
    for name in ["Science", "Art", "Geography", "Sports"] {
        create_category(&pool, name).await;
    }
    for n in 1..=12 {
        insert_question(&pool, &format!("Science question {n}"), 1).await;
    }
    insert_question(&pool, "Who painted La Giaconda?", 2).await;
    insert_question(&pool, "How many paintings did Van Gogh sell?", 2).await;
    insert_question(&pool, "What is the largest lake in Africa?", 3).await;
    pool
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}
