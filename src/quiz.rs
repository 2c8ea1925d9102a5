//! Picks the next quiz question for a client-held session.
//!
//! The session is just the list of ids the client has already been shown, so every
//! draw is computed from scratch against the current pool.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// `quiz_category.id` that selects every category.
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizDraw {
    Next(Question),
    /// Every question in the pool has already been shown.
    Completed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no questions available for category {category_id}")]
pub struct EmptyPool {
    pub category_id: i64,
}

/// Draws uniformly from the questions in `pool` whose ids are not in `previous`.
pub fn select_next<R: Rng + ?Sized>(
    category_id: i64,
    pool: Vec<Question>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Result<QuizDraw, EmptyPool> {
    if pool.is_empty() {
        return Err(EmptyPool { category_id });
    }
    let unseen: Vec<Question> = pool
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    Ok(match unseen.choose(rng) {
        Some(question) => QuizDraw::Next(question.clone()),
        None => QuizDraw::Completed,
    })
}
