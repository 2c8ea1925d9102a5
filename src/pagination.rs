pub const QUESTIONS_PER_PAGE: usize = 10;

/// Slices an already materialized, ordered list down to one 1-based page.
///
/// A missing or non-positive page is treated as page 1. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: Option<i64>) -> Vec<T> {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
        .unwrap_or(usize::MAX);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
