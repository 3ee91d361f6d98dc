pub mod ingredient;
pub mod password;
pub mod recipe;
pub mod recipe_mark;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod token;
pub mod user;

use crate::domain::repository::CallerMarksPort;
use crate::domain::types::{CallerMarks, Recipe, User};
use crate::error::ApiError;

/// Load the caller-relative flags for a page of recipes. Anonymous callers get none.
pub(crate) async fn marks_for_recipes<M: CallerMarksPort>(
    port: &M,
    caller: Option<i32>,
    recipes: &[Recipe],
) -> Result<CallerMarks, ApiError> {
    let Some(user_id) = caller else {
        return Ok(CallerMarks::default());
    };
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author.id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    port.load(user_id, &recipe_ids, &author_ids).await
}

/// Load follow flags for a page of users. Anonymous callers get none.
pub(crate) async fn marks_for_users<M: CallerMarksPort>(
    port: &M,
    caller: Option<i32>,
    users: &[User],
) -> Result<CallerMarks, ApiError> {
    let Some(user_id) = caller else {
        return Ok(CallerMarks::default());
    };
    let author_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    port.load(user_id, &[], &author_ids).await
}
