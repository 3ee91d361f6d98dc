//! Favourite and shopping-cart toggles. Both are (user, recipe) marks that
//! differ only in their table and error variants.

use tracing::warn;

use crate::domain::repository::{RecipeMarkRepository, RecipeRepository};
use crate::domain::types::{MarkKind, RecipeSummary};
use crate::error::ApiError;

// ── AddRecipeMark ────────────────────────────────────────────────────────────

pub struct AddRecipeMarkUseCase<M: RecipeMarkRepository, R: RecipeRepository> {
    pub marks: M,
    pub recipes: R,
    pub kind: MarkKind,
}

impl<M: RecipeMarkRepository, R: RecipeRepository> AddRecipeMarkUseCase<M, R> {
    pub async fn execute(&self, user_id: i32, recipe_id: i32) -> Result<RecipeSummary, ApiError> {
        let summary = self
            .recipes
            .find_summary(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if self.marks.exists(user_id, recipe_id).await? {
            return Err(self.kind.already_marked());
        }
        if !self.marks.insert(user_id, recipe_id).await? {
            warn!(
                user_id,
                recipe_id,
                kind = self.kind.as_str(),
                "concurrent insert hit unique constraint"
            );
            return Err(self.kind.already_marked());
        }
        Ok(summary)
    }
}

// ── RemoveRecipeMark ─────────────────────────────────────────────────────────

pub struct RemoveRecipeMarkUseCase<M: RecipeMarkRepository, R: RecipeRepository> {
    pub marks: M,
    pub recipes: R,
    pub kind: MarkKind,
}

impl<M: RecipeMarkRepository, R: RecipeRepository> RemoveRecipeMarkUseCase<M, R> {
    pub async fn execute(&self, user_id: i32, recipe_id: i32) -> Result<(), ApiError> {
        if self.recipes.find_author_id(recipe_id).await?.is_none() {
            return Err(ApiError::RecipeNotFound);
        }
        if !self.marks.remove(user_id, recipe_id).await? {
            return Err(self.kind.not_marked());
        }
        Ok(())
    }
}
