#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use foodgram_domain::pagination::PageRequest;

use crate::domain::filter::RecipeFilter;
use crate::domain::image::DecodedImage;
use crate::domain::types::{
    CallerMarks, CartLine, Ingredient, NewRecipe, NewUser, Recipe, RecipeChanges, RecipeSummary,
    Tag, User, UserCredentials,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;

    async fn find_credentials_by_id(&self, id: i32)
    -> Result<Option<UserCredentials>, ApiError>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, ApiError>;

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError>;

    async fn username_exists(&self, username: &str) -> Result<bool, ApiError>;

    /// Users ordered by id, plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;

    /// Insert a user. A unique violation maps to `EmailTaken` / `UsernameTaken`.
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError>;
}

/// Repository for tags. Tags are managed out of band; the API only reads them.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError>;

    /// Subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

/// Repository for ingredients (read-only reference data).
pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name. With `name`, only case-insensitive substring matches.
    async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError>;

    /// Subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

/// Repository for recipes and their tag / ingredient links.
pub trait RecipeRepository: Send + Sync {
    /// Filtered recipes, newest first, plus the total count after filtering.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError>;

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError>;

    async fn find_author_id(&self, id: i32) -> Result<Option<i32>, ApiError>;

    /// Insert the recipe with its tags and ingredient amounts in one transaction.
    /// Returns the new recipe id.
    async fn create(&self, recipe: &NewRecipe) -> Result<i32, ApiError>;

    /// Apply `changes` in one transaction. Link sets are replaced only when supplied.
    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;

    /// The author's recipes, newest first, at most `limit` of them.
    async fn list_summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError>;

    async fn count_by_author(&self, author_id: i32) -> Result<u64, ApiError>;
}

/// A per-user recipe list keyed by (user, recipe): favourites or the shopping cart.
pub trait RecipeMarkRepository: Send + Sync {
    async fn exists(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError>;

    /// Insert a mark. Returns `false` if the pair already existed.
    async fn insert(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError>;

    /// Delete a mark. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError>;
}

/// Repository for follow relations.
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Insert a follow. Returns `false` if the pair already existed.
    async fn insert(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Delete a follow. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError>;

    /// Authors followed by `user_id`, ordered by id, plus the total count.
    async fn list_followed(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError>;
}

/// Batched lookup of the caller-relative flags for one page of results.
pub trait CallerMarksPort: Send + Sync {
    async fn load(
        &self,
        user_id: i32,
        recipe_ids: &[i32],
        author_ids: &[i32],
    ) -> Result<CallerMarks, ApiError>;
}

/// Ingredient lines of every recipe in a user's cart.
pub trait ShoppingListPort: Send + Sync {
    async fn cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>, ApiError>;
}

/// Storage for uploaded recipe images.
pub trait ImageStore: Send + Sync {
    /// Persist the image and return its path relative to the media root.
    async fn save(&self, image: &DecodedImage) -> Result<String, ApiError>;
}
