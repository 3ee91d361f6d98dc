use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::ApiError;

pub struct ListIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> ListIngredientsUseCase<R> {
    /// All ingredients, or those whose name contains `name`, prefix matches first.
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let ingredients = self.repo.search(name).await?;
        Ok(match name {
            Some(query) => prefix_matches_first(ingredients, query),
            None => ingredients,
        })
    }
}

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}

/// Stable partition: case-insensitive prefix matches, then the rest.
fn prefix_matches_first(ingredients: Vec<Ingredient>, query: &str) -> Vec<Ingredient> {
    let query = query.to_lowercase();
    let (mut prefix, rest): (Vec<_>, Vec<_>) = ingredients
        .into_iter()
        .partition(|i| i.name.to_lowercase().starts_with(&query));
    prefix.extend(rest);
    prefix
}
