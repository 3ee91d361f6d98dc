use std::collections::HashSet;

use tracing::info;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;

use crate::domain::filter::RecipeFilter;
use crate::domain::image::decode_data_uri;
use crate::domain::permission::may_modify_recipe;
use crate::domain::repository::{
    CallerMarksPort, ImageStore, IngredientRepository, RecipeRepository, TagRepository,
};
use crate::domain::types::{IngredientAmountInput, NewRecipe, RecipeChanges, RecipeView};
use crate::domain::validation;
use crate::error::ApiError;
use crate::usecase::marks_for_recipes;

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository, M: CallerMarksPort> {
    pub repo: R,
    pub marks: M,
}

impl<R: RecipeRepository, M: CallerMarksPort> ListRecipesUseCase<R, M> {
    pub async fn execute(
        &self,
        caller: Option<i32>,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<RecipeView>, u64), ApiError> {
        let (recipes, count) = self.repo.list(filter, page).await?;
        let marks = marks_for_recipes(&self.marks, caller, &recipes).await?;
        let views = recipes.into_iter().map(|r| marks.view(r)).collect();
        Ok((views, count))
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository, M: CallerMarksPort> {
    pub repo: R,
    pub marks: M,
}

impl<R: RecipeRepository, M: CallerMarksPort> GetRecipeUseCase<R, M> {
    pub async fn execute(&self, caller: Option<i32>, id: i32) -> Result<RecipeView, ApiError> {
        let recipe = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        let marks = marks_for_recipes(&self.marks, caller, std::slice::from_ref(&recipe)).await?;
        Ok(marks.view(recipe))
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeInput {
    pub name: String,
    pub text: String,
    /// `data:image/<ext>;base64,...`
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmountInput>,
}

pub struct CreateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub repo: R,
    pub tags: T,
    pub ingredients: I,
    pub images: S,
}

impl<R, T, I, S> CreateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    /// Returns the id of the new recipe.
    pub async fn execute(&self, author_id: i32, input: CreateRecipeInput) -> Result<i32, ApiError> {
        validation::recipe_name(&input.name)?;
        validation::recipe_text(&input.text)?;
        validation::cooking_time(input.cooking_time)?;
        let tag_ids = validation::tag_ids(&input.tags)?;
        validation::ingredient_amounts(&input.ingredients)?;
        let image = decode_data_uri(&input.image)?;

        ensure_tags_exist(&self.tags, &tag_ids).await?;
        ensure_ingredients_exist(&self.ingredients, &input.ingredients).await?;

        let image_path = self.images.save(&image).await?;
        let recipe_id = self
            .repo
            .create(&NewRecipe {
                author_id,
                name: input.name,
                text: input.text,
                image: image_path,
                cooking_time: input.cooking_time,
                tag_ids,
                ingredients: input.ingredients,
            })
            .await?;

        info!(recipe_id, author_id, "recipe created");
        Ok(recipe_id)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
}

pub struct UpdateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub repo: R,
    pub tags: T,
    pub ingredients: I,
    pub images: S,
}

impl<R, T, I, S> UpdateRecipeUseCase<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    pub async fn execute(
        &self,
        caller_id: i32,
        caller_role: UserRole,
        recipe_id: i32,
        input: UpdateRecipeInput,
    ) -> Result<(), ApiError> {
        let author_id = self
            .repo
            .find_author_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !may_modify_recipe(caller_id, caller_role, author_id) {
            return Err(ApiError::Forbidden);
        }

        if let Some(name) = &input.name {
            validation::recipe_name(name)?;
        }
        if let Some(text) = &input.text {
            validation::recipe_text(text)?;
        }
        if let Some(minutes) = input.cooking_time {
            validation::cooking_time(minutes)?;
        }
        let tag_ids = input
            .tags
            .as_deref()
            .map(validation::tag_ids)
            .transpose()?;
        if let Some(items) = &input.ingredients {
            validation::ingredient_amounts(items)?;
        }
        let image = input.image.as_deref().map(decode_data_uri).transpose()?;

        if let Some(ids) = &tag_ids {
            ensure_tags_exist(&self.tags, ids).await?;
        }
        if let Some(items) = &input.ingredients {
            ensure_ingredients_exist(&self.ingredients, items).await?;
        }

        let image_path = match &image {
            Some(image) => Some(self.images.save(image).await?),
            None => None,
        };
        self.repo
            .update(
                recipe_id,
                &RecipeChanges {
                    name: input.name,
                    text: input.text,
                    image: image_path,
                    cooking_time: input.cooking_time,
                    tag_ids,
                    ingredients: input.ingredients,
                },
            )
            .await?;

        info!(recipe_id, caller_id, "recipe updated");
        Ok(())
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(
        &self,
        caller_id: i32,
        caller_role: UserRole,
        recipe_id: i32,
    ) -> Result<(), ApiError> {
        let author_id = self
            .repo
            .find_author_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !may_modify_recipe(caller_id, caller_role, author_id) {
            return Err(ApiError::Forbidden);
        }
        if !self.repo.delete(recipe_id).await? {
            return Err(ApiError::RecipeNotFound);
        }
        info!(recipe_id, caller_id, "recipe deleted");
        Ok(())
    }
}

// ── Reference checks ─────────────────────────────────────────────────────────

async fn ensure_tags_exist<T: TagRepository>(tags: &T, ids: &[i32]) -> Result<(), ApiError> {
    let existing = tags.existing_ids(ids).await?;
    match first_missing(ids.iter().copied(), &existing) {
        Some(id) => Err(ApiError::validation(format!("tags: tag {id} does not exist"))),
        None => Ok(()),
    }
}

async fn ensure_ingredients_exist<I: IngredientRepository>(
    ingredients: &I,
    items: &[IngredientAmountInput],
) -> Result<(), ApiError> {
    let ids: Vec<i32> = items.iter().map(|item| item.ingredient_id).collect();
    let existing = ingredients.existing_ids(&ids).await?;
    match first_missing(ids.into_iter(), &existing) {
        Some(id) => Err(ApiError::validation(format!(
            "ingredients: ingredient {id} does not exist"
        ))),
        None => Ok(()),
    }
}

fn first_missing(mut ids: impl Iterator<Item = i32>, existing: &HashSet<i32>) -> Option<i32> {
    ids.find(|id| !existing.contains(id))
}
