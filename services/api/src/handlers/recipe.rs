use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
};
use axum_extra::extract::{Query, WithRejection};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::{Identity, MaybeIdentity};
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::filter::{RecipeFilter, RecipeFilterParams};
use crate::domain::types::{IngredientAmountInput, RecipeIngredient, RecipeSummary, RecipeView};
use crate::error::ApiError;
use crate::handlers::tag::TagResponse;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase,
    ListRecipesUseCase, UpdateRecipeInput, UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeAuthorResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(ingredient: RecipeIngredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
            amount: ingredient.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: RecipeAuthorResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeResponse {
    pub fn new(view: RecipeView, state: &AppState) -> Self {
        let recipe = view.recipe;
        Self {
            id: recipe.id,
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: RecipeAuthorResponse {
                email: recipe.author.email,
                id: recipe.author.id,
                username: recipe.author.username,
                first_name: recipe.author.first_name,
                last_name: recipe.author.last_name,
                is_subscribed: view.author_is_subscribed,
            },
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: recipe.name,
            image: state.media_url(&recipe.image),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// `{id, name, image, cooking_time}` form used by favourites, the cart and subscriptions.
#[derive(Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShortResponse {
    pub fn new(summary: RecipeSummary, state: &AppState) -> Self {
        Self {
            id: summary.id,
            image: state.media_url(&summary.image),
            name: summary.name,
            cooking_time: summary.cooking_time,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: f64,
}

/// Body of `POST` and `PATCH /recipes/`. Every field is optional on `PATCH`.
#[derive(Deserialize)]
pub struct RecipeWriteRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

fn amounts(items: Vec<IngredientAmountRequest>) -> Vec<IngredientAmountInput> {
    items
        .into_iter()
        .map(|item| IngredientAmountInput {
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect()
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{field}: this field is required")))
}

// ── GET /recipes/ ────────────────────────────────────────────────────────────

pub async fn list_recipes(
    caller: MaybeIdentity,
    State(state): State<AppState>,
    uri: Uri,
    WithRejection(Query(query), _): WithRejection<Query<RecipeListQuery>, ApiError>,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let page = PageRequest::from_query(query.page, query.limit);
    let filter = RecipeFilter::build(
        caller.user_id(),
        RecipeFilterParams {
            tags: query.tags,
            author: query.author,
            is_favorited: query.is_favorited,
            is_in_shopping_cart: query.is_in_shopping_cart,
        },
    )?;

    let uc = ListRecipesUseCase {
        repo: state.recipe_repo(),
        marks: state.caller_marks(),
    };
    let (views, count) = uc.execute(caller.user_id(), &filter, page).await?;
    let results = views
        .into_iter()
        .map(|view| RecipeResponse::new(view, &state))
        .collect();
    Ok(Json(Page::new(results, count, page, uri.path(), uri.query())))
}

// ── GET /recipes/{id}/ ───────────────────────────────────────────────────────

pub async fn get_recipe(
    caller: MaybeIdentity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let view = fetch_recipe(&state, caller.user_id(), id).await?;
    Ok(Json(RecipeResponse::new(view, &state)))
}

// ── POST /recipes/ ───────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RecipeWriteRequest>, ApiError>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let input = CreateRecipeInput {
        name: required(body.name, "name")?,
        text: required(body.text, "text")?,
        image: required(body.image, "image")?,
        cooking_time: required(body.cooking_time, "cooking_time")?,
        tags: required(body.tags, "tags")?,
        ingredients: amounts(required(body.ingredients, "ingredients")?),
    };
    let uc = CreateRecipeUseCase {
        repo: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
    };
    let recipe_id = uc.execute(identity.user_id, input).await?;

    let view = fetch_recipe(&state, Some(identity.user_id), recipe_id).await?;
    Ok((StatusCode::CREATED, Json(RecipeResponse::new(view, &state))))
}

// ── PATCH /recipes/{id}/ ─────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<RecipeWriteRequest>, ApiError>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let input = UpdateRecipeInput {
        name: body.name,
        text: body.text,
        image: body.image,
        cooking_time: body.cooking_time,
        tags: body.tags,
        ingredients: body.ingredients.map(amounts),
    };
    let uc = UpdateRecipeUseCase {
        repo: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
    };
    uc.execute(identity.user_id, identity.user_role, id, input)
        .await?;

    let view = fetch_recipe(&state, Some(identity.user_id), id).await?;
    Ok(Json(RecipeResponse::new(view, &state)))
}

// ── DELETE /recipes/{id}/ ────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
    };
    uc.execute(identity.user_id, identity.user_role, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_recipe(
    state: &AppState,
    caller: Option<i32>,
    id: i32,
) -> Result<RecipeView, ApiError> {
    let uc = GetRecipeUseCase {
        repo: state.recipe_repo(),
        marks: state.caller_marks(),
    };
    uc.execute(caller, id).await
}
