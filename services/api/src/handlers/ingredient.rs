use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::{Query, WithRejection};
use serde::{Deserialize, Serialize};

use crate::domain::types::Ingredient;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::ingredient::{GetIngredientUseCase, ListIngredientsUseCase};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

// ── GET /ingredients/ ────────────────────────────────────────────────────────

pub async fn list_ingredients(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<IngredientQuery>, ApiError>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let uc = ListIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredients = uc.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

// ── GET /ingredients/{id}/ ───────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let uc = GetIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}
