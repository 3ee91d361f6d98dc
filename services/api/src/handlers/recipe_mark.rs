use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use foodgram_auth_types::identity::Identity;

use crate::domain::types::MarkKind;
use crate::error::ApiError;
use crate::handlers::recipe::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::recipe_mark::{AddRecipeMarkUseCase, RemoveRecipeMarkUseCase};
use crate::usecase::shopping_list::DownloadShoppingListUseCase;

// ── POST /recipes/{id}/favorite/ ─────────────────────────────────────────────

pub async fn add_favourite(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(recipe_id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    let uc = AddRecipeMarkUseCase {
        marks: state.favourite_repo(),
        recipes: state.recipe_repo(),
        kind: MarkKind::Favourite,
    };
    let summary = uc.execute(identity.user_id, recipe_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(summary, &state)),
    ))
}

// ── DELETE /recipes/{id}/favorite/ ───────────────────────────────────────────

pub async fn remove_favourite(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(recipe_id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let uc = RemoveRecipeMarkUseCase {
        marks: state.favourite_repo(),
        recipes: state.recipe_repo(),
        kind: MarkKind::Favourite,
    };
    uc.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipes/{id}/shopping_cart/ ────────────────────────────────────────

pub async fn add_to_cart(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(recipe_id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), ApiError> {
    let uc = AddRecipeMarkUseCase {
        marks: state.cart_repo(),
        recipes: state.recipe_repo(),
        kind: MarkKind::ShoppingCart,
    };
    let summary = uc.execute(identity.user_id, recipe_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(summary, &state)),
    ))
}

// ── DELETE /recipes/{id}/shopping_cart/ ──────────────────────────────────────

pub async fn remove_from_cart(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(recipe_id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let uc = RemoveRecipeMarkUseCase {
        marks: state.cart_repo(),
        recipes: state.recipe_repo(),
        kind: MarkKind::ShoppingCart,
    };
    uc.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /recipes/download_shopping_cart/ ─────────────────────────────────────

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let uc = DownloadShoppingListUseCase {
        port: state.cart_repo(),
    };
    let body = uc.execute(identity.user_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cart_file.txt\"",
            ),
        ],
        body,
    ))
}
