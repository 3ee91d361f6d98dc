use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
};
use axum_extra::extract::{Query, WithRejection};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::Subscription;
use crate::error::ApiError;
use crate::handlers::recipe::RecipeShortResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};

/// A followed author with their recipes. Always `is_subscribed: true`.
#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    fn new(subscription: Subscription, state: &AppState) -> Self {
        let author = subscription.author;
        Self {
            email: author.email,
            id: author.id,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes: subscription
                .recipes
                .into_iter()
                .map(|summary| RecipeShortResponse::new(summary, state))
                .collect(),
            recipes_count: subscription.recipes_count,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct SubscriptionListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u64>,
}

#[derive(Deserialize, Default)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

// ── GET /users/subscriptions/ ────────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    uri: Uri,
    WithRejection(Query(query), _): WithRejection<Query<SubscriptionListQuery>, ApiError>,
) -> Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let page = PageRequest::from_query(query.page, query.limit);
    let uc = ListSubscriptionsUseCase {
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let (subscriptions, count) = uc
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    let results = subscriptions
        .into_iter()
        .map(|s| SubscriptionResponse::new(s, &state))
        .collect();
    Ok(Json(Page::new(results, count, page, uri.path(), uri.query())))
}

// ── POST /users/{id}/subscribe/ ──────────────────────────────────────────────

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(author_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<SubscribeQuery>, ApiError>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let uc = SubscribeUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let subscription = uc
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(subscription, &state)),
    ))
}

// ── DELETE /users/{id}/subscribe/ ────────────────────────────────────────────

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(author_id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let uc = UnsubscribeUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    uc.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
