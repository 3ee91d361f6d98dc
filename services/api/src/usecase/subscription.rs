use tracing::warn;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{Subscription, User};
use crate::error::ApiError;

async fn subscription_for<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u64>,
) -> Result<Subscription, ApiError> {
    let summaries = recipes
        .list_summaries_by_author(author.id, recipes_limit)
        .await?;
    let recipes_count = recipes.count_by_author(author.id).await?;
    Ok(Subscription {
        author,
        recipes: summaries,
        recipes_count,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U: UserRepository, F: FollowRepository, R: RecipeRepository> {
    pub users: U,
    pub follows: F,
    pub recipes: R,
}

impl<U: UserRepository, F: FollowRepository, R: RecipeRepository> SubscribeUseCase<U, F, R> {
    pub async fn execute(
        &self,
        user_id: i32,
        author_id: i32,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, ApiError> {
        if user_id == author_id {
            return Err(ApiError::SelfSubscription);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if self.follows.exists(user_id, author_id).await? {
            return Err(ApiError::AlreadySubscribed);
        }
        if !self.follows.insert(user_id, author_id).await? {
            warn!(user_id, author_id, "concurrent follow hit unique constraint");
            return Err(ApiError::AlreadySubscribed);
        }
        subscription_for(&self.recipes, author, recipes_limit).await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> UnsubscribeUseCase<U, F> {
    pub async fn execute(&self, user_id: i32, author_id: i32) -> Result<(), ApiError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        if !self.follows.remove(user_id, author_id).await? {
            return Err(ApiError::SubscriptionNotFound);
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: i32,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<(Vec<Subscription>, u64), ApiError> {
        let (authors, count) = self.follows.list_followed(user_id, page).await?;
        let mut subscriptions = Vec::with_capacity(authors.len());
        for author in authors {
            subscriptions.push(subscription_for(&self.recipes, author, recipes_limit).await?);
        }
        Ok((subscriptions, count))
    }
}
