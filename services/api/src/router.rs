use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use foodgram_core::health::{healthz, readyz};
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    ingredient::{get_ingredient, list_ingredients},
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    recipe_mark::{
        add_favourite, add_to_cart, download_shopping_cart, remove_favourite, remove_from_cart,
    },
    subscription::{list_subscriptions, subscribe, unsubscribe},
    tag::{get_tag, list_tags},
    token::{login, logout},
    user::{create_user, get_me, get_user, list_users, set_password},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(state.media_root.clone());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/token/login/", post(login))
        .route("/auth/token/logout/", post(logout))
        // Users
        .route("/users/", get(list_users).post(create_user))
        .route("/users/me/", get(get_me))
        .route("/users/set_password/", post(set_password))
        .route("/users/subscriptions/", get(list_subscriptions))
        .route("/users/{id}/", get(get_user))
        .route("/users/{id}/subscribe/", post(subscribe).delete(unsubscribe))
        // Reference data
        .route("/tags/", get(list_tags))
        .route("/tags/{id}/", get(get_tag))
        .route("/ingredients/", get(list_ingredients))
        .route("/ingredients/{id}/", get(get_ingredient))
        // Recipes
        .route("/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/recipes/{id}/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite/",
            post(add_favourite).delete(remove_favourite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
        // Uploaded images
        .nest_service("/media", media)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
