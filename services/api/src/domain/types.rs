use std::collections::HashSet;

use chrono::{DateTime, Utc};

use foodgram_domain::user::UserRole;

use crate::error::ApiError;

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub date_joined: DateTime<Utc>,
}

/// A user together with the stored argon2 hash. Never leaves the usecase layer.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// A user as seen by a particular caller.
#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub user: User,
    pub is_subscribed: bool,
}

// ── Reference data ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

// ── Recipes ──────────────────────────────────────────────────────────────────

/// An ingredient with the amount a recipe uses. `id` is the ingredient id.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i32,
    pub author: User,
    pub name: String,
    pub text: String,
    /// Path relative to the media root.
    pub image: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Short recipe form used by favourites, the cart and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientAmountInput {
    pub ingredient_id: i32,
    pub amount: f64,
}

/// Fully validated recipe ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmountInput>,
}

/// Partial recipe update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
}

/// A recipe as seen by a particular caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub author_is_subscribed: bool,
}

/// The caller's favourite, cart and follow rows restricted to the ids on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerMarks {
    pub favourites: HashSet<i32>,
    pub cart: HashSet<i32>,
    pub followed: HashSet<i32>,
}

impl CallerMarks {
    pub fn view(&self, recipe: Recipe) -> RecipeView {
        RecipeView {
            is_favorited: self.favourites.contains(&recipe.id),
            is_in_shopping_cart: self.cart.contains(&recipe.id),
            author_is_subscribed: self.followed.contains(&recipe.author.id),
            recipe,
        }
    }

    pub fn user_view(&self, user: User) -> UserView {
        UserView {
            is_subscribed: self.followed.contains(&user.id),
            user,
        }
    }
}

// ── Favourites / cart ────────────────────────────────────────────────────────

/// Which per-user recipe list a mark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Favourite,
    ShoppingCart,
}

impl MarkKind {
    pub fn already_marked(self) -> ApiError {
        match self {
            Self::Favourite => ApiError::AlreadyFavourited,
            Self::ShoppingCart => ApiError::AlreadyInCart,
        }
    }

    pub fn not_marked(self) -> ApiError {
        match self {
            Self::Favourite => ApiError::FavouriteNotFound,
            Self::ShoppingCart => ApiError::CartItemNotFound,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favourite => "favourite",
            Self::ShoppingCart => "shopping_cart",
        }
    }
}

/// One recipe-ingredient link of a recipe in the caller's cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

// ── Subscriptions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub author: User,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}
