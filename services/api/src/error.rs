use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::QueryRejection;

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("recipe is not in favourites")]
    FavouriteNotFound,
    #[error("recipe is not in shopping cart")]
    CartItemNotFound,
    #[error("not subscribed to this author")]
    SubscriptionNotFound,
    #[error("recipe is already in favourites")]
    AlreadyFavourited,
    #[error("recipe is already in shopping cart")]
    AlreadyInCart,
    #[error("already subscribed to this author")]
    AlreadySubscribed,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error("a user with this username already exists")]
    UsernameTaken,
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,
    #[error("current password is incorrect")]
    WrongPassword,
    #[error("{0}")]
    Validation(String),
    #[error("authentication credentials were not provided")]
    Unauthorized,
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::FavouriteNotFound => "FAVOURITE_NOT_FOUND",
            Self::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::AlreadyFavourited => "ALREADY_FAVOURITED",
            Self::AlreadyInCart => "ALREADY_IN_CART",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::FavouriteNotFound
            | Self::CartItemNotFound
            | Self::SubscriptionNotFound => StatusCode::NOT_FOUND,
            // Conflicts are reported as 400, matching the validation errors.
            Self::AlreadyFavourited
            | Self::AlreadyInCart
            | Self::AlreadySubscribed
            | Self::EmailTaken
            | Self::UsernameTaken
            | Self::SelfSubscription
            | Self::InvalidCredentials
            | Self::WrongPassword
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.to_string())
    }
}
