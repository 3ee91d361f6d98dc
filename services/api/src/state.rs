use std::path::PathBuf;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use foodgram_auth_types::identity::JwtSecret;

use crate::infra::db::{
    DbCallerMarks, DbCartRepository, DbFavouriteRepository, DbFollowRepository,
    DbIngredientRepository, DbRecipeRepository, DbTagRepository, DbUserRepository,
};
use crate::infra::image_store::LocalImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub media_root: PathBuf,
    /// Public prefix for stored images, always ending in `/`.
    pub media_url: String,
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}

impl AppState {
    /// Public URL of a stored image path.
    pub fn media_url(&self, path: &str) -> String {
        format!("{}{}", self.media_url, path)
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn favourite_repo(&self) -> DbFavouriteRepository {
        DbFavouriteRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbCartRepository {
        DbCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn caller_marks(&self) -> DbCallerMarks {
        DbCallerMarks {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> LocalImageStore {
        LocalImageStore {
            root: self.media_root.clone(),
        }
    }
}
