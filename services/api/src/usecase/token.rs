use anyhow::Context as _;
use tracing::info;

use foodgram_auth_types::token::{IssuedToken, issue_access_token};

use crate::domain::repository::UserRepository;
use crate::error::ApiError;
use crate::usecase::password::verify_password;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    /// Exchange email + password for an access token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn execute(&self, email: &str, password: &str) -> Result<IssuedToken, ApiError> {
        let credentials = self
            .users
            .find_credentials_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(password, &credentials.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }
        let token = issue_access_token(
            credentials.user.id,
            credentials.user.role,
            &self.jwt_secret,
        )
        .context("sign access token")?;
        info!(user_id = credentials.user.id, "access token issued");
        Ok(token)
    }
}
