use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::token::LoginUseCase;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

// ── POST /auth/token/login/ ──────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let uc = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let token = uc.execute(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        auth_token: token.token,
    }))
}

// ── POST /auth/token/logout/ ─────────────────────────────────────────────────

/// Tokens are stateless; logging out only checks that the caller holds a valid one.
pub async fn logout(_identity: Identity) -> StatusCode {
    StatusCode::NO_CONTENT
}
