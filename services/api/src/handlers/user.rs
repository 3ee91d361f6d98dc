use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
};
use axum_extra::extract::{Query, WithRejection};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::{Identity, MaybeIdentity};
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::{User, UserView};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, SetPasswordUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            email: view.user.email,
            id: view.user.id,
            username: view.user.username,
            first_name: view.user.first_name,
            last_name: view.user.last_name,
            is_subscribed: view.is_subscribed,
        }
    }
}

/// Registration echo; carries no caller-relative fields.
#[derive(Serialize)]
pub struct CreatedUserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for CreatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ── GET /users/ ──────────────────────────────────────────────────────────────

pub async fn list_users(
    caller: MaybeIdentity,
    State(state): State<AppState>,
    uri: Uri,
    WithRejection(Query(query), _): WithRejection<Query<UserListQuery>, ApiError>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let page = PageRequest::from_query(query.page, query.limit);
    let uc = ListUsersUseCase {
        users: state.user_repo(),
        marks: state.caller_marks(),
    };
    let (users, count) = uc.execute(caller.user_id(), page).await?;
    let results = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Page::new(results, count, page, uri.path(), uri.query())))
}

// ── POST /users/ ─────────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterUserRequest>, ApiError>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let uc = RegisterUserUseCase {
        users: state.user_repo(),
    };
    let user = uc
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/{id}/ ─────────────────────────────────────────────────────────

pub async fn get_user(
    caller: MaybeIdentity,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = GetUserUseCase {
        users: state.user_repo(),
        marks: state.caller_marks(),
    };
    Ok(Json(uc.execute(caller.user_id(), id).await?.into()))
}

// ── GET /users/me/ ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = GetUserUseCase {
        users: state.user_repo(),
        marks: state.caller_marks(),
    };
    Ok(Json(
        uc.execute(Some(identity.user_id), identity.user_id)
            .await?
            .into(),
    ))
}

// ── POST /users/set_password/ ────────────────────────────────────────────────

pub async fn set_password(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SetPasswordRequest>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let uc = SetPasswordUseCase {
        users: state.user_repo(),
    };
    uc.execute(
        identity.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
