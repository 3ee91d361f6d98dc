use tracing::info;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{CallerMarksPort, UserRepository};
use crate::domain::types::{NewUser, User, UserView};
use crate::domain::validation;
use crate::error::ApiError;
use crate::usecase::marks_for_users;
use crate::usecase::password::{hash_password, verify_password};

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct RegisterUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUserUseCase<U> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiError> {
        validation::email(&input.email)?;
        validation::username(&input.username)?;
        validation::person_name("first_name", &input.first_name)?;
        validation::person_name("last_name", &input.last_name)?;
        validation::password(&input.password)?;

        if self.users.email_exists(&input.email).await? {
            return Err(ApiError::EmailTaken);
        }
        if self.users.username_exists(&input.username).await? {
            return Err(ApiError::UsernameTaken);
        }

        let user = self
            .users
            .create(&NewUser {
                password_hash: hash_password(&input.password)?,
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, M: CallerMarksPort> {
    pub users: U,
    pub marks: M,
}

impl<U: UserRepository, M: CallerMarksPort> ListUsersUseCase<U, M> {
    pub async fn execute(
        &self,
        caller: Option<i32>,
        page: PageRequest,
    ) -> Result<(Vec<UserView>, u64), ApiError> {
        let (users, count) = self.users.list(page).await?;
        let marks = marks_for_users(&self.marks, caller, &users).await?;
        let views = users.into_iter().map(|u| marks.user_view(u)).collect();
        Ok((views, count))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, M: CallerMarksPort> {
    pub users: U,
    pub marks: M,
}

impl<U: UserRepository, M: CallerMarksPort> GetUserUseCase<U, M> {
    pub async fn execute(&self, caller: Option<i32>, id: i32) -> Result<UserView, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let marks = marks_for_users(&self.marks, caller, std::slice::from_ref(&user)).await?;
        Ok(marks.user_view(user))
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetPasswordUseCase<U> {
    pub async fn execute(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let credentials = self
            .users
            .find_credentials_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !verify_password(current_password, &credentials.password_hash) {
            return Err(ApiError::WrongPassword);
        }
        validation::password(new_password)?;
        self.users
            .update_password(user_id, &hash_password(new_password)?)
            .await?;
        info!(user_id, "password changed");
        Ok(())
    }
}
