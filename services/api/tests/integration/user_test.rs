use std::collections::HashSet;

use foodgram_api::domain::types::CallerMarks;
use foodgram_api::usecase::ingredient::ListIngredientsUseCase;
use foodgram_api::usecase::password::verify_password;
use foodgram_api::usecase::token::LoginUseCase;
use foodgram_api::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, SetPasswordUseCase,
};
use foodgram_auth_types::token::validate_access_token;
use foodgram_domain::pagination::PageRequest;
use foodgram_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{
    MockCallerMarks, MockIngredientRepo, MockUserRepo, TEST_PASSWORD, assert_error,
    test_credentials, test_ingredient,
};

fn registration(email: &str, username: &str) -> RegisterUserInput {
    RegisterUserInput {
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        password: "analytical-engine".to_owned(),
    }
}

// ── RegisterUserUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_with_hashed_password() {
    let usecase = RegisterUserUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    let user = usecase
        .execute(registration("ada@example.com", "ada"))
        .await
        .unwrap();

    assert_eq!(user.id, 2);
    assert_eq!(user.username, "ada");
    let users = usecase.users.users_handle();
    let stored = users.lock().unwrap();
    assert_ne!(stored[1].password_hash, "analytical-engine");
    assert!(verify_password("analytical-engine", &stored[1].password_hash));
}

#[tokio::test]
async fn should_reject_taken_email() {
    let usecase = RegisterUserUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    assert_error(
        usecase
            .execute(registration("user1@example.com", "someone"))
            .await,
        "EMAIL_TAKEN",
    );
}

#[tokio::test]
async fn should_reject_taken_username() {
    let usecase = RegisterUserUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    assert_error(
        usecase
            .execute(registration("new@example.com", "user1"))
            .await,
        "USERNAME_TAKEN",
    );
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let usecase = RegisterUserUseCase {
        users: MockUserRepo::empty(),
    };

    assert_error(
        usecase.execute(registration("not-an-email", "ada")).await,
        "VALIDATION_ERROR",
    );
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_credentials(4)]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let token = usecase
        .execute("user4@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    let info = validate_access_token(&token.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, 4);
}

#[tokio::test]
async fn should_fail_identically_for_unknown_email_and_wrong_password() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_credentials(4)]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    assert_error(
        usecase.execute("nobody@example.com", TEST_PASSWORD).await,
        "INVALID_CREDENTIALS",
    );
    assert_error(
        usecase.execute("user4@example.com", "wrong-password").await,
        "INVALID_CREDENTIALS",
    );
}

// ── SetPasswordUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_when_current_matches() {
    let usecase = SetPasswordUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    usecase
        .execute(1, TEST_PASSWORD, "brand-new-secret")
        .await
        .unwrap();

    let users = usecase.users.users_handle();
    let stored = users.lock().unwrap();
    assert!(verify_password("brand-new-secret", &stored[0].password_hash));
}

#[tokio::test]
async fn should_reject_wrong_current_password() {
    let usecase = SetPasswordUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    assert_error(
        usecase.execute(1, "not-it", "brand-new-secret").await,
        "WRONG_PASSWORD",
    );
}

#[tokio::test]
async fn should_reject_numeric_new_password() {
    let usecase = SetPasswordUseCase {
        users: MockUserRepo::new(vec![test_credentials(1)]),
    };

    assert_error(
        usecase.execute(1, TEST_PASSWORD, "1234567890").await,
        "VALIDATION_ERROR",
    );
}

// ── ListUsers / GetUser ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_followed_users_for_caller() {
    let usecase = ListUsersUseCase {
        users: MockUserRepo::new(vec![test_credentials(1), test_credentials(2)]),
        marks: MockCallerMarks::new(CallerMarks {
            followed: HashSet::from([2]),
            ..Default::default()
        }),
    };

    let (views, count) = usecase
        .execute(Some(1), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert!(!views[0].is_subscribed);
    assert!(views[1].is_subscribed);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_user() {
    let usecase = GetUserUseCase {
        users: MockUserRepo::empty(),
        marks: MockCallerMarks::empty(),
    };

    assert_error(usecase.execute(None, 9).await, "USER_NOT_FOUND");
}

// ── ListIngredientsUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_search_ingredients_with_prefix_matches_first() {
    let usecase = ListIngredientsUseCase {
        repo: MockIngredientRepo::new(vec![
            test_ingredient(1, "brown sugar"),
            test_ingredient(2, "salt"),
            test_ingredient(3, "sugar"),
        ]),
    };

    let found = usecase.execute(Some(" Sug ")).await.unwrap();

    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["sugar", "brown sugar"]);
}
