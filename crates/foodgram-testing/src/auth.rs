//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real access token with [`TEST_JWT_SECRET`], so requests
//! pass through the same `Identity` extractor as production traffic. Services
//! under test must be configured with the same secret.

use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use foodgram_auth_types::token::issue_access_token;
use foodgram_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "foodgram-test-secret";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: i32, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn regular(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Regular)
    }

    pub fn staff(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Staff)
    }

    /// Signed access token for this identity.
    pub fn token(&self) -> String {
        issue_access_token(self.user_id, self.user_role, TEST_JWT_SECRET)
            .expect("test token should sign")
            .token
    }

    /// `Authorization: Token <jwt>` header value.
    pub fn authorization(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Token {}", self.token()))
            .expect("token is a valid header value")
    }

    /// Return headers carrying this identity's access token.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.authorization());
        map
    }
}
