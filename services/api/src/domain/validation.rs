//! Field validation for recipe writes and account registration.

use std::collections::HashSet;

use crate::domain::types::IngredientAmountInput;
use crate::error::ApiError;

pub const RECIPE_NAME_MAX_CHARS: usize = 200;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const PERSON_NAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 8;

// ── Recipes ──────────────────────────────────────────────────────────────────

pub fn recipe_name(name: &str) -> Result<(), ApiError> {
    not_blank("name", name)?;
    max_chars("name", name, RECIPE_NAME_MAX_CHARS)
}

pub fn recipe_text(text: &str) -> Result<(), ApiError> {
    not_blank("text", text)
}

pub fn cooking_time(minutes: i32) -> Result<(), ApiError> {
    if minutes < 1 {
        return Err(ApiError::validation("cooking_time: must be at least 1"));
    }
    Ok(())
}

/// Non-empty tag list. Repeated ids collapse to one, first occurrence wins.
pub fn tag_ids(ids: &[i32]) -> Result<Vec<i32>, ApiError> {
    if ids.is_empty() {
        return Err(ApiError::validation("tags: at least one tag is required"));
    }
    let mut seen = HashSet::new();
    Ok(ids.iter().copied().filter(|id| seen.insert(*id)).collect())
}

/// Non-empty ingredient list, each ingredient at most once, finite non-negative amounts.
pub fn ingredient_amounts(items: &[IngredientAmountInput]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::validation(
            "ingredients: at least one ingredient is required",
        ));
    }
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.ingredient_id) {
            return Err(ApiError::validation(format!(
                "ingredients: ingredient {} is listed more than once",
                item.ingredient_id
            )));
        }
        if !item.amount.is_finite() || item.amount < 0.0 {
            return Err(ApiError::validation(format!(
                "ingredients: amount for ingredient {} must be a non-negative number",
                item.ingredient_id
            )));
        }
    }
    Ok(())
}

// ── Accounts ─────────────────────────────────────────────────────────────────

pub fn email(email: &str) -> Result<(), ApiError> {
    not_blank("email", email)?;
    max_chars("email", email, EMAIL_MAX_CHARS)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::validation("email: enter a valid email address")),
    }
}

/// Letters, digits and `@ . + - _` only.
pub fn username(username: &str) -> Result<(), ApiError> {
    not_blank("username", username)?;
    max_chars("username", username, USERNAME_MAX_CHARS)?;
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(ApiError::validation(
            "username: only letters, digits and @/./+/-/_ are allowed",
        ));
    }
    Ok(())
}

pub fn person_name(field: &str, value: &str) -> Result<(), ApiError> {
    not_blank(field, value)?;
    max_chars(field, value, PERSON_NAME_MAX_CHARS)
}

pub fn password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ApiError::validation(format!(
            "password: must contain at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation("password: must not be entirely numeric"));
    }
    Ok(())
}

fn not_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field}: must not be empty")));
    }
    Ok(())
}

fn max_chars(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::validation(format!(
            "{field}: must be at most {max} characters"
        )));
    }
    Ok(())
}
