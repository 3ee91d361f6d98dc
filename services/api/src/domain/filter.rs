//! Recipe list filtering.

use crate::error::ApiError;

/// Conjunctive filter over the recipe collection. Empty fields are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Keep recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    pub author_id: Option<i32>,
    /// Keep recipes favourited by this user.
    pub favourited_by: Option<i32>,
    /// Keep recipes in this user's shopping cart.
    pub in_cart_of: Option<i32>,
}

/// Raw recipe filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilterParams {
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeFilter {
    /// Build a filter for `caller`.
    ///
    /// The membership flags require an authenticated caller; an anonymous caller
    /// asking for them gets `Unauthorized` rather than an unfiltered list.
    pub fn build(caller: Option<i32>, params: RecipeFilterParams) -> Result<Self, ApiError> {
        let favourited = parse_flag("is_favorited", params.is_favorited.as_deref())?;
        let in_cart = parse_flag("is_in_shopping_cart", params.is_in_shopping_cart.as_deref())?;
        if (favourited || in_cart) && caller.is_none() {
            return Err(ApiError::Unauthorized);
        }

        let mut tag_slugs = params.tags;
        tag_slugs.retain(|slug| !slug.is_empty());
        tag_slugs.sort();
        tag_slugs.dedup();

        Ok(Self {
            tag_slugs,
            author_id: params.author,
            favourited_by: caller.filter(|_| favourited),
            in_cart_of: caller.filter(|_| in_cart),
        })
    }
}

/// `1`/`true` enable a flag, `0`/`false` or absence leave it off.
fn parse_flag(name: &str, value: Option<&str>) -> Result<bool, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(ApiError::validation(format!(
            "{name}: expected 0, 1, true or false, got {v:?}"
        ))),
    }
}
