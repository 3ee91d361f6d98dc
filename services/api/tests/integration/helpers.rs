use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use foodgram_api::domain::filter::RecipeFilter;
use foodgram_api::domain::image::DecodedImage;
use foodgram_api::domain::repository::{
    CallerMarksPort, FollowRepository, ImageStore, IngredientRepository, RecipeMarkRepository,
    RecipeRepository, ShoppingListPort, TagRepository, UserRepository,
};
use foodgram_api::domain::types::{
    CallerMarks, CartLine, Ingredient, NewRecipe, NewUser, Recipe, RecipeChanges,
    RecipeIngredient, RecipeSummary, Tag, User, UserCredentials,
};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::password::hash_password;
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;

pub const TEST_PASSWORD: &str = "correct-horse";

/// 1x1 transparent PNG.
pub const TEST_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: i32) -> User {
    User {
        id,
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        first_name: "Test".to_owned(),
        last_name: format!("User{id}"),
        role: UserRole::Regular,
        date_joined: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn test_credentials(id: i32) -> UserCredentials {
    UserCredentials {
        user: test_user(id),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
    }
}

pub fn test_tag(id: i32, slug: &str) -> Tag {
    Tag {
        id,
        name: slug.to_owned(),
        color: "#E26C2D".to_owned(),
        slug: slug.to_owned(),
    }
}

pub fn test_ingredient(id: i32, name: &str) -> Ingredient {
    Ingredient {
        id,
        name: name.to_owned(),
        measurement_unit: "g".to_owned(),
    }
}

pub fn test_recipe(id: i32, author_id: i32) -> Recipe {
    Recipe {
        id,
        author: test_user(author_id),
        name: format!("Recipe {id}"),
        text: "Mix and bake.".to_owned(),
        image: format!("recipes/{id}.png"),
        cooking_time: 30,
        pub_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, id as u32).unwrap(),
        tags: vec![test_tag(1, "breakfast")],
        ingredients: vec![RecipeIngredient {
            id: 1,
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
            amount: 200.0,
        }],
    }
}

fn summary(recipe: &Recipe) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id,
        name: recipe.name.clone(),
        image: recipe.image.clone(),
        cooking_time: recipe.cooking_time,
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<UserCredentials>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<UserCredentials>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<UserCredentials>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        Ok(self.find_credentials_by_id(id).await?.map(|c| c.user))
    }

    async fn find_credentials_by_id(&self, id: i32) -> Result<Option<UserCredentials>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|c| c.user.id == id).cloned())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|c| c.user.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|c| c.user.email == email))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|c| c.user.username == username))
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let users = self.users.lock().unwrap();
        let page = page.clamped();
        let results = users
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|c| c.user.clone())
            .collect();
        Ok((results, users.len() as u64))
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|c| c.user.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: UserRole::Regular,
            date_joined: Utc::now(),
        };
        users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(c) = users.iter_mut().find(|c| c.user.id == id) {
            c.password_hash = password_hash.to_owned();
        }
        Ok(())
    }
}

// ── MockTagRepo / MockIngredientRepo ─────────────────────────────────────────

pub struct MockTagRepo {
    pub tags: Vec<Tag>,
}

impl MockTagRepo {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }
}

impl TagRepository for MockTagRepo {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.tags.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        Ok(self.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        Ok(self
            .tags
            .iter()
            .map(|t| t.id)
            .filter(|id| ids.contains(id))
            .collect())
    }
}

pub struct MockIngredientRepo {
    pub ingredients: Vec<Ingredient>,
}

impl MockIngredientRepo {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self { ingredients }
    }
}

impl IngredientRepository for MockIngredientRepo {
    async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let needle = name.map(str::to_lowercase);
        let mut found: Vec<Ingredient> = self
            .ingredients
            .iter()
            .filter(|i| match &needle {
                Some(n) => i.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        Ok(self.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        Ok(self
            .ingredients
            .iter()
            .map(|i| i.id)
            .filter(|id| ids.contains(id))
            .collect())
    }
}

// ── MockRecipeRepo ───────────────────────────────────────────────────────────

pub struct MockRecipeRepo {
    pub recipes: Arc<Mutex<Vec<Recipe>>>,
    pub created: Arc<Mutex<Vec<NewRecipe>>>,
    pub updates: Arc<Mutex<Vec<(i32, RecipeChanges)>>>,
    /// (user_id, recipe_id) pairs consulted by `favourited_by`.
    pub favourites: Vec<(i32, i32)>,
    /// (user_id, recipe_id) pairs consulted by `in_cart_of`.
    pub cart: Vec<(i32, i32)>,
}

impl MockRecipeRepo {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(Mutex::new(recipes)),
            created: Arc::new(Mutex::new(vec![])),
            updates: Arc::new(Mutex::new(vec![])),
            favourites: vec![],
            cart: vec![],
        }
    }

    pub fn with_marks(mut self, favourites: Vec<(i32, i32)>, cart: Vec<(i32, i32)>) -> Self {
        self.favourites = favourites;
        self.cart = cart;
        self
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl RecipeRepository for MockRecipeRepo {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError> {
        let recipes = self.recipes.lock().unwrap();
        let mut matching: Vec<Recipe> = recipes
            .iter()
            .filter(|r| filter.author_id.is_none_or(|a| r.author.id == a))
            .filter(|r| {
                filter.tag_slugs.is_empty()
                    || r.tags.iter().any(|t| filter.tag_slugs.contains(&t.slug))
            })
            .filter(|r| {
                filter
                    .favourited_by
                    .is_none_or(|u| self.favourites.contains(&(u, r.id)))
            })
            .filter(|r| filter.in_cart_of.is_none_or(|u| self.cart.contains(&(u, r.id))))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        let count = matching.len() as u64;
        let page = page.clamped();
        let results = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((results, count))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let recipes = self.recipes.lock().unwrap();
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError> {
        let recipes = self.recipes.lock().unwrap();
        Ok(recipes.iter().find(|r| r.id == id).map(summary))
    }

    async fn find_author_id(&self, id: i32) -> Result<Option<i32>, ApiError> {
        let recipes = self.recipes.lock().unwrap();
        Ok(recipes.iter().find(|r| r.id == id).map(|r| r.author.id))
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<i32, ApiError> {
        let mut created = self.created.lock().unwrap();
        created.push(recipe.clone());
        Ok(100 + created.len() as i32)
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        self.updates.lock().unwrap().push((id, changes.clone()));
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() != before)
    }

    async fn list_summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let recipes = self.recipes.lock().unwrap();
        let mut own: Vec<&Recipe> = recipes.iter().filter(|r| r.author.id == author_id).collect();
        own.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(own.into_iter().take(limit).map(summary).collect())
    }

    async fn count_by_author(&self, author_id: i32) -> Result<u64, ApiError> {
        let recipes = self.recipes.lock().unwrap();
        Ok(recipes.iter().filter(|r| r.author.id == author_id).count() as u64)
    }
}

// ── MockMarkRepo ─────────────────────────────────────────────────────────────

pub struct MockMarkRepo {
    pub marks: Arc<Mutex<HashSet<(i32, i32)>>>,
    /// Simulate a concurrent insert: `exists` misses but `insert` conflicts.
    pub raced: bool,
}

impl MockMarkRepo {
    pub fn new(marks: &[(i32, i32)]) -> Self {
        Self {
            marks: Arc::new(Mutex::new(marks.iter().copied().collect())),
            raced: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn raced() -> Self {
        Self {
            raced: true,
            ..Self::empty()
        }
    }
}

impl RecipeMarkRepository for MockMarkRepo {
    async fn exists(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.marks.lock().unwrap().contains(&(user_id, recipe_id)))
    }

    async fn insert(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        if self.raced {
            return Ok(false);
        }
        Ok(self.marks.lock().unwrap().insert((user_id, recipe_id)))
    }

    async fn remove(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        Ok(self.marks.lock().unwrap().remove(&(user_id, recipe_id)))
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

pub struct MockFollowRepo {
    pub follows: Arc<Mutex<HashSet<(i32, i32)>>>,
}

impl MockFollowRepo {
    pub fn new(follows: &[(i32, i32)]) -> Self {
        Self {
            follows: Arc::new(Mutex::new(follows.iter().copied().collect())),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }
}

impl FollowRepository for MockFollowRepo {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        Ok(self.follows.lock().unwrap().contains(&(user_id, author_id)))
    }

    async fn insert(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        Ok(self.follows.lock().unwrap().insert((user_id, author_id)))
    }

    async fn remove(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        Ok(self.follows.lock().unwrap().remove(&(user_id, author_id)))
    }

    async fn list_followed(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let follows = self.follows.lock().unwrap();
        let mut authors: Vec<i32> = follows
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, a)| *a)
            .collect();
        authors.sort_unstable();
        let count = authors.len() as u64;
        let page = page.clamped();
        let results = authors
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(test_user)
            .collect();
        Ok((results, count))
    }
}

// ── MockCallerMarks ──────────────────────────────────────────────────────────

pub struct MockCallerMarks {
    pub marks: CallerMarks,
    pub loads: Arc<Mutex<u32>>,
}

impl MockCallerMarks {
    pub fn new(marks: CallerMarks) -> Self {
        Self {
            marks,
            loads: Arc::new(Mutex::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(CallerMarks::default())
    }
}

impl CallerMarksPort for MockCallerMarks {
    async fn load(
        &self,
        _user_id: i32,
        recipe_ids: &[i32],
        author_ids: &[i32],
    ) -> Result<CallerMarks, ApiError> {
        *self.loads.lock().unwrap() += 1;
        let keep = |set: &HashSet<i32>, ids: &[i32]| {
            set.iter().copied().filter(|id| ids.contains(id)).collect()
        };
        Ok(CallerMarks {
            favourites: keep(&self.marks.favourites, recipe_ids),
            cart: keep(&self.marks.cart, recipe_ids),
            followed: keep(&self.marks.followed, author_ids),
        })
    }
}

// ── MockShoppingList / MockImageStore ────────────────────────────────────────

pub struct MockShoppingList {
    pub lines: Vec<CartLine>,
}

impl ShoppingListPort for MockShoppingList {
    async fn cart_lines(&self, _user_id: i32) -> Result<Vec<CartLine>, ApiError> {
        Ok(self.lines.clone())
    }
}

pub struct MockImageStore {
    pub saved: Arc<Mutex<Vec<DecodedImage>>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self {
            saved: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl ImageStore for MockImageStore {
    async fn save(&self, image: &DecodedImage) -> Result<String, ApiError> {
        let mut saved = self.saved.lock().unwrap();
        saved.push(image.clone());
        Ok(format!("recipes/upload-{}.{}", saved.len(), image.extension))
    }
}

/// Assert that `result` is an `Err` whose `kind()` equals `expected_kind`.
pub fn assert_error<T: std::fmt::Debug>(result: Result<T, ApiError>, expected_kind: &str) {
    match result {
        Err(e) => assert_eq!(e.kind(), expected_kind, "unexpected error: {e:?}"),
        Ok(v) => panic!("expected {expected_kind}, got Ok({v:?})"),
    }
}
