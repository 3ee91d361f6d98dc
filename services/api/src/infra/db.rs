use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, SqlErr,
    TransactionTrait,
    sea_query::{Expr, Func, OnConflict, Query},
};
use tracing::warn;

use foodgram_api_schema::{
    carts, favourites, follows, ingredient_amounts, ingredients, recipe_ingredients, recipe_tags,
    recipes, tags, users,
};
use foodgram_core::sea_ext::Paginate;
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;

use crate::domain::filter::RecipeFilter;
use crate::domain::repository::{
    CallerMarksPort, FollowRepository, IngredientRepository, RecipeMarkRepository,
    RecipeRepository, ShoppingListPort, TagRepository, UserRepository,
};
use crate::domain::types::{
    CallerMarks, CartLine, Ingredient, IngredientAmountInput, NewRecipe, NewUser, Recipe,
    RecipeChanges, RecipeIngredient, RecipeSummary, Tag, User, UserCredentials,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_credentials_by_id(
        &self,
        id: i32,
    ) -> Result<Option<UserCredentials>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user credentials by id")?;
        Ok(model.map(credentials_from_model))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user credentials by email")?;
        Ok(model.map(credentials_from_model))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count users by email")?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let query = users::Entity::find().order_by_asc(users::Column::Id);
        let count = query.clone().count(&self.db).await.context("count users")?;
        let models = query
            .for_page(page)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok((models.into_iter().map(user_from_model).collect(), count))
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let result = users::ActiveModel {
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(UserRole::Regular.as_u8())),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(user_from_model(model)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    warn!(%detail, "concurrent registration hit unique constraint");
                    if detail.contains("email") {
                        Err(ApiError::EmailTaken)
                    } else {
                        Err(ApiError::UsernameTaken)
                    }
                }
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Unchanged(id),
            password_hash: Set(password_hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update password hash")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        role: u8::try_from(model.role)
            .ok()
            .and_then(UserRole::from_u8)
            .unwrap_or_default(),
        date_joined: model.date_joined,
    }
}

fn credentials_from_model(model: users::Model) -> UserCredentials {
    let password_hash = model.password_hash.clone();
    UserCredentials {
        user: user_from_model(model),
        password_hash,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing tag ids")?;
        Ok(found.into_iter().collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find()
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id);
        if let Some(name) = name {
            let pattern = format!("%{}%", escape_like(&name.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ingredients::Entity,
                    ingredients::Column::Name,
                ))))
                .like(pattern),
            );
        }
        let models = query.all(&self.db).await.context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing ingredient ids")?;
        Ok(found.into_iter().collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

/// Escape LIKE wildcards; Postgres uses `\` as the default escape character.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

/// One recipe ↔ ingredient-amount link joined with its ingredient.
#[derive(Debug, FromQueryResult)]
struct IngredientLineRow {
    recipe_id: i32,
    ingredient_id: i32,
    name: String,
    measurement_unit: String,
    amount: f64,
}

fn ingredient_lines() -> Select<recipe_ingredients::Entity> {
    recipe_ingredients::Entity::find()
        .select_only()
        .column(recipe_ingredients::Column::RecipeId)
        .column_as(ingredients::Column::Id, "ingredient_id")
        .column(ingredients::Column::Name)
        .column(ingredients::Column::MeasurementUnit)
        .column(ingredient_amounts::Column::Amount)
        .join(
            JoinType::InnerJoin,
            recipe_ingredients::Relation::IngredientAmount.def(),
        )
        .join(
            JoinType::InnerJoin,
            ingredient_amounts::Relation::Ingredient.def(),
        )
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError> {
        let mut query = recipes::Entity::find();
        if !filter.tag_slugs.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tag_slugs.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if let Some(user_id) = filter.favourited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favourites::Column::RecipeId)
                        .from(favourites::Entity)
                        .and_where(favourites::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(carts::Column::RecipeId)
                        .from(carts::Entity)
                        .and_where(carts::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            );
        }
        let query = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id);

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .for_page(page)
            .all(&self.db)
            .await
            .context("list recipes")?;
        let recipes = load_recipes(&self.db, models).await?;
        Ok((recipes, count))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        Ok(load_recipes(&self.db, vec![model]).await?.pop())
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe summary")?;
        Ok(model.map(summary_from_model))
    }

    async fn find_author_id(&self, id: i32) -> Result<Option<i32>, ApiError> {
        let author_id = recipes::Entity::find_by_id(id)
            .select_only()
            .column(recipes::Column::AuthorId)
            .into_tuple::<i32>()
            .one(&self.db)
            .await
            .context("find recipe author")?;
        Ok(author_id)
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<i32, ApiError> {
        let recipe_id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let recipe = recipe.clone();
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        author_id: Set(recipe.author_id),
                        name: Set(recipe.name),
                        text: Set(recipe.text),
                        image: Set(recipe.image),
                        cooking_time: Set(recipe.cooking_time),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    replace_tags(txn, model.id, &recipe.tag_ids).await?;
                    replace_ingredients(txn, model.id, &recipe.ingredients).await?;
                    Ok(model.id)
                })
            })
            .await
            .context("create recipe")?;
        Ok(recipe_id)
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let mut am = recipes::ActiveModel {
                        id: Unchanged(id),
                        ..Default::default()
                    };
                    if let Some(name) = changes.name {
                        am.name = Set(name);
                    }
                    if let Some(text) = changes.text {
                        am.text = Set(text);
                    }
                    if let Some(image) = changes.image {
                        am.image = Set(image);
                    }
                    if let Some(cooking_time) = changes.cooking_time {
                        am.cooking_time = Set(cooking_time);
                    }
                    if am.is_changed() {
                        am.update(txn).await?;
                    }
                    if let Some(tag_ids) = &changes.tag_ids {
                        replace_tags(txn, id, tag_ids).await?;
                    }
                    if let Some(items) = &changes.ingredients {
                        replace_ingredients(txn, id, items).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("update recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_summaries_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(summary_from_model).collect())
    }

    async fn count_by_author(&self, author_id: i32) -> Result<u64, ApiError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

fn summary_from_model(model: recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

/// Attach authors, tags and ingredients to recipe rows, keeping row order.
async fn load_recipes<C: ConnectionTrait>(
    db: &C,
    models: Vec<recipes::Model>,
) -> anyhow::Result<Vec<Recipe>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let author_ids: HashSet<i32> = models.iter().map(|m| m.author_id).collect();

    let authors: HashMap<i32, User> = users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .context("load recipe authors")?
        .into_iter()
        .map(|m| (m.id, user_from_model(m)))
        .collect();

    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    let tag_rows = recipe_tags::Entity::find()
        .find_also_related(tags::Entity)
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(tags::Column::Id)
        .all(db)
        .await
        .context("load recipe tags")?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag_from_model(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    let ingredient_rows = ingredient_lines()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(ingredients::Column::Name)
        .into_model::<IngredientLineRow>()
        .all(db)
        .await
        .context("load recipe ingredients")?;
    for row in ingredient_rows {
        ingredients_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeIngredient {
                id: row.ingredient_id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            });
    }

    let mut recipes = Vec::with_capacity(models.len());
    for model in models {
        let author = authors.get(&model.author_id).cloned().with_context(|| {
            format!("author {} of recipe {} is missing", model.author_id, model.id)
        })?;
        recipes.push(Recipe {
            id: model.id,
            tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
            author,
            name: model.name,
            text: model.text,
            image: model.image,
            cooking_time: model.cooking_time,
            pub_date: model.pub_date,
        });
    }
    Ok(recipes)
}

async fn replace_tags<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    recipe_tags::Entity::insert_many(tag_ids.iter().map(|tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    }))
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

async fn replace_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    items: &[IngredientAmountInput],
) -> Result<(), DbErr> {
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    let mut links = Vec::with_capacity(items.len());
    for item in items {
        let amount_id = resolve_ingredient_amount(conn, item).await?;
        links.push(recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_amount_id: Set(amount_id),
        });
    }
    recipe_ingredients::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Id of the shared (ingredient, amount) pairing, inserting it when absent.
async fn resolve_ingredient_amount<C: ConnectionTrait>(
    conn: &C,
    item: &IngredientAmountInput,
) -> Result<i32, DbErr> {
    ingredient_amounts::Entity::insert(ingredient_amounts::ActiveModel {
        ingredient_id: Set(item.ingredient_id),
        amount: Set(item.amount),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            ingredient_amounts::Column::IngredientId,
            ingredient_amounts::Column::Amount,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    ingredient_amounts::Entity::find()
        .filter(ingredient_amounts::Column::IngredientId.eq(item.ingredient_id))
        .filter(ingredient_amounts::Column::Amount.eq(item.amount))
        .one(conn)
        .await?
        .map(|model| model.id)
        .ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "ingredient amount ({}, {})",
                item.ingredient_id, item.amount
            ))
        })
}

// ── Favourite repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavouriteRepository {
    pub db: DatabaseConnection,
}

impl RecipeMarkRepository for DbFavouriteRepository {
    async fn exists(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let count = favourites::Entity::find()
            .filter(favourites::Column::UserId.eq(user_id))
            .filter(favourites::Column::RecipeId.eq(recipe_id))
            .count(&self.db)
            .await
            .context("check favourite")?;
        Ok(count > 0)
    }

    async fn insert(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let result = favourites::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("insert favourite").into()),
        }
    }

    async fn remove(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let result = favourites::Entity::delete_many()
            .filter(favourites::Column::UserId.eq(user_id))
            .filter(favourites::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete favourite")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl RecipeMarkRepository for DbCartRepository {
    async fn exists(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let count = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .filter(carts::Column::RecipeId.eq(recipe_id))
            .count(&self.db)
            .await
            .context("check cart item")?;
        Ok(count > 0)
    }

    async fn insert(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let result = carts::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("insert cart item").into()),
        }
    }

    async fn remove(&self, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let result = carts::Entity::delete_many()
            .filter(carts::Column::UserId.eq(user_id))
            .filter(carts::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete cart item")?;
        Ok(result.rows_affected > 0)
    }
}

impl ShoppingListPort for DbCartRepository {
    async fn cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>, ApiError> {
        let rows = ingredient_lines()
            .filter(
                recipe_ingredients::Column::RecipeId.in_subquery(
                    Query::select()
                        .column(carts::Column::RecipeId)
                        .from(carts::Entity)
                        .and_where(carts::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .into_model::<IngredientLineRow>()
            .all(&self.db)
            .await
            .context("load cart ingredient lines")?;
        Ok(rows
            .into_iter()
            .map(|row| CartLine {
                ingredient_id: row.ingredient_id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn exists(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let count = follows::Entity::find()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("check follow")?;
        Ok(count > 0)
    }

    async fn insert(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let result = follows::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("insert follow").into()),
        }
    }

    async fn remove(&self, user_id: i32, author_id: i32) -> Result<bool, ApiError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserId.eq(user_id))
            .filter(follows::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_followed(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let query = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(follows::Column::AuthorId)
                        .from(follows::Entity)
                        .and_where(follows::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Id);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count followed authors")?;
        let models = query
            .for_page(page)
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok((models.into_iter().map(user_from_model).collect(), count))
    }
}

// ── Caller marks ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCallerMarks {
    pub db: DatabaseConnection,
}

impl CallerMarksPort for DbCallerMarks {
    async fn load(
        &self,
        user_id: i32,
        recipe_ids: &[i32],
        author_ids: &[i32],
    ) -> Result<CallerMarks, ApiError> {
        let mut marks = CallerMarks::default();
        if !recipe_ids.is_empty() {
            marks.favourites = favourites::Entity::find()
                .select_only()
                .column(favourites::Column::RecipeId)
                .filter(favourites::Column::UserId.eq(user_id))
                .filter(favourites::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("load favourite marks")?
                .into_iter()
                .collect();
            marks.cart = carts::Entity::find()
                .select_only()
                .column(carts::Column::RecipeId)
                .filter(carts::Column::UserId.eq(user_id))
                .filter(carts::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("load cart marks")?
                .into_iter()
                .collect();
        }
        if !author_ids.is_empty() {
            marks.followed = follows::Entity::find()
                .select_only()
                .column(follows::Column::AuthorId)
                .filter(follows::Column::UserId.eq(user_id))
                .filter(follows::Column::AuthorId.is_in(author_ids.iter().copied()))
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("load follow marks")?
                .into_iter()
                .collect();
        }
        Ok(marks)
    }
}
