//! sea-orm entities for the Foodgram API database.

pub mod carts;
pub mod favourites;
pub mod follows;
pub mod ingredient_amounts;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod tags;
pub mod users;
