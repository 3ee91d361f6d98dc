use sea_orm::entity::prelude::*;

/// Recipe ↔ ingredient-amount link.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipe_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient_amount_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id"
    )]
    Recipe,
    #[sea_orm(
        belongs_to = "super::ingredient_amounts::Entity",
        from = "Column::IngredientAmountId",
        to = "super::ingredient_amounts::Column::Id"
    )]
    IngredientAmount,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl Related<super::ingredient_amounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientAmount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
