use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IngredientAmounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IngredientAmounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IngredientAmounts::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngredientAmounts::Amount)
                            .double()
                            .not_null()
                            .check(Expr::col(IngredientAmounts::Amount).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IngredientAmounts::Table, IngredientAmounts::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(IngredientAmounts::Table)
                    .col(IngredientAmounts::IngredientId)
                    .col(IngredientAmounts::Amount)
                    .name("uq_ingredient_amounts_ingredient_amount")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IngredientAmounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IngredientAmounts {
    Table,
    Id,
    IngredientId,
    Amount,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
}
