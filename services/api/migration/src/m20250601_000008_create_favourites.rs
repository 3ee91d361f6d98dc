use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favourites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favourites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favourites::UserId).integer().not_null())
                    .col(ColumnDef::new(Favourites::RecipeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Favourites::Table, Favourites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Favourites::Table, Favourites::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Favourites::Table)
                    .col(Favourites::UserId)
                    .col(Favourites::RecipeId)
                    .name("uq_favourites_user_recipe")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favourites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Favourites {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
