use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(pk_auto(Warehouses::Id))
                    .col(string(Warehouses::Name))
                    .col(string(Warehouses::Adress))
                    .col(string_len(Warehouses::Telephone, 50))
                    .col(integer(Warehouses::Capacity))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Warehouses {
    Table,
    Id,
    Name,
    // Legacy column spelling kept for compatibility with existing data
    Adress,
    Telephone,
    Capacity,
}
