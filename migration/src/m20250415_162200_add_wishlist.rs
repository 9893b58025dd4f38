use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum User {
    Table,
    Uuid,
}

#[derive(Iden)]
enum Session {
    Table,
    Uuid,
}

#[derive(Iden)]
enum WishlistEntry {
    Table,
    UserId,
    SessionId,
    SessionName,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WishlistEntry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WishlistEntry::UserId).uuid().not_null())
                    .col(ColumnDef::new(WishlistEntry::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(WishlistEntry::SessionName)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(WishlistEntry::UserId)
                            .col(WishlistEntry::SessionId),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-wishlist_user")
                            .from_tbl(WishlistEntry::Table)
                            .from_col(WishlistEntry::UserId)
                            .to_tbl(User::Table)
                            .to_col(User::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-wishlist_session")
                            .from_tbl(WishlistEntry::Table)
                            .from_col(WishlistEntry::SessionId)
                            .to_tbl(Session::Table)
                            .to_col(Session::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WishlistEntry::Table).to_owned())
            .await
    }
}
