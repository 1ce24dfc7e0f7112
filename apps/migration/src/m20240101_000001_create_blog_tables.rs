use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Authors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Authors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Authors::Name).string().not_null())
                    .col(ColumnDef::new(Authors::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Authors::CredentialHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Timestamps are nullable: rows written before they existed are
        // repaired by the backfill binary.
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Body).text().not_null())
                    .col(ColumnDef::new(Posts::ImageRef).string().not_null())
                    .col(ColumnDef::new(Posts::CreatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Posts::UpdatedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-posts-author_id")
                    .table(Posts::Table)
                    .col(Posts::AuthorId)
                    .to_owned(),
            )
            .await?;

        // No foreign key on post_id: a delete removes the post first and the
        // list entry after, as two separate statements.
        manager
            .create_table(
                Table::create()
                    .table(AuthorPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthorPosts::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthorPosts::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(AuthorPosts::PostId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-author_posts-author_id")
                            .from(AuthorPosts::Table, AuthorPosts::AuthorId)
                            .to(Authors::Table, Authors::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-author_posts-author_id-post_id")
                    .table(AuthorPosts::Table)
                    .col(AuthorPosts::AuthorId)
                    .col(AuthorPosts::PostId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthorPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Authors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Authors {
    Table,
    Id,
    Name,
    Email,
    CredentialHash,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    AuthorId,
    Title,
    Body,
    ImageRef,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuthorPosts {
    Table,
    Seq,
    AuthorId,
    PostId,
}
