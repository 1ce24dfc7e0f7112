//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::domain::{Author, AuthorSummary, Post, PostContent};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{AuthorRepository, BaseRepository, PostRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::author_post::{self, Entity as AuthorPostEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        // UUIDv7 ids sort by creation time.
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut found: HashMap<Uuid, post::Model> = PostEntity::find()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| found.remove(id))
            .map(Into::into)
            .collect())
    }

    async fn find_missing_created_at(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::CreatedAt.is_null())
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: PostContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = updated_at.into();
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(content.title))
            .col_expr(post::Column::Body, Expr::value(content.body))
            .col_expr(post::Column::ImageRef, Expr::value(content.image_ref))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().next().map(Into::into))
    }

    async fn set_timestamps_if_absent(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let created_at: sea_orm::prelude::DateTimeWithTimeZone = created_at.into();
        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = updated_at.into();
        let result = PostEntity::update_many()
            .col_expr(post::Column::CreatedAt, Expr::value(created_at))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::CreatedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// PostgreSQL author repository.
///
/// An author row plus its ordered `author_posts` entries make up one
/// [`Author`]. List entries are inserted and deleted one row at a time.
pub struct PostgresAuthorRepository {
    db: DbConn,
}

impl PostgresAuthorRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn post_ids(&self, author_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        AuthorPostEntity::find()
            .select_only()
            .column(author_post::Column::PostId)
            .filter(author_post::Column::AuthorId.eq(author_id))
            .order_by_asc(author_post::Column::Seq)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn exists(&self, author_id: Uuid) -> Result<bool, RepoError> {
        let found = AuthorEntity::find_by_id(author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(found.is_some())
    }
}

pub(crate) fn post_ref(author_id: Uuid, post_id: Uuid) -> author_post::ActiveModel {
    author_post::ActiveModel {
        author_id: Set(author_id),
        post_id: Set(post_id),
        ..Default::default()
    }
}

pub(crate) fn ignore_duplicate_ref() -> OnConflict {
    OnConflict::columns([author_post::Column::AuthorId, author_post::Column::PostId])
        .do_nothing()
        .to_owned()
}

#[async_trait]
impl BaseRepository<Author, Uuid> for PostgresAuthorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        let Some(model) = AuthorEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let posts = self.post_ids(id).await?;
        Ok(Some(model.into_domain(posts)))
    }

    /// Upserts the author row and replaces its post list.
    async fn save(&self, entity: Author) -> Result<Author, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let row = author::ActiveModel {
            id: Set(entity.id),
            name: Set(entity.name.clone()),
            email: Set(entity.email.clone()),
            credential_hash: Set(entity.credential_hash.clone()),
        };
        AuthorEntity::insert(row)
            .on_conflict(
                OnConflict::column(author::Column::Id)
                    .update_columns([
                        author::Column::Name,
                        author::Column::Email,
                        author::Column::CredentialHash,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;

        AuthorPostEntity::delete_many()
            .filter(author_post::Column::AuthorId.eq(entity.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        for post_id in &entity.posts {
            AuthorPostEntity::insert(post_ref(entity.id, *post_id))
                .on_conflict(ignore_duplicate_ref())
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // author_posts rows cascade.
        let result = AuthorEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn find_all_summaries(&self) -> Result<Vec<AuthorSummary>, RepoError> {
        let result = AuthorEntity::find()
            .order_by_asc(author::Column::Name)
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = AuthorEntity::find()
            .filter(author::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn add_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        tracing::debug!(author_id = %author_id, post_id = %post_id, "Appending post reference");

        AuthorPostEntity::insert(post_ref(author_id, post_id))
            .on_conflict(ignore_duplicate_ref())
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn remove_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        tracing::debug!(author_id = %author_id, post_id = %post_id, "Removing post reference");

        let result = AuthorPostEntity::delete_many()
            .filter(author_post::Column::AuthorId.eq(author_id))
            .filter(author_post::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        // Nothing removed: tell a missing author apart from a missing entry.
        if self.exists(author_id).await? {
            Ok(false)
        } else {
            Err(RepoError::NotFound)
        }
    }
}
