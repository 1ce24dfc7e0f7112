//! Post creation inside a PostgreSQL transaction.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbConn, EntityTrait, TransactionTrait};
use uuid::Uuid;

use inkwell_core::domain::Post;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{StoreTransaction, TransactionManager};

use super::entity::author_post::Entity as AuthorPostEntity;
use super::entity::post;
use super::postgres_base::map_db_err;
use super::postgres_repo::{ignore_duplicate_ref, post_ref};

pub struct PostgresTransactionManager {
    db: DbConn,
}

impl PostgresTransactionManager {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        Ok(Box::new(PostgresStoreTransaction { txn }))
    }
}

/// SeaORM rolls a `DatabaseTransaction` back when it is dropped uncommitted.
struct PostgresStoreTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl StoreTransaction for PostgresStoreTransaction {
    async fn insert_post(&mut self, post: &Post) -> Result<(), RepoError> {
        post::ActiveModel::from(post.clone())
            .insert(&self.txn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn append_post_ref(&mut self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        // A missing author trips the foreign key and maps to NotFound.
        AuthorPostEntity::insert(post_ref(author_id, post_id))
            .on_conflict(ignore_duplicate_ref())
            .exec_without_returning(&self.txn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(map_db_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.rollback().await.map_err(map_db_err)
    }
}
