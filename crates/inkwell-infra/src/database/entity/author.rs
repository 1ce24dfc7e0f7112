//! Author entity for SeaORM. The post list lives in `author_posts`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub credential_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::author_post::Entity")]
    AuthorPost,
}

impl Related<super::author_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthorPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain author from its row and its ordered post ids.
    pub fn into_domain(self, posts: Vec<Uuid>) -> inkwell_core::domain::Author {
        inkwell_core::domain::Author {
            id: self.id,
            name: self.name,
            email: self.email,
            credential_hash: self.credential_hash,
            posts,
        }
    }
}

impl From<Model> for inkwell_core::domain::AuthorSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}
