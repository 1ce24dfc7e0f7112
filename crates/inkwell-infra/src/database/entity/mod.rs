//! SeaORM entities for the `authors`, `posts` and `author_posts` tables.

pub mod author;
pub mod author_post;
pub mod post;
