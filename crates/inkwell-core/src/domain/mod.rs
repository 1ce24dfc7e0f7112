//! Domain entities - the core business objects.

mod author;
mod post;

pub use author::{Author, AuthorSummary, Registration};
pub use post::{AuthorPosts, Post, PostContent, PostWithAuthor};
