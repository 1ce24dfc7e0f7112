//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod credentials;
mod id_generator;
mod repository;
mod transaction;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::{HashingError, PasswordService};
pub use id_generator::{IdGenerator, UuidV7Generator};
pub use repository::{AuthorRepository, BaseRepository, PostRepository};
pub use transaction::{StoreTransaction, TransactionManager};
