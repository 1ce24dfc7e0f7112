//! IdGenerator port - time-ordered identifiers that carry their creation instant.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use uuid::{ContextV7, Timestamp, Uuid};

use super::Clock;

/// Produces unique ids and recovers the instant each one was minted at.
///
/// Callers that need a creation time from an id go through
/// [`extract_time`](Self::extract_time) and never decode the bits themselves.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;

    /// The instant embedded in `id`, or `None` if the id carries no time.
    fn extract_time(&self, id: Uuid) -> Option<DateTime<Utc>>;
}

/// UUIDv7 ids stamped from a [`Clock`].
///
/// v7 stores unix milliseconds in the high 48 bits, so the recovered instant
/// is truncated to the millisecond. Ids minted within the same millisecond
/// take the next value of a shared counter, so every id sorts after the one
/// minted before it.
pub struct UuidV7Generator<C> {
    clock: C,
    context: Mutex<ContextV7>,
}

impl<C: Clock> UuidV7Generator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            context: Mutex::new(ContextV7::new()),
        }
    }
}

impl<C: Clock> IdGenerator for UuidV7Generator<C> {
    fn generate(&self) -> Uuid {
        let now = self.clock.now();
        let secs = u64::try_from(now.timestamp()).unwrap_or(0);
        let context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        Uuid::new_v7(Timestamp::from_unix(
            &*context,
            secs,
            now.timestamp_subsec_nanos(),
        ))
    }

    fn extract_time(&self, id: Uuid) -> Option<DateTime<Utc>> {
        let (secs, nanos) = id.get_timestamp()?.to_unix();
        DateTime::<Utc>::from_timestamp(i64::try_from(secs).ok()?, nanos)
    }
}
