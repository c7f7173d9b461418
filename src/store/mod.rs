pub mod sqlite;

pub use sqlite::SqliteSeenStore;

use crate::error::Result;
use crate::models::Listing;

/// Durable record of every listing identity ever observed
///
/// Implementations must enforce `id` uniqueness themselves: `insert` on an
/// existing id fails with `TrackerError::DuplicateKey`.
pub trait SeenStore {
    /// True iff a record with this id has ever been inserted
    fn exists(&mut self, id: &str) -> Result<bool>;

    /// Persist a record for a listing, stamped with the current time
    fn insert(&mut self, listing: &Listing) -> Result<()>;

    /// Append the given ids to the notification log
    fn record_notification(&mut self, ids: &[&str]) -> Result<()>;
}

impl<S: SeenStore + ?Sized> SeenStore for &mut S {
    fn exists(&mut self, id: &str) -> Result<bool> {
        (**self).exists(id)
    }

    fn insert(&mut self, listing: &Listing) -> Result<()> {
        (**self).insert(listing)
    }

    fn record_notification(&mut self, ids: &[&str]) -> Result<()> {
        (**self).record_notification(ids)
    }
}
