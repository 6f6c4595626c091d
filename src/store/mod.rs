//! Aggregate persistence.
//!
//! An image set and its images are written, read and deleted as one unit.
//! [`ImageSetStore`] is the seam; two implementations sit behind it:
//!
//! | Store | Backing | Atomicity |
//! |---|---|---|
//! | [`MemoryStore`] | id-keyed maps behind one mutex | rows staged, then inserted under the lock |
//! | [`SqliteStore`] | `image_sets` + `images` tables | one transaction per save, `ON DELETE CASCADE` |
//!
//! Stores own identity and time: ids are assigned monotonically on save and
//! every timestamp comes from the store's injected [`Clock`](crate::clock::Clock).

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{ImageSet, NewImageSet, SetId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned by a panicked writer")]
    Poisoned,
}

/// Transactional persistence of image-set aggregates.
pub trait ImageSetStore: Send + Sync {
    /// Commit a whole aggregate, assigning ids and timestamps.
    ///
    /// Either every image is stored with its set or nothing is.
    fn save(&self, set: NewImageSet) -> Result<ImageSet, StoreError>;

    /// Load an aggregate with its images in stored order.
    fn find_by_id(&self, id: SetId) -> Result<Option<ImageSet>, StoreError>;

    /// Remove a set and all of its images. Returns `false` if no such set.
    fn delete(&self, id: SetId) -> Result<bool, StoreError>;
}
