use super::{ImageSetStore, StoreError};
use crate::clock::{Clock, SystemClock};
use crate::types::{Dimensions, Image, ImageId, ImageSet, NewImageSet, SetId};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS image_sets (
        set_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        set_name    TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS images (
        img_id       INTEGER PRIMARY KEY AUTOINCREMENT,
        set_id       INTEGER NOT NULL,
        position     INTEGER NOT NULL,
        img_name     TEXT NOT NULL,
        thumbnail    BLOB,
        timestamp    TEXT NOT NULL,
        width        INTEGER,
        height       INTEGER,
        aspect_ratio REAL,
        FOREIGN KEY(set_id) REFERENCES image_sets(set_id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_images_set_id
        ON images(set_id, position);
";

/// SQLite-backed store. Each `save` and each `find_by_id` is a single
/// transaction.
///
/// `rusqlite::Connection` is not `Sync`, so the connection sits behind a
/// mutex; reads and writes are serialized through it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Box<dyn Clock>,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_clock(path, SystemClock)
    }

    pub fn open_with_clock(path: &Path, clock: impl Clock + 'static) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?, Box::new(clock))
    }

    /// A private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_in_memory_with_clock(SystemClock)
    }

    pub fn open_in_memory_with_clock(clock: impl Clock + 'static) -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, Box::new(clock))
    }

    fn init(conn: Connection, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        // Cascading deletes need this on every connection
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    #[cfg(test)]
    fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl ImageSetStore for SqliteStore {
    fn save(&self, set: NewImageSet) -> Result<ImageSet, StoreError> {
        let mut conn = self.lock()?;
        // Dropping an uncommitted transaction rolls it back
        let tx = conn.transaction()?;

        let created_at = self.clock.now();
        tx.execute(
            "INSERT INTO image_sets (set_name, created_at) VALUES (?1, ?2)",
            params![set.name, created_at],
        )?;
        let set_id = SetId(tx.last_insert_rowid());

        let mut images = Vec::with_capacity(set.images.len());
        for (position, image) in set.images.into_iter().enumerate() {
            let timestamp = self.clock.now();
            tx.execute(
                "INSERT INTO images
                    (set_id, position, img_name, thumbnail, timestamp, width, height, aspect_ratio)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    set_id.0,
                    position as i64,
                    image.name,
                    image.thumbnail,
                    timestamp,
                    image.dimensions.width,
                    image.dimensions.height,
                    image.dimensions.aspect_ratio,
                ],
            )?;
            images.push(Image {
                id: ImageId(tx.last_insert_rowid()),
                set_id,
                name: image.name,
                dimensions: image.dimensions,
                thumbnail: image.thumbnail,
                created_at: timestamp,
            });
        }

        tx.commit()?;

        Ok(ImageSet {
            id: set_id,
            name: set.name,
            created_at,
            images,
        })
    }

    fn find_by_id(&self, id: SetId) -> Result<Option<ImageSet>, StoreError> {
        let mut conn = self.lock()?;
        // Set row and image rows come from one snapshot
        let tx = conn.transaction()?;

        let set: Option<(String, DateTime<Utc>)> = tx
            .query_row(
                "SELECT set_name, created_at FROM image_sets WHERE set_id = ?1",
                params![id.0],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((name, created_at)) = set else {
            return Ok(None);
        };

        let images = {
            let mut stmt = tx.prepare(
                "SELECT img_id, img_name, thumbnail, timestamp, width, height, aspect_ratio
                 FROM images
                 WHERE set_id = ?1
                 ORDER BY position",
            )?;
            stmt.query_map(params![id.0], |row| {
                Ok(Image {
                    id: ImageId(row.get(0)?),
                    set_id: id,
                    name: row.get(1)?,
                    thumbnail: row.get(2)?,
                    created_at: row.get(3)?,
                    dimensions: Dimensions {
                        width: row.get(4)?,
                        height: row.get(5)?,
                        aspect_ratio: row.get(6)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;

        Ok(Some(ImageSet {
            id,
            name,
            created_at,
            images,
        }))
    }

    fn delete(&self, id: SetId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM image_sets WHERE set_id = ?1", params![id.0])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::NewImage;
    use chrono::{Duration, TimeZone};

    fn new_image(name: &str, dimensions: Dimensions) -> NewImage {
        NewImage {
            name: name.to_string(),
            dimensions,
            thumbnail: Some(vec![0xFF, 0xD8, 0xFF, 0xD9]),
        }
    }

    fn full_dims() -> Dimensions {
        Dimensions {
            width: Some(100),
            height: Some(50),
            aspect_ratio: Some(2.0),
        }
    }

    fn store() -> SqliteStore {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        SqliteStore::open_in_memory_with_clock(FixedClock::stepping(start, Duration::seconds(1)))
            .unwrap()
    }

    #[test]
    fn save_then_find_roundtrips_aggregate() {
        let store = store();
        let saved = store
            .save(NewImageSet {
                name: "album".into(),
                images: vec![
                    new_image("first.jpg", full_dims()),
                    new_image("second.jpg", Dimensions::default()),
                ],
            })
            .unwrap();

        let found = store.find_by_id(saved.id).unwrap().unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.images[1].dimensions, Dimensions::default());
    }

    #[test]
    fn set_and_image_timestamps_are_independent() {
        let store = store();
        let saved = store
            .save(NewImageSet {
                name: "album".into(),
                images: vec![new_image("a", full_dims())],
            })
            .unwrap();

        assert_eq!(saved.images[0].created_at - saved.created_at, Duration::seconds(1));
    }

    #[test]
    fn find_unknown_id_is_none() {
        assert!(store().find_by_id(SetId(12345)).unwrap().is_none());
    }

    #[test]
    fn find_leaves_no_open_transaction() {
        let store = store();
        let saved = store
            .save(NewImageSet {
                name: "album".into(),
                images: vec![new_image("a", full_dims())],
            })
            .unwrap();

        assert!(store.find_by_id(saved.id).unwrap().is_some());
        assert!(store.lock().unwrap().is_autocommit());

        assert!(store.find_by_id(SetId(999)).unwrap().is_none());
        assert!(store.lock().unwrap().is_autocommit());
    }

    #[test]
    fn find_sees_committed_set_from_another_connection() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sets.db");
        let reader = SqliteStore::open(&path).unwrap();
        let writer = SqliteStore::open(&path).unwrap();

        let saved = writer
            .save(NewImageSet {
                name: "shared".into(),
                images: vec![new_image("a", full_dims()), new_image("b", full_dims())],
            })
            .unwrap();

        let found = reader.find_by_id(saved.id).unwrap().unwrap();
        assert_eq!(found.images.len(), 2);
        assert!(reader.lock().unwrap().is_autocommit());
    }

    #[test]
    fn failed_image_insert_rolls_back_whole_set() {
        let store = store();
        store
            .execute_batch(
                "CREATE TRIGGER reject_boom BEFORE INSERT ON images
                 WHEN NEW.img_name = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = store.save(NewImageSet {
            name: "doomed".into(),
            images: vec![new_image("fine", full_dims()), new_image("boom", full_dims())],
        });
        assert!(matches!(result, Err(StoreError::Sqlite(_))));

        let conn = store.lock().unwrap();
        let sets: i64 = conn
            .query_row("SELECT COUNT(*) FROM image_sets", [], |row| row.get(0))
            .unwrap();
        let images: i64 = conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!((sets, images), (0, 0));
    }

    #[test]
    fn delete_cascades_to_images() {
        let store = store();
        let saved = store
            .save(NewImageSet {
                name: "album".into(),
                images: vec![new_image("a", full_dims()), new_image("b", full_dims())],
            })
            .unwrap();

        assert!(store.delete(saved.id).unwrap());
        assert!(!store.delete(saved.id).unwrap());

        let conn = store.lock().unwrap();
        let images: i64 = conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(images, 0);
    }

    #[test]
    fn reopening_file_keeps_data() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sets.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store
                .save(NewImageSet {
                    name: "persisted".into(),
                    images: vec![new_image("a", full_dims())],
                })
                .unwrap()
                .id
        };

        let reopened = SqliteStore::open(&path).unwrap();
        let found = reopened.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.name, "persisted");
        assert_eq!(found.images.len(), 1);
    }
}
