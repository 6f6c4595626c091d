use super::{ImageSetStore, StoreError};
use crate::clock::{Clock, SystemClock};
use crate::types::{Dimensions, Image, ImageId, ImageSet, NewImageSet, SetId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug)]
struct SetRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct ImageRow {
    set_id: SetId,
    position: usize,
    name: String,
    dimensions: Dimensions,
    thumbnail: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Rows {
    last_set_id: i64,
    last_image_id: i64,
    sets: BTreeMap<SetId, SetRow>,
    images: BTreeMap<ImageId, ImageRow>,
}

/// In-process store: rows keyed by id, one mutex around all of them.
pub struct MemoryStore {
    rows: Mutex<Rows>,
    clock: Box<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            rows: Mutex::new(Rows::default()),
            clock: Box::new(clock),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Rows>, StoreError> {
        self.rows.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSetStore for MemoryStore {
    fn save(&self, set: NewImageSet) -> Result<ImageSet, StoreError> {
        let mut rows = self.lock()?;

        let set_id = SetId(rows.last_set_id + 1);
        let created_at = self.clock.now();
        let mut next_image_id = rows.last_image_id;

        let images: Vec<Image> = set
            .images
            .into_iter()
            .map(|image| {
                next_image_id += 1;
                Image {
                    id: ImageId(next_image_id),
                    set_id,
                    name: image.name,
                    dimensions: image.dimensions,
                    thumbnail: image.thumbnail,
                    created_at: self.clock.now(),
                }
            })
            .collect();

        // Nothing below can fail, so the aggregate lands whole
        rows.last_set_id = set_id.0;
        rows.last_image_id = next_image_id;
        rows.sets.insert(
            set_id,
            SetRow {
                name: set.name.clone(),
                created_at,
            },
        );
        for (position, image) in images.iter().enumerate() {
            rows.images.insert(
                image.id,
                ImageRow {
                    set_id,
                    position,
                    name: image.name.clone(),
                    dimensions: image.dimensions,
                    thumbnail: image.thumbnail.clone(),
                    created_at: image.created_at,
                },
            );
        }

        Ok(ImageSet {
            id: set_id,
            name: set.name,
            created_at,
            images,
        })
    }

    fn find_by_id(&self, id: SetId) -> Result<Option<ImageSet>, StoreError> {
        let rows = self.lock()?;
        let Some(set) = rows.sets.get(&id) else {
            return Ok(None);
        };

        let mut owned: Vec<(&ImageId, &ImageRow)> =
            rows.images.iter().filter(|(_, row)| row.set_id == id).collect();
        owned.sort_by_key(|(_, row)| row.position);

        let images = owned
            .into_iter()
            .map(|(image_id, row)| Image {
                id: *image_id,
                set_id: row.set_id,
                name: row.name.clone(),
                dimensions: row.dimensions,
                thumbnail: row.thumbnail.clone(),
                created_at: row.created_at,
            })
            .collect();

        Ok(Some(ImageSet {
            id,
            name: set.name.clone(),
            created_at: set.created_at,
            images,
        }))
    }

    fn delete(&self, id: SetId) -> Result<bool, StoreError> {
        let mut rows = self.lock()?;
        if rows.sets.remove(&id).is_none() {
            return Ok(false);
        }
        rows.images.retain(|_, row| row.set_id != id);
        Ok(true)
    }
}
