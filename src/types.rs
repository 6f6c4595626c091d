//! The image-set aggregate and the request shapes that produce it.
//!
//! Two lifecycles share these types. Before commit an aggregate is a
//! [`NewImageSet`] of [`NewImage`]s: names, dimensions and thumbnails only.
//! The store turns it into an [`ImageSet`] of [`Image`]s, assigning ids and
//! timestamps; nothing else ever creates those. Each [`Image`] carries the
//! id of the set that owns it rather than a pointer back to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a committed image set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub i64);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of a committed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub i64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Width, height and aspect ratio, each independently optional.
///
/// Always stored inline on its image; never a row of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

impl Dimensions {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.aspect_ratio.is_none()
    }
}

/// Caller-supplied metadata for one image of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub img_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// The metadata half of an ingestion call. File payloads travel separately,
/// paired with `images` by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageSetRequest {
    pub image_set_name: String,
    #[serde(default)]
    pub images: Vec<ImageRequest>,
}

/// An image built during ingestion, not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub name: String,
    pub dimensions: Dimensions,
    pub thumbnail: Option<Vec<u8>>,
}

/// An aggregate ready to be committed in one store call.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImageSet {
    pub name: String,
    pub images: Vec<NewImage>,
}

/// A committed image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: ImageId,
    /// Owning set; a relational link only.
    pub set_id: SetId,
    pub name: String,
    pub dimensions: Dimensions,
    pub thumbnail: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

/// A committed image set with its images in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    pub id: SetId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<Image>,
}
