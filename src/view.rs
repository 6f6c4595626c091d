//! Read-side projections of a committed image set.
//!
//! Two shapes, both infallible and pure:
//!
//! - [`ImageSetView`]: everything, including thumbnail bytes (base64 in JSON).
//! - [`ImageSetMetadataView`]: the same minus thumbnails, for cheap reads.
//!
//! JSON field names follow the public wire format:
//!
//! ```text
//! { imageSetId, imageSetName, createdAt,
//!   images: [ { imgId, imgName, thumbnail, timestamp, dimensions? } ] }
//! ```
//!
//! `dimensions` is left out of an image entirely when width, height and
//! aspect ratio are all absent.

use crate::types::{Dimensions, Image, ImageId, ImageSet, SetId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub img_id: ImageId,
    pub img_name: String,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Vec<u8>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadataView {
    pub img_id: ImageId,
    pub img_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSetView {
    pub image_set_id: SetId,
    pub image_set_name: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSetMetadataView {
    pub image_set_id: SetId,
    pub image_set_name: String,
    pub created_at: DateTime<Utc>,
    pub images: Vec<ImageMetadataView>,
}

impl ImageSetView {
    /// Drop every thumbnail, keeping all other fields as they are.
    pub fn without_thumbnails(&self) -> ImageSetMetadataView {
        ImageSetMetadataView {
            image_set_id: self.image_set_id,
            image_set_name: self.image_set_name.clone(),
            created_at: self.created_at,
            images: self
                .images
                .iter()
                .map(|image| ImageMetadataView {
                    img_id: image.img_id,
                    img_name: image.img_name.clone(),
                    timestamp: image.timestamp,
                    dimensions: image.dimensions,
                })
                .collect(),
        }
    }
}

fn present_dimensions(dimensions: &Dimensions) -> Option<Dimensions> {
    (!dimensions.is_empty()).then_some(*dimensions)
}

fn image_view(image: &Image) -> ImageView {
    ImageView {
        img_id: image.id,
        img_name: image.name.clone(),
        thumbnail: image.thumbnail.clone(),
        timestamp: image.created_at,
        dimensions: present_dimensions(&image.dimensions),
    }
}

fn image_metadata_view(image: &Image) -> ImageMetadataView {
    ImageMetadataView {
        img_id: image.id,
        img_name: image.name.clone(),
        timestamp: image.created_at,
        dimensions: present_dimensions(&image.dimensions),
    }
}

/// Project a committed set into its full view.
pub fn full_view(set: &ImageSet) -> ImageSetView {
    ImageSetView {
        image_set_id: set.id,
        image_set_name: set.name.clone(),
        created_at: set.created_at,
        images: set.images.iter().map(image_view).collect(),
    }
}

/// Project a committed set into its metadata-only view.
pub fn metadata_view(set: &ImageSet) -> ImageSetMetadataView {
    ImageSetMetadataView {
        image_set_id: set.id,
        image_set_name: set.name.clone(),
        created_at: set.created_at,
        images: set.images.iter().map(image_metadata_view).collect(),
    }
}

/// Thumbnails travel as standard base64 strings.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
