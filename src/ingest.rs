//! Ingestion orchestration: validate a batch, process every payload, commit
//! the aggregate.
//!
//! ## Pipeline
//!
//! ```text
//! request + files
//!   └─ validate_batch       structural checks, first failure wins
//!   └─ per image (rayon)    decode → resolve dimensions → render thumbnail
//!   └─ store.save           one atomic commit of the whole set
//! ```
//!
//! Images are processed in parallel but results are gathered in input order,
//! and the first failing index is the one reported. Once an image fails, the
//! images after it are skipped. Nothing reaches the store unless every image
//! processed cleanly.

use crate::config::IngestConfig;
use crate::dimensions::resolve_dimensions;
use crate::imaging::{ImageBackend, RustBackend, ThumbnailConfig, render_thumbnail};
use crate::store::{ImageSetStore, StoreError};
use crate::types::{
    CreateImageSetRequest, Dimensions, ImageRequest, ImageSet, NewImage, NewImageSet, SetId,
};
use crate::view::{ImageSetMetadataView, ImageSetView, full_view, metadata_view};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    /// Caller input is invalid. The message is safe to show verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("ImageSet not found: {0}")]
    NotFound(SetId),
    #[error("store failure: {0}")]
    Unexpected(#[from] StoreError),
}

/// Structural checks on a batch, in order; the first violation wins.
///
/// Runs before any payload is decoded.
pub fn validate_batch(
    request: &CreateImageSetRequest,
    files: &[Vec<u8>],
) -> Result<(), IngestError> {
    if files.is_empty() {
        return Err(invalid("At least one image file must be provided"));
    }
    if request.images.is_empty() {
        return Err(invalid("At least one image entry must be provided"));
    }
    if files.len() != request.images.len() {
        return Err(invalid("Number of files must match number of image metadata entries"));
    }
    if let Some(index) = files.iter().position(|file| file.is_empty()) {
        return Err(invalid(format!("File at index {index} is empty")));
    }
    if request.image_set_name.trim().is_empty() {
        return Err(invalid("Image set name must not be empty"));
    }
    for (index, image) in request.images.iter().enumerate() {
        if image.img_name.trim().is_empty() {
            return Err(invalid(format!("Image name at index {index} must not be empty")));
        }
        if !image.dimensions.is_none_or(|d| dimensions_are_positive(&d)) {
            return Err(invalid(format!("Dimensions of image at index {index} must be positive")));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> IngestError {
    IngestError::Validation(message.into())
}

fn dimensions_are_positive(dimensions: &Dimensions) -> bool {
    dimensions.width.is_none_or(|w| w > 0)
        && dimensions.height.is_none_or(|h| h > 0)
        && dimensions
            .aspect_ratio
            .is_none_or(|ratio| ratio.is_finite() && ratio > 0.0)
}

/// Decode one payload, resolve its dimensions and render its thumbnail.
fn process_image(
    backend: &impl ImageBackend,
    thumbnails: &ThumbnailConfig,
    index: usize,
    request: &ImageRequest,
    bytes: &[u8],
) -> Result<NewImage, IngestError> {
    let decoded = backend
        .decode(bytes)
        .map_err(|e| invalid(format!("Failed to parse image at index {index}: {e}")))?;

    let supplied = request.dimensions.unwrap_or_default();
    let dimensions = resolve_dimensions(&supplied, decoded.size());

    let thumbnail = render_thumbnail(backend, &decoded, thumbnails).map_err(|e| {
        invalid(format!(
            "Failed to generate thumbnail for image at index {index}: {e}"
        ))
    })?;

    debug!(
        index,
        width = decoded.size().width,
        height = decoded.size().height,
        thumbnail_bytes = thumbnail.len(),
        "processed image"
    );

    Ok(NewImage {
        name: request.img_name.clone(),
        dimensions,
        thumbnail: Some(thumbnail),
    })
}

/// Validate and process a batch into an uncommitted aggregate.
///
/// Pure with respect to persistence: on success the caller decides where
/// the set goes; on failure nothing has been written anywhere.
pub fn build_image_set(
    backend: &impl ImageBackend,
    thumbnails: &ThumbnailConfig,
    request: &CreateImageSetRequest,
    files: &[Vec<u8>],
) -> Result<NewImageSet, IngestError> {
    validate_batch(request, files)?;

    // Images past the lowest known failure are skipped (`None`). The lowest
    // failing index itself is never skipped, so it is the first `Err` in order.
    let first_failure = AtomicUsize::new(usize::MAX);
    let outcomes: Vec<Option<Result<NewImage, IngestError>>> = request
        .images
        .par_iter()
        .zip(files.par_iter())
        .enumerate()
        .map(|(index, (image, bytes))| {
            if index > first_failure.load(Ordering::Relaxed) {
                return None;
            }
            let outcome = process_image(backend, thumbnails, index, image, bytes);
            if outcome.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            Some(outcome)
        })
        .collect();
    let images = outcomes
        .into_iter()
        .flatten()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewImageSet {
        name: request.image_set_name.clone(),
        images,
    })
}

/// The ingestion service: a store, a backend, and thumbnail settings.
pub struct ImageService<S, B = RustBackend> {
    store: S,
    backend: B,
    thumbnails: ThumbnailConfig,
}

impl<S: ImageSetStore> ImageService<S, RustBackend> {
    /// Service using the built-in image backend.
    pub fn new(store: S, config: &IngestConfig) -> Self {
        Self::with_backend(store, RustBackend::new(), config.thumbnail_config())
    }
}

impl<S: ImageSetStore, B: ImageBackend> ImageService<S, B> {
    pub fn with_backend(store: S, backend: B, thumbnails: ThumbnailConfig) -> Self {
        Self {
            store,
            backend,
            thumbnails,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest a batch and commit it as one aggregate.
    pub fn create_image_set(
        &self,
        request: &CreateImageSetRequest,
        files: &[Vec<u8>],
    ) -> Result<ImageSet, IngestError> {
        let new_set = build_image_set(&self.backend, &self.thumbnails, request, files)
            .inspect_err(|err| {
                warn!(set_name = %request.image_set_name, error = %err, "rejected image set")
            })?;

        let set = self.store.save(new_set)?;
        info!(set_id = %set.id, images = set.images.len(), "committed image set");
        Ok(set)
    }

    /// Full view of a committed set, thumbnails included.
    pub fn get_image_set(&self, id: SetId) -> Result<ImageSetView, IngestError> {
        Ok(full_view(&self.find(id)?))
    }

    /// Metadata view of a committed set, without thumbnails.
    pub fn get_image_set_metadata(&self, id: SetId) -> Result<ImageSetMetadataView, IngestError> {
        Ok(metadata_view(&self.find(id)?))
    }

    /// Remove a set together with all of its images.
    pub fn delete_image_set(&self, id: SetId) -> Result<(), IngestError> {
        if !self.store.delete(id)? {
            return Err(IngestError::NotFound(id));
        }
        info!(set_id = %id, "deleted image set");
        Ok(())
    }

    fn find(&self, id: SetId) -> Result<ImageSet, IngestError> {
        self.store.find_by_id(id)?.ok_or(IngestError::NotFound(id))
    }
}
