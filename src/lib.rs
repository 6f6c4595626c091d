//! # Image Ingest
//!
//! Ingests named sets of images. Each call takes a set name, per-image
//! metadata and the raw image bytes, and commits one aggregate: every image
//! decoded, its dimensions resolved, a small JPEG thumbnail generated, and the
//! whole set stored atomically. Committed sets can be read back in full or as
//! metadata only, and deleted as a unit.
//!
//! # Architecture: Validate, Process, Commit
//!
//! ```text
//! 1. Validate  request + files  →  ok / ValidationError   (no decoding yet)
//! 2. Process   per image        →  NewImage               (decode, dimensions, thumbnail)
//! 3. Commit    NewImageSet      →  ImageSet               (one atomic store call)
//! ```
//!
//! Nothing is persisted unless every image of the batch made it through
//! stage 2. Stage 2 runs across images in parallel; results keep input order.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Batch validation, per-image pipeline, and the [`ingest::ImageService`] operations |
//! | [`imaging`] | Decode, thumbnail sizing and JPEG encoding behind the [`imaging::ImageBackend`] trait |
//! | [`dimensions`] | Caller-supplied dimensions, filled in from the decoded image |
//! | [`store`] | Atomic aggregate persistence: in-memory and SQLite |
//! | [`view`] | Full and metadata-only projections with their JSON wire names |
//! | [`fault`] | Maps errors onto the 400/404/500 fault surface |
//! | [`types`] | The aggregate, its ids, and the request shapes |
//! | [`clock`] | Injected time source for server-assigned timestamps |
//! | [`config`] | `image-ingest.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typestate Instead of Placeholder Ids
//!
//! An image under construction is a [`types::NewImage`]; only a store can turn
//! it into a [`types::Image`] with an id and timestamp. There is no "unsaved"
//! id value to forget about, and nothing outside a store can fabricate one.
//!
//! ## Decode Once
//!
//! The decoded raster feeds both dimension resolution and thumbnail
//! generation, so each payload is parsed exactly once.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling, JPEG
//! encoding). SQLite is bundled. The binary has no system dependencies.

pub mod clock;
pub mod config;
pub mod dimensions;
pub mod fault;
pub mod imaging;
pub mod ingest;
pub mod output;
pub mod store;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
