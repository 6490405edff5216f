//! Image module: classification and metadata extraction
//!
//! - `ResourceClassifier` decides whether a locator is an image, memoized in
//!   the crawl's visited set
//! - `inspector` reads dimensions, format and size from raw bytes or inline
//!   data without a full pixel decode

mod classifier;
pub mod inspector;

pub use classifier::ResourceClassifier;
pub use inspector::{inspect_bytes, inspect_inline, ImageMetadata, InspectError};
