//! Header-only image inspection
//!
//! Raster formats are identified and measured from their header bytes with
//! `imagesize`; no pixel data is decoded. SVG documents have no intrinsic
//! pixel grid and are reported with unknown dimensions.

use crate::url::InlineData;
use crate::UrlError;
use imagesize::ImageType;
use thiserror::Error;

/// How many leading bytes are examined when sniffing for SVG markup
const SVG_SNIFF_LEN: usize = 1024;

/// Metadata extracted from one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Pixel width, unknown for vector formats
    pub width: Option<u32>,

    /// Pixel height, unknown for vector formats
    pub height: Option<u32>,

    /// Lowercase encoded format name (`png`, `jpeg`, `svg`, ...)
    pub format: String,

    /// Size of the encoded image in bytes
    pub byte_size: u64,
}

/// Reasons an image could not be inspected
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("empty image payload")]
    Empty,

    #[error("unrecognized image format")]
    Unsupported,

    #[error("corrupted image header: {0}")]
    Corrupted(String),

    #[error("invalid inline payload: {0}")]
    Payload(#[from] UrlError),
}

/// Inspects raw image bytes
///
/// `declared_type` is the response's Content-Type, if known; a declared SVG
/// type short-circuits header sniffing.
///
/// # Example
///
/// ```
/// use image_harvest::image::inspect_bytes;
///
/// let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
/// let meta = inspect_bytes(svg, None).unwrap();
/// assert_eq!(meta.format, "svg");
/// assert_eq!(meta.width, None);
/// ```
pub fn inspect_bytes(bytes: &[u8], declared_type: Option<&str>) -> Result<ImageMetadata, InspectError> {
    if bytes.is_empty() {
        return Err(InspectError::Empty);
    }

    let byte_size = bytes.len() as u64;

    let declared_svg = declared_type
        .map(|t| t.to_ascii_lowercase().contains("svg"))
        .unwrap_or(false);
    if declared_svg || looks_like_svg(bytes) {
        return Ok(svg_metadata(byte_size));
    }

    let image_type = imagesize::image_type(bytes).map_err(map_imagesize_error)?;
    let size = imagesize::blob_size(bytes).map_err(map_imagesize_error)?;

    Ok(ImageMetadata {
        width: u32::try_from(size.width).ok(),
        height: u32::try_from(size.height).ok(),
        format: format_name(&image_type),
        byte_size,
    })
}

/// Inspects an inline `data:` image
///
/// Inline SVG is reported with unknown dimensions and the decoded payload
/// length as its size. Other inline images are decoded and inspected like
/// remote bytes.
pub fn inspect_inline(data: &InlineData<'_>) -> Result<ImageMetadata, InspectError> {
    let bytes = data.decode()?;

    if data.is_svg() {
        return Ok(svg_metadata(bytes.len() as u64));
    }

    inspect_bytes(&bytes, Some(&data.mime))
}

fn svg_metadata(byte_size: u64) -> ImageMetadata {
    ImageMetadata {
        width: None,
        height: None,
        format: "svg".to_string(),
        byte_size,
    }
}

/// Returns true if the bytes open with SVG or XML-wrapped SVG markup
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SVG_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    let lowered = text.to_ascii_lowercase();

    lowered.starts_with("<svg") || (lowered.starts_with("<?xml") && lowered.contains("<svg"))
}

fn map_imagesize_error(error: imagesize::ImageError) -> InspectError {
    match error {
        imagesize::ImageError::NotSupported => InspectError::Unsupported,
        other => InspectError::Corrupted(other.to_string()),
    }
}

/// Maps a detected image type to its lowercase format name
fn format_name(image_type: &ImageType) -> String {
    let name = match image_type {
        ImageType::Png => "png",
        ImageType::Jpeg => "jpeg",
        ImageType::Gif => "gif",
        ImageType::Webp => "webp",
        ImageType::Bmp => "bmp",
        ImageType::Ico => "ico",
        ImageType::Tiff => "tiff",
        other => return container_format_name(&format!("{:?}", other)),
    };
    name.to_string()
}

/// Names the remaining formats from their debug form; HEIF containers carry
/// their codec (`Heif(Av1)` is AVIF)
fn container_format_name(debug: &str) -> String {
    let lowered = debug.to_ascii_lowercase();
    match lowered.split_once('(') {
        Some(("heif", codec)) if codec.starts_with("av1") => "avif".to_string(),
        Some((container, _)) => container.to_string(),
        None => lowered,
    }
}
