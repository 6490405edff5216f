//! Image records and the catalog that accumulates them

use crate::image::ImageMetadata;
use crate::url::Locator;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Longest display name kept before truncation
pub const MAX_NAME_LENGTH: usize = 50;

/// Uniqueness material for synthesized and truncated display names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameStamp {
    /// Wall-clock milliseconds since the Unix epoch
    pub millis: i64,

    /// Crawl-local sequence number
    pub seq: u64,
}

/// Metadata for one catalogued image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    #[serde(skip)]
    pub locator: Locator,

    /// Display name derived from the locator
    pub name: String,

    /// Pixel width, null for vector formats
    pub width: Option<u32>,

    /// Pixel height, null for vector formats
    pub height: Option<u32>,

    /// Encoded format (`png`, `jpeg`, `svg`, ...)
    pub format: String,

    /// Encoded size in bytes
    pub size: u64,

    /// Lowercase file extension without the dot
    pub extension: String,
}

impl ImageRecord {
    /// Builds a record from a locator and its inspected metadata
    pub fn new(locator: Locator, metadata: ImageMetadata, stamp: NameStamp) -> Self {
        let (name, extension) = match locator.inline_data().and_then(Result::ok) {
            Some(data) => {
                let ext = inline_extension(data.subtype(), &metadata.format);
                (format!("image-{}-{}.{}", stamp.millis, stamp.seq, ext), ext)
            }
            None => {
                let basename = locator
                    .basename()
                    .unwrap_or_else(|| format!("image-{}-{}", stamp.millis, stamp.seq));
                let ext = file_extension(&basename)
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_else(|| metadata.format.clone());
                (display_name(&basename, stamp), ext)
            }
        };

        Self {
            locator,
            name,
            width: metadata.width,
            height: metadata.height,
            format: metadata.format,
            size: metadata.byte_size,
            extension,
        }
    }
}

fn inline_extension(subtype: &str, format: &str) -> String {
    let subtype = subtype.trim();
    if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
        subtype.to_string()
    } else {
        format.to_string()
    }
}

/// Extension of a file name, if it has a non-empty one
fn file_extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Truncates long basenames, keeping the extension and adding a timestamp
fn display_name(basename: &str, stamp: NameStamp) -> String {
    if basename.chars().count() <= MAX_NAME_LENGTH {
        return basename.to_string();
    }

    let ext = file_extension(basename);
    let keep = MAX_NAME_LENGTH.saturating_sub(ext.map_or(0, |e| e.chars().count()) + 1);
    let suffix = ext.map(|e| format!(".{}", e)).unwrap_or_default();
    let head: String = basename.chars().take(keep).collect();

    format!("{}-{}{}", head, stamp.millis, suffix)
}

/// Mapping from image locator to its record
///
/// Keys are unique; a record is immutable once inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: BTreeMap<Locator, ImageRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record unless its locator is already catalogued
    ///
    /// Returns false, leaving the existing record untouched, on a duplicate.
    pub fn insert(&mut self, record: ImageRecord) -> bool {
        match self.records.entry(record.locator.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn get(&self, locator: &Locator) -> Option<&ImageRecord> {
        self.records.get(locator)
    }

    pub fn contains(&self, locator: &Locator) -> bool {
        self.records.contains_key(locator)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }
}
