//! Domain models for Gitabase content
//!
//! Descriptors identify whole databases; the remaining types are read-only
//! projections produced by the query layer. Nothing here is ever written
//! back to a database file.
//!
//! # SQLite Adaptations
//! - Enums stored as integers in the `images` table
//! - Image data stored as UTF-8 bytes of a base64 string, not raw binary
//! - NULL columns decode to typed defaults during row mapping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::identity::{GitabaseId, GitabaseType};

/// Book level used when the `level` column is NULL or unreadable
pub const DEFAULT_BOOK_LEVEL: i64 = 3;

// ============================================================================
// ENUMS
// ============================================================================

/// Image kind stored in the `kind` column
///
/// Values below 10 are listable content images; 10 and 11 are reserved for
/// cover art and excluded from normal listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ImageKind {
    Unknown = 0,
    Picture = 1,
    Card = 2,
    Diagram = 3,
    Fresco = 4,
    FrontCover = 10,
    BackCover = 11,
}

impl ImageKind {
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => ImageKind::Picture,
            2 => ImageKind::Card,
            3 => ImageKind::Diagram,
            4 => ImageKind::Fresco,
            10 => ImageKind::FrontCover,
            11 => ImageKind::BackCover,
            _ => ImageKind::Unknown,
        }
    }

    /// Whether this kind is cover art rather than content
    pub fn is_cover(&self) -> bool {
        matches!(self, ImageKind::FrontCover | ImageKind::BackCover)
    }
}

/// Image file format stored in the `type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ImageFormat {
    Unknown = 0,
    Gif = 1,
    Png = 2,
    Jpeg = 3,
    Svg = 4,
}

impl ImageFormat {
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => ImageFormat::Gif,
            2 => ImageFormat::Png,
            3 => ImageFormat::Jpeg,
            4 => ImageFormat::Svg,
            _ => ImageFormat::Unknown,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "image/gif",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "gif",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
            ImageFormat::Unknown => "bin",
        }
    }
}

// ============================================================================
// DESCRIPTOR
// ============================================================================

/// A validated Gitabase known to the registry
///
/// Built by the scanner from a file that passed the `books`-table check.
/// Lives in memory only; a fresh scan rebuilds the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gitabase {
    pub id: GitabaseId,
    /// Display title, enriched from the catalog when available
    pub title: String,
    pub file_path: PathBuf,
    /// Schema version from `PRAGMA user_version`
    pub version: i64,
    pub is_shop: bool,
    pub has_translation: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Gitabase {
    /// Build a descriptor with defaults derived from the identity
    pub fn new(id: GitabaseId, file_path: PathBuf) -> Self {
        let title = id.default_title();
        let is_shop = id.content_type == GitabaseType::Shop;
        Self {
            id,
            title,
            file_path,
            version: 0,
            is_shop,
            has_translation: false,
            last_modified: None,
        }
    }

    /// Key form shared with the cache and host-side persistence
    pub fn key(&self) -> String {
        self.id.key()
    }
}

// ============================================================================
// BOOK PROJECTIONS
// ============================================================================

/// A logical book in a listing: either a physical book row or one volume
/// of a grouped book
///
/// For a volume, `id` is the song's own row id and the parent book is
/// addressed through `volume_group_id` + `volume_number`. Child queries
/// must go through [`BookScope`] so the right pair of filter values is
/// used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPreview {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub level: i64,
    pub has_chapters: bool,
    pub volume_group_id: Option<i64>,
    pub volume_number: Option<i64>,
}

impl BookPreview {
    /// True when this preview is one volume of a grouped book
    pub fn is_volume(&self) -> bool {
        self.volume_group_id.is_some()
    }

    /// Filter values for child-entity queries
    pub fn scope(&self) -> BookScope {
        match self.volume_group_id {
            Some(group_id) => BookScope {
                book_id: group_id,
                volume: self.volume_number,
            },
            None => BookScope {
                book_id: self.id,
                volume: None,
            },
        }
    }
}

/// WHERE-clause values derived from a [`BookPreview`]
///
/// Volumes filter by the parent book id plus their volume number; plain
/// books filter by their own id with no volume constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookScope {
    pub book_id: i64,
    pub volume: Option<i64>,
}

// ============================================================================
// CONTENT PROJECTIONS
// ============================================================================

/// One chapter row in a book's table of contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterContentsItem {
    pub chapter: i64,
    pub name: String,
    /// Number of texts inside the chapter
    pub text_count: i64,
}

/// One text row in a chapter's table of contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContentsItem {
    pub text_number: String,
    pub name: String,
}

/// A text with a short content snippet, for search-style listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPreviewItem {
    pub text_number: String,
    pub name: String,
    pub preview: String,
}

/// A full text with its paging metadata
///
/// `text_seq_no`/`text_offset`/`text_size` come from the `textnums` table
/// and drive sequential navigation; they fall back to 0 when the book
/// carries no `textnums` row for the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDetailItem {
    pub text_number: String,
    pub name: String,
    pub content: String,
    pub purport: String,
    pub text_seq_no: i64,
    pub text_offset: i64,
    pub text_size: i64,
    pub number_of_images: i64,
}

// ============================================================================
// IMAGES
// ============================================================================

/// An image attached to a text or serving as a book cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFileItem {
    pub id: i64,
    /// Text the image belongs to; `None` for covers
    pub text_number: Option<String>,
    pub kind: ImageKind,
    pub format: ImageFormat,
    pub name: String,
    /// Raw cell content: UTF-8 bytes of a base64 string
    pub payload: Vec<u8>,
}

impl ImageFileItem {
    /// Decode the payload into binary image data
    ///
    /// The cell holds base64 *text*, so the bytes go through UTF-8 first
    /// and then through a base64 decode. Re-encoding the raw bytes instead
    /// would silently corrupt every image.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        use base64::{engine::general_purpose, Engine as _};

        let text = std::str::from_utf8(&self.payload)
            .map_err(|e| crate::error::GitabaseError::InvalidData(format!(
                "image {} payload is not UTF-8: {}",
                self.id, e
            )))?;
        let decoded = general_purpose::STANDARD.decode(text.trim())?;
        Ok(decoded)
    }
}
