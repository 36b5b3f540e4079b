// Gitabase Reader - Scripture Library Core
// Copyright (C) 2025 Gitabase contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database access for Gitabase content
//!
//! Everything here is read-only: Gitabase files arrive from outside the
//! app (bundled, downloaded, or user-imported) and are only ever queried.
//!
//! - [`handle`]: one open read-only connection pool per database file
//! - [`cache`]: the bounded LRU of open handles
//! - [`models`]: descriptors and query projections
//! - [`mapping`]: null-safe column accessors and the row-skip fold
//! - [`queries`]: the hand-written SQL producing the projections

pub mod cache;
pub mod handle;
pub mod mapping;
pub mod models;
pub mod queries;

// Re-export commonly used types
pub use cache::{ConnectionCache, DEFAULT_MAX_OPEN_HANDLES};
pub use handle::{GitabaseHandle, GitabaseInspection};
pub use models::{
    BookPreview, BookScope, ChapterContentsItem, Gitabase, ImageFileItem, ImageFormat, ImageKind,
    TextContentsItem, TextDetailItem, TextPreviewItem,
};
