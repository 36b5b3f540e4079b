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


//! Use-case facade over the query layer
//!
//! Each call resolves a handle through the manager's cache and runs one
//! query against it. Callers pass the [`BookPreview`] they hold; the volume
//! branching happens inside via [`BookPreview::scope`], so a grouped book's
//! chapters and texts always filter by the parent book id plus the volume
//! number.

use std::sync::Arc;

use crate::error::Result;
use crate::identity::GitabaseId;
use crate::manager::GitabaseManager;
use crate::storage::models::{
    BookPreview, ChapterContentsItem, ImageFileItem, TextContentsItem, TextDetailItem,
    TextPreviewItem,
};
use crate::storage::queries;

/// Read-side repository for book content
pub struct GitabaseTextsRepo {
    manager: Arc<GitabaseManager>,
}

impl GitabaseTextsRepo {
    pub fn new(manager: Arc<GitabaseManager>) -> Self {
        Self { manager }
    }

    /// Identity of the currently selected Gitabase
    ///
    /// Convenience for callers that operate on "the open database" rather
    /// than an explicit id.
    pub fn current_id(&self) -> Result<GitabaseId> {
        self.manager.current_id()
    }

    /// All logical books of a Gitabase, volumes included
    pub async fn books(&self, id: &GitabaseId) -> Result<Vec<BookPreview>> {
        let handle = self.manager.open(id).await?;
        queries::list_books(handle.pool()).await
    }

    /// A book's chapters with per-chapter text counts
    pub async fn chapters(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
    ) -> Result<Vec<ChapterContentsItem>> {
        let handle = self.manager.open(id).await?;
        queries::list_chapters(handle.pool(), book.scope()).await
    }

    /// Contents entries for one chapter
    pub async fn chapter_contents(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        chapter: i64,
    ) -> Result<Vec<TextContentsItem>> {
        let handle = self.manager.open(id).await?;
        queries::list_chapter_contents(handle.pool(), book.scope(), chapter).await
    }

    /// Texts with content snippets, optionally restricted to a chapter
    pub async fn text_previews(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        chapter: Option<i64>,
    ) -> Result<Vec<TextPreviewItem>> {
        let handle = self.manager.open(id).await?;
        queries::list_text_previews(handle.pool(), book.scope(), chapter).await
    }

    /// One text by its human-readable number, e.g. `"2.13"`
    pub async fn text_detail(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        text_number: &str,
    ) -> Result<Option<TextDetailItem>> {
        let handle = self.manager.open(id).await?;
        queries::get_text_detail(handle.pool(), book.scope(), text_number).await
    }

    /// One text by its sequential index within the book
    pub async fn text_by_seq_no(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        seq_no: i64,
    ) -> Result<Option<TextDetailItem>> {
        let handle = self.manager.open(id).await?;
        queries::get_text_by_seq_no(handle.pool(), book.scope(), seq_no).await
    }

    /// Texts whose sequential index falls in `[from_seq, to_seq]`
    pub async fn texts_in_range(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        from_seq: i64,
        to_seq: i64,
    ) -> Result<Vec<TextDetailItem>> {
        let handle = self.manager.open(id).await?;
        queries::list_texts_in_range(handle.pool(), book.scope(), from_seq, to_seq).await
    }

    /// Resolve a text number to its sequential index
    pub async fn text_index(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        text_number: &str,
    ) -> Result<Option<i64>> {
        let handle = self.manager.open(id).await?;
        queries::find_text_index_by_text_number(handle.pool(), book.scope(), text_number).await
    }

    /// Number of texts in a book or volume
    pub async fn text_count(&self, id: &GitabaseId, book: &BookPreview) -> Result<i64> {
        let handle = self.manager.open(id).await?;
        queries::count_texts(handle.pool(), book.scope()).await
    }

    /// Content images of a book, optionally only those of one text
    pub async fn images(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
        text_number: Option<&str>,
    ) -> Result<Vec<ImageFileItem>> {
        let handle = self.manager.open(id).await?;
        queries::list_images(handle.pool(), book.scope(), text_number).await
    }

    /// A book's cover image, front preferred
    pub async fn front_cover(
        &self,
        id: &GitabaseId,
        book: &BookPreview,
    ) -> Result<Option<ImageFileItem>> {
        let handle = self.manager.open(id).await?;
        queries::front_cover_image(handle.pool(), book.scope()).await
    }
}
