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


//! Content queries against one open Gitabase
//!
//! Hand-written SQL over an open handle's pool, producing the projection
//! models. Strictly read-only: Gitabase files are consumed, never written.
//!
//! # Volume branching
//! Every child query takes a [`BookScope`], never a raw book id. For a
//! volume the scope carries the parent book id plus the volume number, so
//! WHERE clauses come out as `book_id = ? AND song = ?`; filtering a volume
//! by the preview's own `id` returns another book's rows entirely.
//!
//! # Row tolerance
//! Listings fold rows through fallible mappers (`mapping::collect_rows` /
//! `mapping::collect_stream`): a malformed row is logged and skipped, and
//! NULL columns decode to typed defaults.

use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use crate::error::{GitabaseError, Result};
use crate::storage::mapping::{
    blob_or_empty, collect_rows, collect_stream, flag, int_or, opt_int, opt_text, text_or_empty,
};
use crate::storage::models::{
    BookPreview, BookScope, ChapterContentsItem, ImageFileItem, ImageFormat, ImageKind,
    TextContentsItem, TextDetailItem, TextPreviewItem, DEFAULT_BOOK_LEVEL,
};

/// Characters of content included in a text preview snippet
const TEXT_PREVIEW_CHARS: i64 = 160;

/// Reserved image kinds for cover art
const COVER_KIND_FRONT: i64 = 10;
const COVER_KIND_BACK: i64 = 11;

// ============================================================================
// BOOK LISTING
// ============================================================================

/// List every logical book: physical books and, for grouped books, one
/// entry per volume
///
/// A single `books LEFT JOIN songs` produces one row per (book, song)
/// pair. A row with a song becomes a volume preview (its id is the song's
/// row id, its parent is reachable through `volume_group_id` +
/// `volume_number`); a row without one is a standalone book.
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<BookPreview>> {
    let rows = sqlx::query(
        r#"
        SELECT
            b.id AS book_id,
            b.name AS book_name,
            b.author,
            b.level,
            b.has_chapters,
            s.id AS song_id,
            s.song AS song_number,
            s.name AS song_name
        FROM books b
        LEFT JOIN songs s ON s.book_id = b.id
        ORDER BY b.sort, s.sort
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(collect_rows(rows, "books", map_book_preview))
}

fn map_book_preview(row: &SqliteRow) -> Result<BookPreview> {
    let book_id = opt_int(row, "book_id")?
        .ok_or_else(|| GitabaseError::InvalidData("book row without id".to_string()))?;
    let author = text_or_empty(row, "author")?;
    let level = int_or(row, "level", DEFAULT_BOOK_LEVEL)?;
    let has_chapters = flag(row, "has_chapters")?;

    match opt_int(row, "song_id")? {
        Some(song_id) => Ok(BookPreview {
            id: song_id,
            title: text_or_empty(row, "song_name")?,
            author,
            level,
            has_chapters,
            volume_group_id: Some(book_id),
            volume_number: opt_int(row, "song_number")?,
        }),
        None => Ok(BookPreview {
            id: book_id,
            title: text_or_empty(row, "book_name")?,
            author,
            level,
            has_chapters,
            volume_group_id: None,
            volume_number: None,
        }),
    }
}

// ============================================================================
// CHAPTER QUERIES
// ============================================================================

/// List a book's chapters with the number of texts in each
pub async fn list_chapters(pool: &SqlitePool, scope: BookScope) -> Result<Vec<ChapterContentsItem>> {
    let rows = sqlx::query(
        r#"
        SELECT
            c.chapter,
            c.name,
            COUNT(t.text) AS text_count
        FROM chapters c
        LEFT JOIN texts t
            ON t.book_id = c.book_id AND t.chapter = c.chapter AND t.song IS c.song
        WHERE c.book_id = ?1 AND (?2 IS NULL OR c.song = ?2)
        GROUP BY c.chapter, c.name
        ORDER BY c.chapter
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .fetch_all(pool)
    .await?;

    Ok(collect_rows(rows, "chapters", |row| {
        Ok(ChapterContentsItem {
            chapter: int_or(row, "chapter", 0)?,
            name: text_or_empty(row, "name")?,
            text_count: int_or(row, "text_count", 0)?,
        })
    }))
}

/// List the texts of one chapter as contents entries
pub async fn list_chapter_contents(
    pool: &SqlitePool,
    scope: BookScope,
    chapter: i64,
) -> Result<Vec<TextContentsItem>> {
    let rows = sqlx::query(
        r#"
        SELECT t.text AS text_number, t.name
        FROM texts t
        LEFT JOIN textnums tn
            ON tn.book_id = t.book_id AND tn.song IS t.song AND tn.text = t.text
        WHERE t.book_id = ?1 AND (?2 IS NULL OR t.song = ?2) AND t.chapter = ?3
        ORDER BY tn.text_seq_no
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(chapter)
    .fetch_all(pool)
    .await?;

    Ok(collect_rows(rows, "chapter_contents", |row| {
        Ok(TextContentsItem {
            text_number: text_or_empty(row, "text_number")?,
            name: text_or_empty(row, "name")?,
        })
    }))
}

// ============================================================================
// TEXT QUERIES
// ============================================================================

/// List texts with a content snippet, optionally restricted to a chapter
pub async fn list_text_previews(
    pool: &SqlitePool,
    scope: BookScope,
    chapter: Option<i64>,
) -> Result<Vec<TextPreviewItem>> {
    let rows = sqlx::query(
        r#"
        SELECT
            t.text AS text_number,
            t.name,
            substr(COALESCE(t.content, ''), 1, ?4) AS preview
        FROM texts t
        LEFT JOIN textnums tn
            ON tn.book_id = t.book_id AND tn.song IS t.song AND tn.text = t.text
        WHERE t.book_id = ?1 AND (?2 IS NULL OR t.song = ?2) AND (?3 IS NULL OR t.chapter = ?3)
        ORDER BY tn.text_seq_no
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(chapter)
    .bind(TEXT_PREVIEW_CHARS)
    .fetch(pool);

    collect_stream(rows, "text_previews", |row| {
        Ok(TextPreviewItem {
            text_number: text_or_empty(row, "text_number")?,
            name: text_or_empty(row, "name")?,
            preview: text_or_empty(row, "preview")?,
        })
    })
    .await
}

/// Fetch one text with paging metadata by its human-readable number
pub async fn get_text_detail(
    pool: &SqlitePool,
    scope: BookScope,
    text_number: &str,
) -> Result<Option<TextDetailItem>> {
    let row = sqlx::query(
        r#"
        SELECT
            t.text AS text_number,
            t.name,
            t.content,
            t.purport,
            tn.text_seq_no,
            tn.text_offset,
            tn.text_size,
            (
                SELECT COUNT(*)
                FROM images i
                WHERE i.book_id = t.book_id AND i.song IS t.song
                  AND i.text = t.text AND i.kind < 10
            ) AS number_of_images
        FROM texts t
        LEFT JOIN textnums tn
            ON tn.book_id = t.book_id AND tn.song IS t.song AND tn.text = t.text
        WHERE t.book_id = ?1 AND (?2 IS NULL OR t.song = ?2) AND t.text = ?3
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(text_number)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_text_detail).transpose()
}

/// Fetch one text by its sequential index within the book
///
/// Only texts with a `textnums` row are addressable this way.
pub async fn get_text_by_seq_no(
    pool: &SqlitePool,
    scope: BookScope,
    seq_no: i64,
) -> Result<Option<TextDetailItem>> {
    let row = sqlx::query(
        r#"
        SELECT
            t.text AS text_number,
            t.name,
            t.content,
            t.purport,
            tn.text_seq_no,
            tn.text_offset,
            tn.text_size,
            (
                SELECT COUNT(*)
                FROM images i
                WHERE i.book_id = t.book_id AND i.song IS t.song
                  AND i.text = t.text AND i.kind < 10
            ) AS number_of_images
        FROM texts t
        JOIN textnums tn
            ON tn.book_id = t.book_id AND tn.song IS t.song AND tn.text = t.text
        WHERE t.book_id = ?1 AND (?2 IS NULL OR t.song = ?2) AND tn.text_seq_no = ?3
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(seq_no)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_text_detail).transpose()
}

/// List texts whose sequential index falls in `[from_seq, to_seq]`
pub async fn list_texts_in_range(
    pool: &SqlitePool,
    scope: BookScope,
    from_seq: i64,
    to_seq: i64,
) -> Result<Vec<TextDetailItem>> {
    let rows = sqlx::query(
        r#"
        SELECT
            t.text AS text_number,
            t.name,
            t.content,
            t.purport,
            tn.text_seq_no,
            tn.text_offset,
            tn.text_size,
            (
                SELECT COUNT(*)
                FROM images i
                WHERE i.book_id = t.book_id AND i.song IS t.song
                  AND i.text = t.text AND i.kind < 10
            ) AS number_of_images
        FROM texts t
        JOIN textnums tn
            ON tn.book_id = t.book_id AND tn.song IS t.song AND tn.text = t.text
        WHERE t.book_id = ?1 AND (?2 IS NULL OR t.song = ?2)
          AND tn.text_seq_no BETWEEN ?3 AND ?4
        ORDER BY tn.text_seq_no
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(from_seq)
    .bind(to_seq)
    .fetch(pool);

    collect_stream(rows, "texts_in_range", map_text_detail).await
}

/// Resolve a human text number (e.g. `"2.13"`) to its sequential index
pub async fn find_text_index_by_text_number(
    pool: &SqlitePool,
    scope: BookScope,
    text_number: &str,
) -> Result<Option<i64>> {
    let seq_no: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT tn.text_seq_no
        FROM textnums tn
        WHERE tn.book_id = ?1 AND (?2 IS NULL OR tn.song = ?2) AND tn.text = ?3
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(text_number)
    .fetch_optional(pool)
    .await?;

    Ok(seq_no)
}

/// Count the texts a book (or one volume) holds
pub async fn count_texts(pool: &SqlitePool, scope: BookScope) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM texts WHERE book_id = ?1 AND (?2 IS NULL OR song = ?2)",
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

fn map_text_detail(row: &SqliteRow) -> Result<TextDetailItem> {
    Ok(TextDetailItem {
        text_number: text_or_empty(row, "text_number")?,
        name: text_or_empty(row, "name")?,
        content: text_or_empty(row, "content")?,
        purport: text_or_empty(row, "purport")?,
        text_seq_no: int_or(row, "text_seq_no", 0)?,
        text_offset: int_or(row, "text_offset", 0)?,
        text_size: int_or(row, "text_size", 0)?,
        number_of_images: int_or(row, "number_of_images", 0)?,
    })
}

// ============================================================================
// IMAGE QUERIES
// ============================================================================

/// List content images (kind below 10), optionally only those of one text
pub async fn list_images(
    pool: &SqlitePool,
    scope: BookScope,
    text_number: Option<&str>,
) -> Result<Vec<ImageFileItem>> {
    let rows = sqlx::query(
        r#"
        SELECT i.id, i.text AS text_number, i.kind, i.type AS format, i.name, i.data
        FROM images i
        WHERE i.book_id = ?1 AND (?2 IS NULL OR i.song = ?2)
          AND i.kind < 10
          AND (?3 IS NULL OR i.text = ?3)
        ORDER BY i.id
        "#,
    )
    .bind(scope.book_id)
    .bind(scope.volume)
    .bind(text_number)
    .fetch_all(pool)
    .await?;

    Ok(collect_rows(rows, "images", map_image))
}

/// Fetch a book's front cover, falling back to the back cover
///
/// Covers hang off the physical book row, so the volume part of the scope
/// is intentionally ignored here: every volume of a grouped book shares
/// the parent's cover art.
pub async fn front_cover_image(pool: &SqlitePool, scope: BookScope) -> Result<Option<ImageFileItem>> {
    if let Some(front) = fetch_cover(pool, scope.book_id, COVER_KIND_FRONT).await? {
        return Ok(Some(front));
    }
    fetch_cover(pool, scope.book_id, COVER_KIND_BACK).await
}

async fn fetch_cover(pool: &SqlitePool, book_id: i64, kind: i64) -> Result<Option<ImageFileItem>> {
    let row = sqlx::query(
        r#"
        SELECT i.id, i.text AS text_number, i.kind, i.type AS format, i.name, i.data
        FROM images i
        WHERE i.book_id = ?1 AND i.kind = ?2
        ORDER BY i.id
        LIMIT 1
        "#,
    )
    .bind(book_id)
    .bind(kind)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_image).transpose()
}

fn map_image(row: &SqliteRow) -> Result<ImageFileItem> {
    let id = opt_int(row, "id")?
        .ok_or_else(|| GitabaseError::InvalidData("image row without id".to_string()))?;
    Ok(ImageFileItem {
        id,
        text_number: opt_text(row, "text_number")?,
        kind: ImageKind::from_i64(int_or(row, "kind", 0)?),
        format: ImageFormat::from_i64(int_or(row, "format", 0)?),
        name: text_or_empty(row, "name")?,
        payload: blob_or_empty(row, "data")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{GitabaseId, GitabaseLang, GitabaseType};
    use crate::storage::handle::GitabaseHandle;
    use crate::testutil;
    use tempfile::TempDir;

    async fn fixture_handle(dir: &TempDir) -> GitabaseHandle {
        let path = dir.path().join("gitabase_texts_eng.db");
        testutil::create_gitabase_file(&path).await.unwrap();
        let id = GitabaseId::new(GitabaseType::Texts, GitabaseLang::English);
        GitabaseHandle::open(id, &path).await.unwrap()
    }

    fn scope_of(books: &[BookPreview], id: i64) -> BookScope {
        books
            .iter()
            .find(|b| b.id == id)
            .expect("missing expected book")
            .scope()
    }

    #[tokio::test]
    async fn test_list_books_shapes_volumes() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;

        let books = list_books(handle.pool()).await.expect("Failed to list books");
        assert_eq!(books.len(), 4);

        // Sorted by (books.sort, songs.sort)
        assert_eq!(books[0].id, 1);
        assert_eq!(books[0].title, "Bhagavad-gita As It Is");
        assert!(!books[0].is_volume());
        assert_eq!(books[0].level, 1);
        assert!(books[0].has_chapters);

        assert_eq!(books[1].id, 51);
        assert_eq!(books[1].title, "First Song Collection");
        assert_eq!(books[1].volume_group_id, Some(5));
        assert_eq!(books[1].volume_number, Some(1));

        assert_eq!(books[2].id, 52);
        assert_eq!(books[2].title, "Second Song Collection");
        assert_eq!(books[2].volume_group_id, Some(5));
        assert_eq!(books[2].volume_number, Some(2));
        // Parent book has NULL author and level; defaults apply
        assert_eq!(books[2].author, "");
        assert_eq!(books[2].level, DEFAULT_BOOK_LEVEL);

        assert_eq!(books[3].id, 9);
        assert!(!books[3].is_volume());
        assert!(!books[3].has_chapters);
    }

    #[tokio::test]
    async fn test_list_chapters_standalone_book() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        let chapters = list_chapters(handle.pool(), scope_of(&books, 1))
            .await
            .expect("Failed to list chapters");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter, 1);
        assert_eq!(chapters[0].name, "Observing the Armies");
        assert_eq!(chapters[0].text_count, 2);
        assert_eq!(chapters[1].chapter, 2);
        assert_eq!(chapters[1].text_count, 1);
    }

    #[tokio::test]
    async fn test_list_chapters_branches_on_volume() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        // Volume 2 has one chapter; volume 1 has none
        let vol2 = list_chapters(handle.pool(), scope_of(&books, 52)).await.unwrap();
        assert_eq!(vol2.len(), 1);
        assert_eq!(vol2[0].name, "Morning Songs");
        assert_eq!(vol2[0].text_count, 2);

        let vol1 = list_chapters(handle.pool(), scope_of(&books, 51)).await.unwrap();
        assert!(vol1.is_empty());
    }

    #[tokio::test]
    async fn test_volume_filter_never_uses_song_row_id() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        // Filtering by the song's own row id (52) would find nothing;
        // the scope must translate to book_id = 5 AND song = 2
        let scope = scope_of(&books, 52);
        assert_eq!(scope.book_id, 5);
        assert_eq!(scope.volume, Some(2));

        let wrong_scope = BookScope { book_id: 52, volume: Some(2) };
        assert_eq!(count_texts(handle.pool(), wrong_scope).await.unwrap(), 0);
        assert_eq!(count_texts(handle.pool(), scope).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_chapter_contents() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        let contents = list_chapter_contents(handle.pool(), scope_of(&books, 1), 1)
            .await
            .expect("Failed to list chapter contents");

        let numbers: Vec<&str> = contents.iter().map(|c| c.text_number.as_str()).collect();
        assert_eq!(numbers, vec!["1.1", "1.2"]);
        assert_eq!(contents[0].name, "Text 1.1");
    }

    #[tokio::test]
    async fn test_text_previews() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();
        let scope = scope_of(&books, 1);

        let all = list_text_previews(handle.pool(), scope, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let chapter_two = list_text_previews(handle.pool(), scope, Some(2)).await.unwrap();
        assert_eq!(chapter_two.len(), 1);
        assert_eq!(chapter_two[0].text_number, "2.13");
        assert!(chapter_two[0].preview.starts_with("dehino"));
    }

    #[tokio::test]
    async fn test_text_detail() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();
        let scope = scope_of(&books, 1);

        let detail = get_text_detail(handle.pool(), scope, "2.13")
            .await
            .expect("Query failed")
            .expect("Text 2.13 should exist");

        assert_eq!(detail.name, "Text 2.13");
        assert_eq!(detail.text_seq_no, 3);
        assert_eq!(detail.text_offset, 215);
        assert_eq!(detail.text_size, 160);
        assert_eq!(detail.number_of_images, 1);
        assert!(detail.purport.starts_with("Since every"));

        // NULL purport decodes to empty, not an error
        let no_purport = get_text_detail(handle.pool(), scope, "1.2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(no_purport.purport, "");

        assert!(get_text_detail(handle.pool(), scope, "99.99")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_text_by_seq_no_and_range() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();
        let scope = scope_of(&books, 1);

        let second = get_text_by_seq_no(handle.pool(), scope, 2)
            .await
            .unwrap()
            .expect("seq 2 should exist");
        assert_eq!(second.text_number, "1.2");

        assert!(get_text_by_seq_no(handle.pool(), scope, 42).await.unwrap().is_none());

        let range = list_texts_in_range(handle.pool(), scope, 1, 2).await.unwrap();
        let numbers: Vec<&str> = range.iter().map(|t| t.text_number.as_str()).collect();
        assert_eq!(numbers, vec!["1.1", "1.2"]);
    }

    #[tokio::test]
    async fn test_find_text_index() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();
        let scope = scope_of(&books, 1);

        assert_eq!(
            find_text_index_by_text_number(handle.pool(), scope, "2.13").await.unwrap(),
            Some(3)
        );
        assert_eq!(
            find_text_index_by_text_number(handle.pool(), scope, "nope").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_count_texts() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        assert_eq!(count_texts(handle.pool(), scope_of(&books, 1)).await.unwrap(), 3);
        assert_eq!(count_texts(handle.pool(), scope_of(&books, 52)).await.unwrap(), 2);
        assert_eq!(count_texts(handle.pool(), scope_of(&books, 9)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_images_excludes_covers() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        let images = list_images(handle.pool(), scope_of(&books, 1), None).await.unwrap();
        let ids: Vec<i64> = images.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![101, 102]);
        assert_eq!(images[0].kind, ImageKind::Picture);
        assert_eq!(images[0].format, ImageFormat::Png);
        assert_eq!(images[0].decode_payload().unwrap(), b"PNGDATA");

        let for_text = list_images(handle.pool(), scope_of(&books, 1), Some("2.13"))
            .await
            .unwrap();
        assert_eq!(for_text.len(), 1);
        assert_eq!(for_text[0].kind, ImageKind::Diagram);

        let volume_images = list_images(handle.pool(), scope_of(&books, 52), None)
            .await
            .unwrap();
        assert_eq!(volume_images.len(), 1);
        assert_eq!(volume_images[0].id, 201);
        assert_eq!(volume_images[0].format, ImageFormat::Gif);
    }

    #[tokio::test]
    async fn test_front_cover_with_fallback() {
        let dir = TempDir::new().unwrap();
        let handle = fixture_handle(&dir).await;
        let books = list_books(handle.pool()).await.unwrap();

        let cover = front_cover_image(handle.pool(), scope_of(&books, 1))
            .await
            .unwrap()
            .expect("book 1 has a front cover");
        assert_eq!(cover.id, 110);
        assert_eq!(cover.kind, ImageKind::FrontCover);

        // Book 5 only carries a back cover; volumes share it
        let fallback = front_cover_image(handle.pool(), scope_of(&books, 52))
            .await
            .unwrap()
            .expect("book 5 falls back to the back cover");
        assert_eq!(fallback.id, 210);
        assert_eq!(fallback.kind, ImageKind::BackCover);

        assert!(front_cover_image(handle.pool(), scope_of(&books, 9))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bad_row_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitabase_texts_eng.db");
        testutil::create_gitabase_file(&path).await.unwrap();
        // A book row whose id is text survives insertion because the
        // column affinity cannot coerce it; mapping must skip it
        testutil::create_sqlite_file(
            &path,
            "INSERT INTO books (id, name, author, level, sort, has_chapters) \
             VALUES ('junk', 'Broken Row', '', 1, 99, 0)",
        )
        .await
        .unwrap();

        let id = GitabaseId::new(GitabaseType::Texts, GitabaseLang::English);
        let handle = GitabaseHandle::open(id, &path).await.unwrap();

        let books = list_books(handle.pool()).await.expect("listing must survive junk");
        assert_eq!(books.len(), 4);
        assert!(books.iter().all(|b| b.title != "Broken Row"));
    }

    #[tokio::test]
    async fn test_empty_database_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitabase_texts_eng.db");
        testutil::create_empty_gitabase_file(&path).await.unwrap();

        let id = GitabaseId::new(GitabaseType::Texts, GitabaseLang::English);
        let handle = GitabaseHandle::open(id, &path).await.unwrap();

        assert!(list_books(handle.pool()).await.unwrap().is_empty());
        let scope = BookScope { book_id: 1, volume: None };
        assert!(list_chapters(handle.pool(), scope).await.unwrap().is_empty());
        assert_eq!(count_texts(handle.pool(), scope).await.unwrap(), 0);
    }
}
