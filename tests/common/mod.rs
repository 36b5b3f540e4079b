//! Shared fixtures for the integration suite
//!
//! Builds real Gitabase files on disk so the tests run the same
//! scan/open/query pipeline as the app. Mirrors the crate-internal unit
//! test fixtures, which integration tests cannot reach.

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor,
};
use std::path::Path;
use std::str::FromStr;

/// `PRAGMA user_version` written into fixture files
pub const SCHEMA_VERSION: i64 = 4;

const GITABASE_SCHEMA: &str = r#"
CREATE TABLE books (
    id INTEGER,
    name TEXT,
    author TEXT,
    level INTEGER,
    sort INTEGER,
    has_chapters INTEGER
);

CREATE TABLE songs (
    id INTEGER,
    book_id INTEGER,
    song INTEGER,
    name TEXT,
    sort INTEGER
);

CREATE TABLE chapters (
    book_id INTEGER,
    song INTEGER,
    chapter INTEGER,
    name TEXT
);

CREATE TABLE texts (
    book_id INTEGER,
    song INTEGER,
    chapter INTEGER,
    text TEXT,
    name TEXT,
    content TEXT,
    purport TEXT
);

CREATE TABLE textnums (
    book_id INTEGER,
    song INTEGER,
    text TEXT,
    text_seq_no INTEGER,
    text_offset INTEGER,
    text_size INTEGER
);

CREATE TABLE images (
    id INTEGER,
    book_id INTEGER,
    song INTEGER,
    text TEXT,
    kind INTEGER,
    type INTEGER,
    name TEXT,
    data BLOB
);
"#;

/// One chaptered book, one two-volume song collection, one flat book
const GITABASE_SEED: &str = r#"
INSERT INTO books (id, name, author, level, sort, has_chapters) VALUES
    (1, 'Bhagavad-gita As It Is', 'A. C. Bhaktivedanta Swami', 1, 1, 1),
    (5, 'Songs of the Vaisnava Acaryas', NULL, NULL, 2, 1),
    (9, 'Introduction to Gitabase', 'Gitabase Team', 2, 3, 0);

INSERT INTO songs (id, book_id, song, name, sort) VALUES
    (51, 5, 1, 'First Song Collection', 1),
    (52, 5, 2, 'Second Song Collection', 2);

INSERT INTO chapters (book_id, song, chapter, name) VALUES
    (1, NULL, 1, 'Observing the Armies'),
    (1, NULL, 2, 'Contents of the Gita Summarized'),
    (5, 2, 1, 'Morning Songs');

INSERT INTO texts (book_id, song, chapter, text, name, content, purport) VALUES
    (1, NULL, 1, '1.1', 'Text 1.1', 'dhrtarastra uvaca: dharma-ksetre kuru-ksetre', 'Bhagavad-gita is the widely read theistic science.'),
    (1, NULL, 1, '1.2', 'Text 1.2', 'sanjaya uvaca: drstva tu pandavanikam', NULL),
    (1, NULL, 2, '2.13', 'Text 2.13', 'dehino smin yatha dehe kaumaram yauvanam jara', 'Since every living entity is an individual soul.'),
    (5, 2, 1, '1', 'Samsara Davanala', 'samsara-davanala-lidha-loka', 'The spiritual master receives benediction.'),
    (5, 2, 1, '2', 'Sri Guru Carana Padma', 'sri-guru-carana-padma kevala bhakati sadma', NULL),
    (9, NULL, 1, '1', 'Welcome', 'Welcome to the Gitabase reader.', NULL);

INSERT INTO textnums (book_id, song, text, text_seq_no, text_offset, text_size) VALUES
    (1, NULL, '1.1', 1, 0, 120),
    (1, NULL, '1.2', 2, 120, 95),
    (1, NULL, '2.13', 3, 215, 160),
    (5, 2, '1', 1, 0, 88),
    (5, 2, '2', 2, 88, 74),
    (9, NULL, '1', 1, 0, 23);

INSERT INTO images (id, book_id, song, text, kind, type, name, data) VALUES
    (101, 1, NULL, '1.1', 1, 2, 'krishna_arjuna', 'UE5HREFUQQ=='),
    (102, 1, NULL, '2.13', 3, 3, 'soul_diagram', 'SlBFR0RBVEE='),
    (110, 1, NULL, NULL, 10, 2, 'front_cover', 'Q09WRVJQTkc='),
    (201, 5, 2, '1', 2, 1, 'song_card', 'R0lGREFUQQ=='),
    (210, 5, NULL, NULL, 11, 3, 'back_cover', 'QkFDS0NPVkVS');
"#;

/// Create a SQLite file at `path` and run `sql` against it
pub async fn create_sqlite_file(path: &Path, sql: &str) -> anyhow::Result<()> {
    let connection_string = format!("sqlite://{}?mode=rwc", path.display());
    let connect_opts =
        SqliteConnectOptions::from_str(&connection_string)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_opts)
        .await?;

    pool.execute(sql).await?;
    pool.close().await;
    Ok(())
}

/// Create a fully seeded Gitabase file
pub async fn create_gitabase_file(path: &Path) -> anyhow::Result<()> {
    let sql = format!(
        "{}\n{}\nPRAGMA user_version = {};",
        GITABASE_SCHEMA, GITABASE_SEED, SCHEMA_VERSION
    );
    create_sqlite_file(path, &sql).await
}
