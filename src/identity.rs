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


//! Gitabase identity: content type, language, and the derived id
//!
//! Every database file carries its identity in its file name
//! (`gitabase_{type}_{lang}.db`). This module parses that name, and encodes
//! the identity into the single `type_lang` key form used for cache keys and
//! host-side persistence.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::error::{GitabaseError, Result};

/// Marker every Gitabase file name must contain
pub const GITABASE_MARKER: &str = "gitabase";

/// Marker plus the separator that precedes the identity segments
pub const GITABASE_PREFIX: &str = "gitabase_";

/// Database file extension
pub const GITABASE_EXTENSION: &str = "db";

// ============================================================================
// CONTENT TYPE
// ============================================================================

/// Content type of a Gitabase
///
/// Known types get enum variants; anything else is carried through as
/// `Other` so new database kinds keep working without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GitabaseType {
    /// Scripture texts, the primary content
    Texts,
    /// Application help content
    Help,
    /// User-added books
    MyBooks,
    /// Purchasable content listings
    Shop,
    /// Unrecognized type code, kept verbatim (lowercased)
    Other(String),
}

impl GitabaseType {
    /// Parse a type code as it appears in file names and keys
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "texts" => GitabaseType::Texts,
            "help" => GitabaseType::Help,
            "mybooks" => GitabaseType::MyBooks,
            "shop" => GitabaseType::Shop,
            other => GitabaseType::Other(other.to_string()),
        }
    }

    /// Canonical lowercase code used in file names and keys
    pub fn as_str(&self) -> &str {
        match self {
            GitabaseType::Texts => "texts",
            GitabaseType::Help => "help",
            GitabaseType::MyBooks => "mybooks",
            GitabaseType::Shop => "shop",
            GitabaseType::Other(code) => code,
        }
    }

    /// Human-readable name for fallback titles
    pub fn display_name(&self) -> String {
        match self {
            GitabaseType::Texts => "Texts".to_string(),
            GitabaseType::Help => "Help".to_string(),
            GitabaseType::MyBooks => "My Books".to_string(),
            GitabaseType::Shop => "Shop".to_string(),
            GitabaseType::Other(code) => {
                let mut chars = code.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for GitabaseType {
    fn from(code: String) -> Self {
        GitabaseType::from_code(&code)
    }
}

impl From<GitabaseType> for String {
    fn from(value: GitabaseType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GitabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LANGUAGE
// ============================================================================

/// Language of a Gitabase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GitabaseLang {
    English,
    Russian,
    /// Unrecognized language code, kept verbatim (lowercased)
    Other(String),
}

impl GitabaseLang {
    /// Parse a language code as it appears in file names and keys
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "eng" => GitabaseLang::English,
            "rus" => GitabaseLang::Russian,
            other => GitabaseLang::Other(other.to_string()),
        }
    }

    /// Canonical lowercase code used in file names and keys
    pub fn as_str(&self) -> &str {
        match self {
            GitabaseLang::English => "eng",
            GitabaseLang::Russian => "rus",
            GitabaseLang::Other(code) => code,
        }
    }
}

impl From<String> for GitabaseLang {
    fn from(code: String) -> Self {
        GitabaseLang::from_code(&code)
    }
}

impl From<GitabaseLang> for String {
    fn from(value: GitabaseLang) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GitabaseLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// IDENTITY
// ============================================================================

/// Identity of a Gitabase: content type plus language
///
/// This is the key type for the connection cache and the registry. The
/// serialized form uses `type`/`lang` field names to match the catalog wire
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitabaseId {
    #[serde(rename = "type")]
    pub content_type: GitabaseType,
    pub lang: GitabaseLang,
}

impl GitabaseId {
    pub fn new(content_type: GitabaseType, lang: GitabaseLang) -> Self {
        Self { content_type, lang }
    }

    /// Identity used when a valid database file carries no parseable name
    pub fn fallback() -> Self {
        Self::new(GitabaseType::Texts, GitabaseLang::English)
    }

    /// Encode into the `type_lang` key form
    ///
    /// The key doubles as the persisted selection value on the host side,
    /// so [`GitabaseId::from_key`] must invert it exactly.
    pub fn key(&self) -> String {
        format!("{}_{}", self.content_type.as_str(), self.lang.as_str())
    }

    /// Decode a `type_lang` key back into an identity
    ///
    /// The split happens at the first underscore: type codes never contain
    /// one, while language codes may.
    pub fn from_key(key: &str) -> Result<Self> {
        let (type_code, lang_code) = key
            .split_once('_')
            .ok_or_else(|| GitabaseError::InvalidKey(key.to_string()))?;
        if type_code.is_empty() || lang_code.is_empty() {
            return Err(GitabaseError::InvalidKey(key.to_string()));
        }
        Ok(Self::new(
            GitabaseType::from_code(type_code),
            GitabaseLang::from_code(lang_code),
        ))
    }

    /// Parse an identity out of a database file name
    ///
    /// Convenience wrapper over [`parse_file_name`] that folds both failure
    /// modes into [`GitabaseError::InvalidFileName`]. The scanner uses
    /// [`parse_file_name`] directly because it treats the two modes
    /// differently.
    pub fn from_file_name(name: &str) -> Result<Self> {
        parse_file_name(name)
            .map_err(|e| GitabaseError::invalid_file_name(name, e.to_string()))
    }

    /// Title shown until the catalog supplies a real one
    pub fn default_title(&self) -> String {
        format!("{} ({})", self.content_type.display_name(), self.lang)
    }
}

impl fmt::Display for GitabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.content_type, self.lang)
    }
}

// ============================================================================
// FILE NAME PARSING
// ============================================================================

/// Why a file name did not yield an identity
///
/// The scanner falls back to [`GitabaseId::fallback`] on `MissingMarker`
/// (the file passed database validation, so it is a Gitabase under an alien
/// name) but skips the file entirely on `Malformed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileNameError {
    /// The name does not contain the `gitabase` marker at all
    #[error("missing '{GITABASE_MARKER}' marker")]
    MissingMarker,
    /// The marker is present but the identity segments are unusable
    #[error("malformed identity segments: {0}")]
    Malformed(String),
}

/// Extract a [`GitabaseId`] from a database file name
///
/// The name is matched case-insensitively. Everything between the
/// `gitabase_` prefix and the first dot is the identity, split at its first
/// underscore into type and language:
///
/// ```
/// use gitabase_core::identity::{parse_file_name, GitabaseLang, GitabaseType};
///
/// let id = parse_file_name("gitabase_texts_eng.db").unwrap();
/// assert_eq!(id.content_type, GitabaseType::Texts);
/// assert_eq!(id.lang, GitabaseLang::English);
/// ```
///
/// The marker may appear anywhere in the name, so copies like
/// `backup_gitabase_texts_eng.db` still parse.
pub fn parse_file_name(name: &str) -> std::result::Result<GitabaseId, FileNameError> {
    let lowered = name.to_lowercase();

    let marker_at = lowered.find(GITABASE_MARKER).ok_or(FileNameError::MissingMarker)?;

    let after_marker = &lowered[marker_at + GITABASE_MARKER.len()..];
    let identity = after_marker
        .strip_prefix('_')
        .ok_or_else(|| FileNameError::Malformed("no separator after marker".to_string()))?;

    // Identity runs up to the extension dot; a name without one is not a
    // database file name at all
    let identity = match identity.find('.') {
        Some(dot) => &identity[..dot],
        None => return Err(FileNameError::Malformed("no extension dot".to_string())),
    };

    let (type_code, lang_code) = identity
        .split_once('_')
        .ok_or_else(|| FileNameError::Malformed("expected type and language".to_string()))?;

    if type_code.is_empty() || lang_code.is_empty() {
        return Err(FileNameError::Malformed("empty type or language".to_string()));
    }

    Ok(GitabaseId::new(
        GitabaseType::from_code(type_code),
        GitabaseLang::from_code(lang_code),
    ))
}
