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


//! Gitabase core: discovery, caching, and querying of scripture databases
//!
//! A Gitabase is one SQLite file holding one (content type, language) pair
//! of scriptural content, identified by its file name
//! (`gitabase_{type}_{lang}.db`). This crate is the data layer of the
//! reader app:
//!
//! - [`identity`]: the (type, lang) identity, its key codec, and the file
//!   name parser
//! - [`file`]: naming conventions and the folder scanner that validates
//!   candidate files
//! - [`registry`]: the observable set of known Gitabases plus the current
//!   selection
//! - [`storage`]: read-only handles, the bounded connection cache, and the
//!   content queries
//! - [`catalog`]: optional description enrichment for scan results
//! - [`manager`] / [`repo`]: the composition root and the use-case facade
//!   the host app calls
//!
//! The host UI, downloads, and preference persistence live outside this
//! crate; they hand folders in and take projections and registry watchers
//! out.

pub mod catalog;
pub mod error;
pub mod file;
pub mod identity;
pub mod manager;
pub mod registry;
pub mod repo;
pub mod storage;

#[cfg(test)]
pub mod testutil;

// Re-export the types nearly every caller needs
pub use error::{GitabaseError, Result};
pub use identity::{GitabaseId, GitabaseLang, GitabaseType};
pub use manager::{GitabaseConfig, GitabaseManager};
pub use registry::GitabaseRegistry;
pub use repo::GitabaseTextsRepo;
pub use storage::models::{BookPreview, Gitabase};
