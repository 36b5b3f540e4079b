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


//! Gitabase file naming and locations
//!
//! The file name is the identity (`gitabase_{type}_{lang}.db`), so path
//! construction is a pure function of [`GitabaseId`] plus the library folder.

use std::path::{Path, PathBuf};

use crate::identity::{GitabaseId, GITABASE_EXTENSION, GITABASE_PREFIX};

/// Canonical file name for an identity, e.g. `gitabase_texts_eng.db`
pub fn gitabase_file_name(id: &GitabaseId) -> String {
    format!("{}{}.{}", GITABASE_PREFIX, id.key(), GITABASE_EXTENSION)
}

/// Full path of an identity's database file inside a library folder
pub fn gitabase_path(folder: &Path, id: &GitabaseId) -> PathBuf {
    folder.join(gitabase_file_name(id))
}

/// Check if a path looks like a database file (case-insensitive `.db`)
pub fn is_database_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        matches!(
            ext.to_str().map(|s| s.to_lowercase()).as_deref(),
            Some(GITABASE_EXTENSION)
        )
    } else {
        false
    }
}

/// Get the default Gitabase folder for the platform
pub fn default_gitabase_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        // App-specific external files dir; the host passes the real one in
        // its configuration, this is only the standalone default
        PathBuf::from("/sdcard/Android/data/com.gitabase.reader/files/gitabases")
    }

    #[cfg(target_os = "ios")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push("Documents");
            path.push("gitabases");
            return path;
        }
        PathBuf::from("./gitabases")
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push("Library");
            path.push("Application Support");
            path.push("Gitabase");
            path.push("gitabases");
            return path;
        }
        PathBuf::from("./gitabases")
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push(".local");
            path.push("share");
            path.push("gitabase");
            path.push("gitabases");
            return path;
        }
        PathBuf::from("./gitabases")
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut path = PathBuf::from(appdata);
            path.push("Gitabase");
            path.push("gitabases");
            return path;
        }
        PathBuf::from("./gitabases")
    }

    #[cfg(not(any(
        target_os = "android",
        target_os = "ios",
        target_os = "macos",
        target_os = "linux",
        target_os = "windows"
    )))]
    {
        PathBuf::from("./gitabases")
    }
}
