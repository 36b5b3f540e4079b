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


//! In-memory registry of known Gitabases
//!
//! Holds the last-scanned descriptor set, the current selection, and the
//! library folder, each behind a watch channel so the host UI can observe
//! changes. The registry is owned by the composition root and passed to
//! every consumer; there are no ambient singletons.
//!
//! Readers only ever see whole-value replacements. Mutations are serialized
//! by one internal lock, so interleaved updates cannot mix two states, but
//! two concurrent `set_all` calls still land in some order and the later
//! one wins.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;

use crate::identity::{GitabaseId, GitabaseType};
use crate::storage::models::Gitabase;

/// Observable holder of the Gitabase set, selection, and folder
pub struct GitabaseRegistry {
    // Guards the read-modify-write cycles below; the channels themselves
    // are safe but a mutation must not interleave with another
    write_lock: Mutex<()>,
    gitabases: watch::Sender<Vec<Gitabase>>,
    current: watch::Sender<Option<Gitabase>>,
    folder: watch::Sender<Option<PathBuf>>,
}

impl GitabaseRegistry {
    pub fn new() -> Self {
        let (gitabases, _) = watch::channel(Vec::new());
        let (current, _) = watch::channel(None);
        let (folder, _) = watch::channel(None);
        Self {
            write_lock: Mutex::new(()),
            gitabases,
            current,
            folder,
        }
    }

    // ===== Reads =====

    /// Snapshot of the registered descriptors, in display order
    pub fn all(&self) -> Vec<Gitabase> {
        self.gitabases.borrow().clone()
    }

    /// Find a descriptor by identity
    pub fn find(&self, id: &GitabaseId) -> Option<Gitabase> {
        self.gitabases.borrow().iter().find(|g| &g.id == id).cloned()
    }

    /// Currently selected Gitabase, if any
    pub fn current(&self) -> Option<Gitabase> {
        self.current.borrow().clone()
    }

    /// Library folder, if one has been set
    pub fn folder(&self) -> Option<PathBuf> {
        self.folder.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.gitabases.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gitabases.borrow().is_empty()
    }

    // ===== Observation =====

    pub fn watch_gitabases(&self) -> watch::Receiver<Vec<Gitabase>> {
        self.gitabases.subscribe()
    }

    pub fn watch_current(&self) -> watch::Receiver<Option<Gitabase>> {
        self.current.subscribe()
    }

    pub fn watch_folder(&self) -> watch::Receiver<Option<PathBuf>> {
        self.folder.subscribe()
    }

    // ===== Mutations =====

    /// Replace the whole descriptor set with a scan result
    ///
    /// The selection is re-resolved against the new set: a rediscovered id
    /// picks up its fresh descriptor, a vanished one silently clears the
    /// selection. Callers must expect `current` to become `None` after a
    /// scan that dropped the selected database.
    pub fn set_all(&self, gitabases: Vec<Gitabase>) {
        let _guard = self.lock();

        let mut sorted = gitabases;
        sort_for_display(&mut sorted);

        let reselected = self
            .current
            .borrow()
            .as_ref()
            .and_then(|current| sorted.iter().find(|g| g.id == current.id).cloned());

        self.gitabases.send_replace(sorted);
        self.current.send_replace(reselected);
    }

    /// Register one descriptor, replacing any existing one with the same id
    ///
    /// Used after a manual import, as opposed to a full rescan.
    pub fn add(&self, gitabase: Gitabase) {
        let _guard = self.lock();

        let mut set = self.gitabases.borrow().clone();
        set.retain(|g| g.id != gitabase.id);
        set.push(gitabase.clone());
        sort_for_display(&mut set);
        self.gitabases.send_replace(set);

        let selected = self.current.borrow().as_ref().map(|c| c.id.clone());
        if selected.as_ref() == Some(&gitabase.id) {
            self.current.send_replace(Some(gitabase));
        }
    }

    /// Deregister a descriptor, clearing the selection if it pointed there
    pub fn remove(&self, id: &GitabaseId) -> Option<Gitabase> {
        let _guard = self.lock();

        let mut set = self.gitabases.borrow().clone();
        let position = set.iter().position(|g| &g.id == id);
        let removed = position.map(|i| set.remove(i));
        if removed.is_some() {
            self.gitabases.send_replace(set);
        }

        let selected = self.current.borrow().as_ref().map(|c| c.id.clone());
        if selected.as_ref() == Some(id) {
            self.current.send_replace(None);
        }

        removed
    }

    /// Select the Gitabase with the given id
    ///
    /// An id not in the set clears the selection and returns `None`.
    pub fn set_current(&self, id: &GitabaseId) -> Option<Gitabase> {
        let _guard = self.lock();

        let resolved = self.gitabases.borrow().iter().find(|g| &g.id == id).cloned();
        self.current.send_replace(resolved.clone());
        resolved
    }

    pub fn clear_current(&self) {
        let _guard = self.lock();
        self.current.send_replace(None);
    }

    pub fn set_folder(&self, folder: &Path) {
        let _guard = self.lock();
        self.folder.send_replace(Some(folder.to_path_buf()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means another mutation panicked; the guarded
        // value is (), so continuing is safe
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for GitabaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Display order baked into the registry: Help databases first, then
/// alphabetical by title, case-insensitive
fn sort_for_display(gitabases: &mut [Gitabase]) {
    gitabases.sort_by(|a, b| {
        let a_help = a.id.content_type == GitabaseType::Help;
        let b_help = b.id.content_type == GitabaseType::Help;
        b_help
            .cmp(&a_help)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
}
