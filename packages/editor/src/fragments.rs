//! Shared-fragment store: externally persisted, reusable block content.
//!
//! Fragments are created and saved by the host outside the recovery
//! engine; the engine reads, rewrites and re-persists them. The host
//! populates fragment content asynchronously, so an entry can be known
//! but still "fetching".

use crate::errors::HostError;
use crate::host::FragmentContent;
use mason_parser::FragmentRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct FragmentEntry {
    content: String,
    fetching: bool,
    persisted: bool,
    persist_calls: u32,
}

/// Store of shared fragments, keyed by fragment identity.
#[derive(Debug, Default)]
pub struct FragmentStore {
    entries: HashMap<FragmentRef, FragmentEntry>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add a fragment whose content is already loaded and saved.
    pub fn insert(&mut self, fragment: FragmentRef, content: impl Into<String>) {
        self.entries.insert(
            fragment,
            FragmentEntry {
                content: content.into(),
                fetching: false,
                persisted: true,
                persist_calls: 0,
            },
        );
    }

    /// Add a fragment the host is still loading.
    pub fn insert_fetching(&mut self, fragment: FragmentRef) {
        self.entries.insert(
            fragment,
            FragmentEntry {
                fetching: true,
                ..FragmentEntry::default()
            },
        );
    }

    /// Complete an in-flight fetch.
    pub fn finish_fetch(&mut self, fragment: FragmentRef, content: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(&fragment) {
            entry.content = content.into();
            entry.fetching = false;
            entry.persisted = true;
        }
    }

    /// Unknown fragments are not "fetching".
    pub fn is_fetching(&self, fragment: FragmentRef) -> bool {
        self.entries
            .get(&fragment)
            .map(|entry| entry.fetching)
            .unwrap_or(false)
    }

    pub fn content(&self, fragment: FragmentRef) -> Result<FragmentContent, HostError> {
        let entry = self
            .entries
            .get(&fragment)
            .ok_or(HostError::FragmentNotFound(fragment))?;
        if entry.fetching {
            return Err(HostError::FragmentUnavailable(fragment));
        }
        Ok(FragmentContent {
            fragment,
            content: entry.content.clone(),
        })
    }

    /// Rewrite content; the entry stays unpersisted until `persist` runs.
    pub fn update_content(
        &mut self,
        fragment: FragmentRef,
        content: String,
    ) -> Result<(), HostError> {
        let entry = self
            .entries
            .get_mut(&fragment)
            .ok_or(HostError::FragmentNotFound(fragment))?;
        entry.content = content;
        entry.persisted = false;
        Ok(())
    }

    pub fn persist(&mut self, fragment: FragmentRef) -> Result<(), HostError> {
        let entry = self
            .entries
            .get_mut(&fragment)
            .ok_or(HostError::FragmentNotFound(fragment))?;
        entry.persisted = true;
        entry.persist_calls += 1;
        Ok(())
    }

    pub fn is_persisted(&self, fragment: FragmentRef) -> bool {
        self.entries
            .get(&fragment)
            .map(|entry| entry.persisted)
            .unwrap_or(false)
    }

    /// How many times `persist` ran for this fragment.
    pub fn persist_calls(&self, fragment: FragmentRef) -> u32 {
        self.entries
            .get(&fragment)
            .map(|entry| entry.persist_calls)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_marks_unpersisted_until_persist() {
        let mut store = FragmentStore::new();
        store.insert(FragmentRef(7), "<!-- blk:demo/a /-->");
        assert!(store.is_persisted(FragmentRef(7)));

        store
            .update_content(FragmentRef(7), "<!-- blk:demo/b /-->".to_string())
            .unwrap();
        assert!(!store.is_persisted(FragmentRef(7)));

        store.persist(FragmentRef(7)).unwrap();
        assert!(store.is_persisted(FragmentRef(7)));
        assert_eq!(store.persist_calls(FragmentRef(7)), 1);
    }

    #[test]
    fn test_fetching_entries_hide_content() {
        let mut store = FragmentStore::new();
        store.insert_fetching(FragmentRef(3));

        assert!(store.is_fetching(FragmentRef(3)));
        assert_eq!(
            store.content(FragmentRef(3)),
            Err(HostError::FragmentUnavailable(FragmentRef(3)))
        );

        store.finish_fetch(FragmentRef(3), "<!-- blk:demo/a /-->");
        assert!(!store.is_fetching(FragmentRef(3)));
        assert!(store.content(FragmentRef(3)).is_ok());
    }

    #[test]
    fn test_unknown_fragment_is_not_fetching() {
        let store = FragmentStore::new();
        assert!(!store.is_fetching(FragmentRef(404)));
        assert_eq!(
            store.content(FragmentRef(404)),
            Err(HostError::FragmentNotFound(FragmentRef(404)))
        );
    }
}
