//! Host wizard plumbing: named fields and page navigation

use crate::constants::NO_FIXED_SUCCESSOR;
use crate::error::FieldError;
use log::debug;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Lookup of wizard fields by name
pub trait WizardFields {
    /// Current value of a registered field
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default)]
struct FieldEntry {
    value: String,
    required: bool,
}

/// Fields registered by the wizard pages
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldEntry>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field. Registering again keeps the value and updates the flag.
    pub fn register(&mut self, name: &str, required: bool) {
        self.fields.entry(name.to_string()).or_default().required = required;
        debug!("Registered wizard field '{}' (required: {})", name, required);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let entry = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldError::Unknown(name.to_string()))?;
        entry.value = value.into();
        Ok(())
    }

    /// Required fields that are still empty, sorted by name
    pub fn missing_required(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, f)| f.required && f.value.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Whether every required field in `names` has a value
    pub fn has_required(&self, names: &[&str]) -> bool {
        names.iter().all(|name| {
            self.fields
                .get(*name)
                .map(|f| !f.required || !f.value.is_empty())
                .unwrap_or(false)
        })
    }
}

impl WizardFields for FieldRegistry {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }
}

/// Normalise a directory path: drops `.` segments, duplicate and trailing
/// separators, and resolves `..` against preceding segments.
pub fn clean_path(path: &str) -> PathBuf {
    if path.is_empty() {
        return PathBuf::new();
    }
    let mut parts: Vec<Component> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last().copied() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Position within an ordered list of wizard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigator {
    page_count: usize,
    current: usize,
}

impl PageNavigator {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.page_count
    }

    /// Page that follows the current one, given its `next_id`
    pub fn successor(&self, next_id: i32) -> Option<usize> {
        let target = if next_id == NO_FIXED_SUCCESSOR {
            self.current + 1
        } else {
            usize::try_from(next_id).ok()?
        };
        (target < self.page_count && target != self.current).then_some(target)
    }

    /// Advance if the current page is complete. Returns the new page index.
    pub fn next(&mut self, next_id: i32, complete: bool) -> Option<usize> {
        if !complete {
            return None;
        }
        let target = self.successor(next_id)?;
        self.current = target;
        Some(target)
    }

    pub fn back(&mut self) -> Option<usize> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut fields = FieldRegistry::new();
        fields.register("directory", true);
        assert_eq!(fields.field("directory"), Some(""));
        assert_eq!(fields.field("other"), None);

        fields.set("directory", "/work").unwrap();
        assert_eq!(fields.field("directory"), Some("/work"));
        assert_eq!(
            fields.set("other", "x"),
            Err(FieldError::Unknown("other".to_string()))
        );
    }

    #[test]
    fn test_missing_required() {
        let mut fields = FieldRegistry::new();
        fields.register("mutations_size", true);
        fields.register("directory", true);
        fields.register("comment", false);
        assert_eq!(fields.missing_required(), ["directory", "mutations_size"]);
        assert!(!fields.has_required(&["directory"]));
        assert!(fields.has_required(&["comment"]));

        fields.set("directory", "/work").unwrap();
        assert_eq!(fields.missing_required(), ["mutations_size"]);
        assert!(fields.has_required(&["directory"]));
        assert!(!fields.has_required(&["unknown"]));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a//b/./c/../d/"), PathBuf::from("/a/b/d"));
        assert_eq!(clean_path("a/b/.."), PathBuf::from("a"));
        assert_eq!(clean_path("a/.."), PathBuf::from("."));
        assert_eq!(clean_path("../x"), PathBuf::from("../x"));
        assert_eq!(clean_path("/.."), PathBuf::from("/"));
        assert_eq!(clean_path(""), PathBuf::new());
    }

    #[test]
    fn test_navigator_sequential() {
        let mut nav = PageNavigator::new(2);
        assert_eq!(nav.next(NO_FIXED_SUCCESSOR, false), None);
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.next(NO_FIXED_SUCCESSOR, true), Some(1));
        assert!(nav.is_last());
        assert_eq!(nav.next(NO_FIXED_SUCCESSOR, true), None);
        assert_eq!(nav.back(), Some(0));
        assert_eq!(nav.back(), None);
    }

    #[test]
    fn test_navigator_fixed_successor() {
        let mut nav = PageNavigator::new(3);
        assert_eq!(nav.next(2, true), Some(2));
        assert_eq!(nav.successor(7), None);
        assert_eq!(nav.successor(2), None);
    }
}
