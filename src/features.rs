//! The bounded "keunggulan" (selling points) list on a provider profile.

use crate::errors::{AppError, AppResult};

/// Maximum number of entries a provider may list.
pub const MAX_FEATURES: usize = 4;

/// Editable feature list. Its length never exceeds [`MAX_FEATURES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureList {
    items: Vec<String>,
}

impl FeatureList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a list as stored. Stored lists are already sanitized, but anything
    /// beyond the cap is dropped so the editable invariant holds.
    pub fn from_stored(mut items: Vec<String>) -> Self {
        items.truncate(MAX_FEATURES);
        Self { items }
    }

    /// Accept a list submitted by the profile form.
    pub fn from_submitted(items: Vec<String>) -> AppResult<Self> {
        if items.len() > MAX_FEATURES {
            return Err(AppError::validation(format!(
                "At most {MAX_FEATURES} features are allowed, got {}",
                items.len()
            )));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_FEATURES
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Append an empty slot for the user to fill. Does nothing once the list
    /// is full; returns whether a slot was added.
    pub fn add(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(String::new());
        true
    }

    pub fn update(&mut self, index: usize, value: impl Into<String>) -> AppResult<()> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(AppError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> AppResult<String> {
        if index >= self.items.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Entries that are not blank, in order and unmodified. Only this form is persisted.
    pub fn sanitize_for_persist(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|f| !f.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> FeatureList {
        FeatureList::from_submitted(items.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn add_appends_empty_placeholder() {
        let mut features = FeatureList::new();
        assert!(features.add());
        assert_eq!(features.as_slice(), &[String::new()]);
    }

    #[test]
    fn add_at_capacity_is_a_no_op() {
        let mut features = list(&["a", "b", "c", "d"]);
        let before = features.clone();
        assert!(!features.add());
        assert_eq!(features, before);
    }

    #[test]
    fn add_never_exceeds_cap() {
        let mut features = FeatureList::new();
        for _ in 0..10 {
            features.add();
            assert!(features.len() <= MAX_FEATURES);
        }
        assert_eq!(features.len(), MAX_FEATURES);
    }

    #[test]
    fn update_and_remove_check_bounds() {
        let mut features = list(&["Fast"]);
        assert!(matches!(
            features.update(1, "x"),
            Err(AppError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            features.remove(3),
            Err(AppError::IndexOutOfRange { index: 3, len: 1 })
        ));

        features.update(0, "Faster").unwrap();
        assert_eq!(features.as_slice(), &["Faster".to_string()]);
        assert_eq!(features.remove(0).unwrap(), "Faster");
        assert!(features.is_empty());
    }

    #[test]
    fn sanitize_drops_blank_entries_but_keeps_values_verbatim() {
        let features = list(&["", " ", "Fast", "  Reliable  "]);
        assert_eq!(
            features.sanitize_for_persist(),
            vec!["Fast".to_string(), "  Reliable  ".to_string()]
        );
    }

    #[test]
    fn submitted_lists_over_cap_are_rejected() {
        let items = vec!["a".to_string(); 5];
        assert!(matches!(
            FeatureList::from_submitted(items),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn stored_lists_are_truncated_to_cap() {
        let features = FeatureList::from_stored(vec!["a".to_string(); 6]);
        assert_eq!(features.len(), MAX_FEATURES);
    }
}
