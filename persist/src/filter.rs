//! Whitelist/blacklist predicate over slice keys

use std::collections::HashSet;

/// Decides which top-level slices are persisted.
///
/// An unset whitelist means "persist everything not blacklisted".
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    whitelist: Option<HashSet<String>>,
    blacklist: HashSet<String>,
}

impl KeyFilter {
    pub fn new(whitelist: Option<Vec<String>>, blacklist: Vec<String>) -> Self {
        Self {
            whitelist: whitelist.map(|keys| keys.into_iter().collect()),
            blacklist: blacklist.into_iter().collect(),
        }
    }

    pub fn should_persist(&self, key: &str) -> bool {
        if let Some(whitelist) = &self.whitelist {
            if !whitelist.contains(key) {
                return false;
            }
        }
        !self.blacklist.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_persists_everything() {
        let filter = KeyFilter::default();
        assert!(filter.should_persist("settings"));
        assert!(filter.should_persist("messages"));
    }

    #[test]
    fn test_whitelist_is_exclusive() {
        let filter = KeyFilter::new(Some(vec!["settings".into()]), vec![]);
        assert!(filter.should_persist("settings"));
        assert!(!filter.should_persist("messages"));
    }

    #[test]
    fn test_blacklist_always_wins() {
        let filter = KeyFilter::new(
            Some(vec!["settings".into(), "session".into()]),
            vec!["session".into()],
        );
        assert!(filter.should_persist("settings"));
        assert!(!filter.should_persist("session"));
    }
}
