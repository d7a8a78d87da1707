//! The in-memory representation of an export bundle.

use std::collections::BTreeMap;

/// An opaque bundle of exported file contents, keyed by logical path.
///
/// Paths use forward slashes regardless of platform, the way export archives
/// name their entries. The bundle is read-only for the duration of a
/// dispatch — handlers inspect it, they never modify it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBundle {
    files: BTreeMap<String, String>,
}

impl ImportBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the bundle, replacing any previous content at `path`.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Content of the file at `path`, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Whether the bundle contains a file at exactly `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Iterate over `(path, content)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    /// Number of files in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the bundle holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths whose final segment equals `name`, shallowest first.
    ///
    /// Export tools wrap bundle contents in a top-level directory, so a
    /// well-known file such as `metadata.yaml` may sit at the root or one
    /// or more levels down. Candidates at equal depth come back in path
    /// order, keeping the choice deterministic.
    #[must_use]
    pub fn find_by_file_name(&self, name: &str) -> Vec<&str> {
        let mut candidates: Vec<&str> = self
            .files
            .keys()
            .map(String::as_str)
            .filter(|path| path.rsplit('/').next() == Some(name))
            .collect();
        // BTreeMap iteration is already path-ordered; a stable sort by depth
        // keeps that order within each depth.
        candidates.sort_by_key(|path| path.matches('/').count());
        candidates
    }
}

impl FromIterator<(String, String)> for ImportBundle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_file_name_prefers_shallowest() {
        let mut bundle = ImportBundle::new();
        bundle.insert("export/nested/metadata.yaml", "b");
        bundle.insert("export/metadata.yaml", "a");
        bundle.insert("export/queries/query.yaml", "q");

        let found = bundle.find_by_file_name("metadata.yaml");
        assert_eq!(found, vec!["export/metadata.yaml", "export/nested/metadata.yaml"]);
    }

    #[test]
    fn test_find_by_file_name_equal_depth_is_path_ordered() {
        let mut bundle = ImportBundle::new();
        bundle.insert("b/metadata.yaml", "2");
        bundle.insert("a/metadata.yaml", "1");

        let found = bundle.find_by_file_name("metadata.yaml");
        assert_eq!(found, vec!["a/metadata.yaml", "b/metadata.yaml"]);
    }

    #[test]
    fn test_find_by_file_name_matches_whole_segment() {
        let mut bundle = ImportBundle::new();
        bundle.insert("not_metadata.yaml", "x");

        assert!(bundle.find_by_file_name("metadata.yaml").is_empty());
    }

    #[test]
    fn test_from_iterator_and_lookup() {
        let bundle: ImportBundle = [("metadata.yaml".to_owned(), "version: 1.0.0".to_owned())]
            .into_iter()
            .collect();

        assert_eq!(bundle.len(), 1);
        assert!(bundle.contains("metadata.yaml"));
        assert_eq!(bundle.get("metadata.yaml"), Some("version: 1.0.0"));
        assert_eq!(bundle.get("missing.yaml"), None);
    }
}
