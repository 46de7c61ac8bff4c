//! [`FileInfo`]: a value type identifying a file or directory on the
//! connected share, plus the metadata a directory listing returns about it.
//!
//! Deliberately holds no reference back to the [`crate::Connection`] that
//! produced it — it's pure data, safe to stash in a caller's own
//! collections independent of connection lifetime.

/// A file or directory entry relative to the connected share's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// UNC-style path (backslash-separated) of the directory containing
    /// this entry, always starting with `\`. The share root's own
    /// `dir_path` is `"\"` with an empty `name`.
    dir_path: String,
    /// Empty for the share root itself.
    name: String,
    pub is_directory: bool,
    pub size: u64,
}

impl FileInfo {
    /// The share root: an unnamed directory at `\`.
    pub fn root() -> Self {
        Self {
            dir_path: "\\".to_string(),
            name: String::new(),
            is_directory: true,
            size: 0,
        }
    }

    /// Builds the [`FileInfo`] for an entry named `name` found inside
    /// `self` (which must be a directory).
    ///
    /// Each child's directory path is derived from the parent's own
    /// [`full_path`](Self::full_path) rather than string-pasted from the
    /// parent's raw fields, so nested listings never accumulate doubled
    /// path separators the way naive concatenation does.
    pub fn child(&self, name: &str, is_directory: bool, size: u64) -> Self {
        Self {
            dir_path: self.full_path(),
            name: name.to_string(),
            is_directory,
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// This entry's own full UNC-relative path, e.g. `\sub\file.txt`. The
    /// root's full path is `\`.
    pub fn full_path(&self) -> String {
        if self.name.is_empty() {
            self.dir_path.clone()
        } else if self.dir_path == "\\" {
            format!("\\{}", self.name)
        } else {
            format!("{}\\{}", self.dir_path, self.name)
        }
    }

    /// The FIND_FIRST2 search pattern for listing this directory's
    /// contents (`\*` for the root, `\dir\*` otherwise).
    pub fn search_pattern(&self) -> String {
        let path = self.full_path();
        if path == "\\" {
            "\\*".to_string()
        } else {
            format!("{path}\\*")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_search_pattern_has_single_backslash() {
        assert_eq!(FileInfo::root().search_pattern(), "\\*");
    }

    #[test]
    fn nested_children_never_double_up_separators() {
        let root = FileInfo::root();
        let sub = root.child("sub", true, 0);
        assert_eq!(sub.full_path(), "\\sub");
        assert_eq!(sub.search_pattern(), "\\sub\\*");

        let file = sub.child("file.txt", false, 1234);
        assert_eq!(file.full_path(), "\\sub\\file.txt");
        assert!(!file.full_path().contains("\\\\"));
    }

    #[test]
    fn child_does_not_mutate_parent() {
        let root = FileInfo::root();
        let root_before = root.clone();
        let _ = root.child("sub", true, 0);
        assert_eq!(root, root_before);
    }
}
