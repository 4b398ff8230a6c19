//! Decides whether a path is excluded by a configured list of ignored
//! directory prefixes. Prefix matching is textual, not path-segment aware,
//! matching the original's `startswith` behavior.

/// `true` if `path` equals or starts with any configured ignore prefix.
/// An empty `ignore_dirs` list ignores nothing.
pub fn ignored(path: &str, ignore_dirs: &[String]) -> bool {
    ignore_dirs
        .iter()
        .any(|prefix| path == prefix || path.starts_with(prefix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ignore_list_excludes_nothing() {
        assert!(!ignored("vendor/thing.go", &[]));
    }

    #[test]
    fn exact_prefix_match() {
        let ignores = vec!["vendor".to_string()];
        assert!(ignored("vendor", &ignores));
        assert!(ignored("vendor/pkg/file.go", &ignores));
        assert!(!ignored("src/other.go", &ignores));
    }

    #[test]
    fn textual_not_segment_aware() {
        // "vendoring/x.go" starts with "vendor" textually even though
        // "vendoring" is not the same path segment as "vendor" — this is
        // intentional, matching the source's plain `str.startswith`.
        let ignores = vec!["vendor".to_string()];
        assert!(ignored("vendoring/x.go", &ignores));
    }

    #[test]
    fn multiple_prefixes() {
        let ignores = vec!["docs".to_string(), "test/fixtures".to_string()];
        assert!(ignored("docs/readme.md", &ignores));
        assert!(ignored("test/fixtures/a.json", &ignores));
        assert!(!ignored("src/main.rs", &ignores));
    }
}
