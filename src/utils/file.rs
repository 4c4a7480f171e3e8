//! File utilities for extraction.

use std::path::Path;

/// Extensions of files that are read and chunked. Everything else is ignored.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "go", "py", "js", "java", "html", "css", "json", "yaml", "yml", "xml", "csv",
];

/// Check if a file is on the text-extension allow-list (case-insensitive).
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if a path matches any of the glob exclude patterns.
///
/// Callers pass paths relative to the directory being walked.
pub fn is_excluded(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(&path_str))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_text_file() {
        assert!(is_text_file(&PathBuf::from("notes.md")));
        assert!(is_text_file(&PathBuf::from("/src/Main.JAVA")));
        assert!(is_text_file(&PathBuf::from("data/table.csv")));
        assert!(!is_text_file(&PathBuf::from("notes.exe")));
        assert!(!is_text_file(&PathBuf::from("lib.rs")));
        assert!(!is_text_file(&PathBuf::from("Makefile")));
        assert!(!is_text_file(&PathBuf::from(".md")));
    }

    #[test]
    fn test_is_excluded() {
        let patterns = vec!["**/node_modules/**".to_string(), "**/*.min.js".to_string()];
        assert!(is_excluded(
            &PathBuf::from("/app/node_modules/react/index.js"),
            &patterns
        ));
        assert!(is_excluded(&PathBuf::from("/app/dist/app.min.js"), &patterns));
        assert!(!is_excluded(&PathBuf::from("/app/src/index.js"), &patterns));
        assert!(!is_excluded(&PathBuf::from("/app/src/index.js"), &[]));
    }

    #[test]
    fn test_is_excluded_relative_paths() {
        let patterns = vec!["**/build/**".to_string(), "**/*.exe".to_string()];
        assert!(is_excluded(&PathBuf::from("build/out.md"), &patterns));
        assert!(is_excluded(&PathBuf::from("tool.exe"), &patterns));
        assert!(!is_excluded(&PathBuf::from("notes.md"), &patterns));
        assert!(!is_excluded(&PathBuf::from("docs/build.md"), &patterns));
    }
}
